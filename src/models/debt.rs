use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::crud::{FieldSpec, FormValues, Record, Schema, Validator};
use crate::error::{Error, Result};
use crate::ui::util::format_amount;

labeled_enum!(DebtStatus {
    OnTime => "Em dia",
    Overdue => "Vencido",
    PaidOff => "Quitado",
});

impl DebtStatus {
    /// Status after the remaining amount changed.
    pub fn derive(remaining: Decimal, due_date: Option<NaiveDate>, today: NaiveDate) -> Self {
        if remaining <= Decimal::ZERO {
            Self::PaidOff
        } else if due_date.is_some_and(|due| due < today) {
            Self::Overdue
        } else {
            Self::OnTime
        }
    }
}

pub const DEBT_CATEGORIES: &[&str] = &[
    "Financiamento",
    "Cartão de Crédito",
    "Empréstimo Pessoal",
    "Empréstimo Consignado",
    "Crediário",
    "Outros",
];

pub const PAYMENT_METHODS: &[&str] = &[
    "PIX",
    "Dinheiro",
    "Cartão de Débito",
    "Cartão de Crédito",
    "Transferência",
    "Boleto",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: u32,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: String,
    pub notes: String,
    pub is_late: bool,
}

impl Record for Payment {
    const ENTITY: &'static str = "payment";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.method, &self.notes]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Debt {
    pub id: u32,
    pub description: String,
    pub total_amount: Decimal,
    /// Never negative.
    pub remaining_amount: Decimal,
    pub monthly_payment: Decimal,
    pub due_date: Option<NaiveDate>,
    pub status: DebtStatus,
    pub category: String,
    pub installments: u32,
    pub paid_installments: u32,
    pub notes: String,
    pub payments: Vec<Payment>,
}

impl Debt {
    /// Apply a payment. Rejected payments leave the debt untouched.
    pub fn register_payment(&mut self, mut payment: Payment, today: NaiveDate) -> Result<()> {
        if payment.amount <= Decimal::ZERO {
            return Err(Error::invalid("Payment amount must be greater than zero"));
        }
        if payment.amount > self.remaining_amount {
            return Err(Error::business(format!(
                "Payment cannot exceed the remaining amount of {}",
                format_amount(self.remaining_amount)
            )));
        }

        let remaining = self.remaining_amount - payment.amount;
        payment.id = self.payments.len() as u32 + 1;
        tracing::info!(
            debt = self.id,
            amount = %payment.amount,
            remaining = %remaining,
            "payment registered"
        );

        self.status = DebtStatus::derive(remaining, self.due_date, today);
        self.remaining_amount = remaining.max(Decimal::ZERO);
        self.paid_installments += 1;
        self.payments.push(payment);
        Ok(())
    }

    pub fn paid_amount(&self) -> Decimal {
        self.total_amount - self.remaining_amount
    }

    /// Share of the total already paid, 0..=100.
    pub fn progress_percent(&self) -> u16 {
        if self.total_amount <= Decimal::ZERO {
            return 0;
        }
        (self.paid_amount() / self.total_amount * Decimal::ONE_HUNDRED)
            .round()
            .to_u16()
            .unwrap_or(0)
            .min(100)
    }
}

impl Record for Debt {
    const ENTITY: &'static str = "debt";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.description, &self.category]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "category" => Some(&self.category),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebtTotals {
    pub remaining: Decimal,
    pub monthly: Decimal,
    pub overdue: usize,
}

impl DebtTotals {
    pub fn of(debts: &[Debt]) -> Self {
        debts.iter().fold(Self::default(), |mut acc, d| {
            acc.remaining += d.remaining_amount;
            acc.monthly += d.monthly_payment;
            if d.status == DebtStatus::Overdue {
                acc.overdue += 1;
            }
            acc
        })
    }
}

/// `ceil(total / monthly)`, the installment count when none is given.
pub fn default_installments(total: Decimal, monthly: Decimal) -> u32 {
    if monthly <= Decimal::ZERO {
        return 0;
    }
    (total / monthly).ceil().to_u32().unwrap_or(0)
}

pub struct DebtSchema {
    pub today: NaiveDate,
}

impl Schema for DebtSchema {
    type Record = Debt;

    fn title(&self) -> &'static str {
        "Debt"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("description", "Description").required(),
            FieldSpec::number("total_amount", "Total").required(),
            FieldSpec::number("monthly_payment", "Monthly").required(),
            FieldSpec::date("due_date", "Due date"),
            FieldSpec::integer("installments", "Installments"),
            FieldSpec::choice("category", "Category", DEBT_CATEGORIES)
                .default_value("")
                .required(),
            FieldSpec::choice("status", "Status", &["Em dia", "Vencido"]),
            FieldSpec::text("notes", "Notes"),
        ]
    }

    fn build(&self, form: &FormValues, existing: Option<&Debt>) -> Result<Debt> {
        let mut v = Validator::new(form);
        let description = v.required("description", "Description");
        let total_amount = v.positive("total_amount", "Total");
        let monthly_payment = v.positive("monthly_payment", "Monthly");
        let due_date = v.date("due_date", "Due date");
        let installments = v.integer("installments", "Installments");
        let category = v.required("category", "Category");
        let status_raw = v.text("status");
        let status = DebtStatus::parse(&status_raw);
        v.check(
            status_raw.is_empty() || status.is_some(),
            "Status is not a known debt status",
        );
        let notes = v.text("notes");
        v.finish()?;

        let installments = installments
            .filter(|n| *n > 0)
            .unwrap_or_else(|| default_installments(total_amount, monthly_payment));
        let status = status.unwrap_or(DebtStatus::OnTime);

        Ok(match existing {
            Some(prev) => Debt {
                id: prev.id,
                description,
                total_amount,
                remaining_amount: prev.remaining_amount.min(total_amount),
                monthly_payment,
                due_date,
                status,
                category,
                installments,
                paid_installments: prev.paid_installments,
                notes,
                payments: prev.payments.clone(),
            },
            None => Debt {
                id: 0,
                description,
                total_amount,
                remaining_amount: total_amount,
                monthly_payment,
                due_date,
                status,
                category,
                installments,
                paid_installments: 0,
                notes,
                payments: Vec::new(),
            },
        })
    }

    fn to_form(&self, debt: &Debt) -> FormValues {
        FormValues::default()
            .with("description", debt.description.as_str())
            .with("total_amount", debt.total_amount.to_string())
            .with("monthly_payment", debt.monthly_payment.to_string())
            .with(
                "due_date",
                debt.due_date.map(|d| d.to_string()).unwrap_or_default(),
            )
            .with("installments", debt.installments.to_string())
            .with("category", debt.category.as_str())
            .with("status", debt.status.as_str())
            .with("notes", debt.notes.as_str())
    }
}

/// Form for registering a payment against one debt.
pub struct PaymentSchema {
    pub today: NaiveDate,
}

impl PaymentSchema {
    /// Prefilled with the debt's monthly payment.
    pub fn form_for(&self, debt: &Debt) -> FormValues {
        self.empty_form()
            .with("amount", debt.monthly_payment.to_string())
    }
}

impl Schema for PaymentSchema {
    type Record = Payment;

    fn title(&self) -> &'static str {
        "Payment"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("amount", "Amount").required(),
            FieldSpec::date("date", "Date")
                .default_value(self.today.to_string())
                .required(),
            FieldSpec::choice("method", "Method", PAYMENT_METHODS),
            FieldSpec::text("notes", "Notes"),
            FieldSpec::toggle("is_late", "Late payment"),
        ]
    }

    fn build(&self, form: &FormValues, existing: Option<&Payment>) -> Result<Payment> {
        let mut v = Validator::new(form);
        let amount = v.positive("amount", "Amount");
        let date = v.required_date("date", "Date");
        let method = v.choice("method", "Method", PAYMENT_METHODS);
        let notes = v.text("notes");
        let is_late = v.toggle("is_late");
        v.finish()?;

        Ok(Payment {
            id: existing.map_or(0, |prev| prev.id),
            amount,
            date: date.unwrap_or(self.today),
            method: super::vehicle::non_empty_or(method, PAYMENT_METHODS[0]),
            notes,
            is_late,
        })
    }

    fn to_form(&self, payment: &Payment) -> FormValues {
        FormValues::default()
            .with("amount", payment.amount.to_string())
            .with("date", payment.date.to_string())
            .with("method", payment.method.as_str())
            .with("notes", payment.notes.as_str())
            .with("is_late", payment.is_late.to_string())
    }
}
