use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::crud::{FieldSpec, FormValues, Record, Schema, Validator};
use crate::error::Result;

pub const INCOME_CATEGORIES: &[&str] = &["Salário", "Freelance", "Investimentos", "Vendas", "Outros"];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Alimentação",
    "Transporte",
    "Moradia",
    "Saúde",
    "Educação",
    "Lazer",
    "Compras",
    "Contas",
    "Manutenção Veículos",
    "Combustível",
    "Outros",
];

pub const PERSONAL_PAYMENT_METHODS: &[&str] = &[
    "Dinheiro",
    "PIX",
    "Cartão",
    "Transferência",
    "Débito Automático",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    /// Stored value, also what the `type` filter matches.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match super::fold(s).as_str() {
            "income" | "receita" | "in" | "+" => Some(Self::Income),
            "expense" | "despesa" | "out" | "-" => Some(Self::Expense),
            _ => None,
        }
    }

    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Self::Income => INCOME_CATEGORIES,
            Self::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl std::fmt::Display for TxnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalTransaction {
    pub id: u32,
    pub description: String,
    /// Always positive; `kind` carries the direction.
    pub amount: Decimal,
    pub kind: TxnKind,
    pub category: String,
    pub date: NaiveDate,
    pub payment_method: String,
    pub notes: String,
}

impl PersonalTransaction {
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TxnKind::Income => self.amount,
            TxnKind::Expense => -self.amount,
        }
    }
}

impl Record for PersonalTransaction {
    const ENTITY: &'static str = "transaction";

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
            "type" => Some(self.kind.as_str()),
            "category" => Some(&self.category),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FinancialSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl FinancialSummary {
    pub fn of(transactions: &[PersonalTransaction]) -> Self {
        let mut acc = transactions.iter().fold(Self::default(), |mut acc, t| {
            match t.kind {
                TxnKind::Income => acc.income += t.amount,
                TxnKind::Expense => acc.expense += t.amount,
            }
            acc
        });
        acc.balance = acc.income - acc.expense;
        acc
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Per-category income and expense, sorted by category name.
pub fn category_breakdown(transactions: &[PersonalTransaction]) -> Vec<CategoryTotal> {
    let mut map: BTreeMap<&str, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let entry = map.entry(t.category.as_str()).or_default();
        match t.kind {
            TxnKind::Income => entry.0 += t.amount,
            TxnKind::Expense => entry.1 += t.amount,
        }
    }
    map.into_iter()
        .map(|(category, (income, expense))| CategoryTotal {
            category: category.to_string(),
            income,
            expense,
        })
        .collect()
}

pub struct PersonalSchema {
    pub today: NaiveDate,
}

impl PersonalSchema {
    fn kind_of(form: &FormValues) -> TxnKind {
        TxnKind::parse(form.get("kind")).unwrap_or(TxnKind::Expense)
    }
}

impl Schema for PersonalSchema {
    type Record = PersonalTransaction;

    fn title(&self) -> &'static str {
        "Transaction"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        self.fields_for(&FormValues::default())
    }

    fn fields_for(&self, form: &FormValues) -> Vec<FieldSpec> {
        let kind = Self::kind_of(form);
        vec![
            FieldSpec::text("description", "Description").required(),
            FieldSpec::number("amount", "Amount").required(),
            FieldSpec::choice("kind", "Type", &["expense", "income"]),
            FieldSpec::choice("category", "Category", kind.categories())
                .default_value("")
                .required(),
            FieldSpec::date("date", "Date")
                .default_value(self.today.to_string())
                .required(),
            FieldSpec::choice("payment_method", "Payment", PERSONAL_PAYMENT_METHODS),
            FieldSpec::text("notes", "Notes"),
        ]
    }

    /// A category from the other type's list makes no sense, so switching
    /// type clears it.
    fn on_change(&self, key: &str, form: &mut FormValues) {
        if key == "kind" {
            form.set("category", "");
        }
    }

    fn build(
        &self,
        form: &FormValues,
        existing: Option<&PersonalTransaction>,
    ) -> Result<PersonalTransaction> {
        let mut v = Validator::new(form);
        let description = v.min_len("description", "Description", 3);
        let amount = v.positive("amount", "Amount");
        let kind_raw = v.text("kind");
        let kind = TxnKind::parse(&kind_raw);
        v.check(
            kind_raw.is_empty() || kind.is_some(),
            "Type must be income or expense",
        );
        let kind = kind.unwrap_or(TxnKind::Expense);
        let category = v.required("category", "Category");
        if !category.is_empty() {
            v.check(
                kind.categories().contains(&category.as_str()),
                format!("Category {category} does not belong to {}", kind.label()),
            );
        }
        let date = v.required_date("date", "Date");
        let payment_method = v.choice("payment_method", "Payment", PERSONAL_PAYMENT_METHODS);
        let notes = v.text("notes");
        v.finish()?;

        Ok(PersonalTransaction {
            id: existing.map_or(0, |prev| prev.id),
            description,
            amount,
            kind,
            category,
            date: date.unwrap_or(self.today),
            payment_method: super::vehicle::non_empty_or(
                payment_method,
                PERSONAL_PAYMENT_METHODS[0],
            ),
            notes,
        })
    }

    fn to_form(&self, t: &PersonalTransaction) -> FormValues {
        FormValues::default()
            .with("description", t.description.as_str())
            .with("amount", t.amount.to_string())
            .with("kind", t.kind.as_str())
            .with("category", t.category.as_str())
            .with("date", t.date.to_string())
            .with("payment_method", t.payment_method.as_str())
            .with("notes", t.notes.as_str())
    }
}
