//! In-memory data for every page, seeded with the example fleet.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::crud::ListController;
use crate::models::{
    Contribution, Debt, DebtStatus, DocumentStatus, Goal, GoalKind, GoalStatus, Payment,
    PersonalTransaction, Rental, RentalStatus, Settings, TxnKind, Vehicle, VehicleStatus,
};

#[derive(Debug, Clone)]
pub struct Store {
    pub vehicles: ListController<Vehicle>,
    pub rentals: ListController<Rental>,
    pub transactions: ListController<PersonalTransaction>,
    pub debts: ListController<Debt>,
    pub goals: ListController<Goal>,
    pub settings: Settings,
}

impl Store {
    pub fn empty() -> Self {
        Self {
            vehicles: ListController::default(),
            rentals: ListController::default(),
            transactions: ListController::default(),
            debts: ListController::default(),
            goals: ListController::default(),
            settings: Settings::default(),
        }
    }

    pub fn seeded() -> Self {
        Self {
            vehicles: ListController::new(seed_vehicles()),
            rentals: ListController::new(seed_rentals()),
            transactions: ListController::new(seed_transactions()),
            debts: ListController::new(seed_debts()),
            goals: ListController::new(seed_goals()),
            settings: Settings::default(),
        }
    }

    /// Back to the seed data, settings included.
    pub fn reset(&mut self) {
        *self = Self::seeded();
        tracing::info!("store reset to seed data");
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap_or_default()
}

fn brl(n: i64) -> Decimal {
    Decimal::from(n)
}

#[allow(clippy::too_many_arguments)]
fn vehicle(
    id: u32,
    plate: &str,
    model: &str,
    year: u32,
    status: VehicleStatus,
    rate: i64,
    docs: DocumentStatus,
    maintenance: (NaiveDate, NaiveDate),
    color: &str,
    category: &str,
    mileage: u32,
) -> Vehicle {
    Vehicle {
        id,
        plate: plate.into(),
        model: model.into(),
        year,
        color: color.into(),
        fuel_type: "Flex".into(),
        category: category.into(),
        rental_value: brl(rate),
        status,
        document_status: docs,
        mileage,
        last_maintenance: maintenance.0,
        next_maintenance: maintenance.1,
    }
}

fn seed_vehicles() -> Vec<Vehicle> {
    vec![
        vehicle(
            1,
            "ABC-1234",
            "Toyota Corolla",
            2022,
            VehicleStatus::Available,
            120,
            DocumentStatus::Regular,
            (d(2024, 5, 15), d(2024, 11, 15)),
            "Prata",
            "Sedan",
            15000,
        ),
        vehicle(
            2,
            "DEF-5678",
            "Honda Civic",
            2021,
            VehicleStatus::Rented,
            110,
            DocumentStatus::Regular,
            (d(2024, 6, 20), d(2024, 12, 20)),
            "Preto",
            "Sedan",
            25000,
        ),
        vehicle(
            3,
            "GHI-9012",
            "Jeep Renegade",
            2023,
            VehicleStatus::Maintenance,
            180,
            DocumentStatus::Pending,
            (d(2024, 7, 10), d(2025, 1, 10)),
            "Branco",
            "SUV",
            8000,
        ),
        vehicle(
            4,
            "JKL-3456",
            "Volkswagen Gol",
            2020,
            VehicleStatus::Available,
            80,
            DocumentStatus::Regular,
            (d(2024, 4, 10), d(2024, 10, 10)),
            "Azul",
            "Hatch",
            45000,
        ),
    ]
}

struct RentalSeed {
    id: u32,
    vehicle: (u32, &'static str, &'static str),
    customer: (&'static str, &'static str, &'static str),
    period: (NaiveDate, NaiveDate),
    rate: i64,
    total: i64,
    method: &'static str,
    status: RentalStatus,
    notes: &'static str,
}

impl RentalSeed {
    fn build(self) -> Rental {
        Rental {
            id: self.id,
            vehicle_id: self.vehicle.0,
            vehicle_plate: self.vehicle.1.into(),
            vehicle_model: self.vehicle.2.into(),
            customer_name: self.customer.0.into(),
            customer_phone: self.customer.1.into(),
            customer_document: self.customer.2.into(),
            start_date: self.period.0,
            end_date: self.period.1,
            daily_rate: brl(self.rate),
            total_amount: brl(self.total),
            payment_method: self.method.into(),
            status: self.status,
            notes: self.notes.into(),
            created_at: self.period.0,
        }
    }
}

fn seed_rentals() -> Vec<Rental> {
    [
        RentalSeed {
            id: 1,
            vehicle: (1, "ABC-1234", "Toyota Corolla"),
            customer: ("João Silva", "(11) 99999-9999", "123.456.789-00"),
            period: (d(2025, 6, 15), d(2025, 6, 22)),
            rate: 120,
            total: 840,
            method: "PIX",
            status: RentalStatus::Active,
            notes: "Cliente preferencial",
        },
        RentalSeed {
            id: 2,
            vehicle: (2, "DEF-5678", "Honda Civic"),
            customer: ("Maria Santos", "(11) 88888-8888", "987.654.321-00"),
            period: (d(2025, 6, 10), d(2025, 6, 17)),
            rate: 110,
            total: 770,
            method: "Cartão",
            status: RentalStatus::Finished,
            notes: "",
        },
        RentalSeed {
            id: 3,
            vehicle: (3, "GHI-9012", "Jeep Renegade"),
            customer: ("Carlos Oliveira", "(11) 77777-7777", "456.789.123-00"),
            period: (d(2025, 6, 20), d(2025, 6, 25)),
            rate: 180,
            total: 900,
            method: "Dinheiro",
            status: RentalStatus::Pending,
            notes: "Aguardando pagamento",
        },
    ]
    .into_iter()
    .map(RentalSeed::build)
    .collect()
}

#[allow(clippy::too_many_arguments)]
fn txn(
    id: u32,
    description: &str,
    amount: i64,
    kind: TxnKind,
    category: &str,
    date: NaiveDate,
    method: &str,
    notes: &str,
) -> PersonalTransaction {
    PersonalTransaction {
        id,
        description: description.into(),
        amount: brl(amount),
        kind,
        category: category.into(),
        date,
        payment_method: method.into(),
        notes: notes.into(),
    }
}

fn seed_transactions() -> Vec<PersonalTransaction> {
    use TxnKind::{Expense, Income};
    vec![
        txn(1, "Salário Mensal", 5000, Income, "Salário", d(2025, 6, 1), "Transferência", "Salário do mês de junho"),
        txn(2, "Supermercado", 350, Expense, "Alimentação", d(2025, 6, 15), "Cartão", "Compras da semana"),
        txn(3, "Combustível", 200, Expense, "Combustível", d(2025, 6, 14), "PIX", "Abastecimento dos veículos"),
        txn(4, "Freelance Design", 1200, Income, "Freelance", d(2025, 6, 10), "PIX", "Projeto de identidade visual"),
        txn(5, "Conta de Luz", 180, Expense, "Contas", d(2025, 6, 8), "Débito Automático", "Conta de energia elétrica"),
    ]
}

fn payment(id: u32, amount: i64, date: NaiveDate, method: &str, notes: &str) -> Payment {
    Payment {
        id,
        amount: brl(amount),
        date,
        method: method.into(),
        notes: notes.into(),
        is_late: false,
    }
}

fn seed_debts() -> Vec<Debt> {
    vec![
        Debt {
            id: 1,
            description: "Financiamento Veículo".into(),
            total_amount: brl(25000),
            remaining_amount: brl(18000),
            monthly_payment: brl(850),
            due_date: Some(d(2025, 7, 5)),
            status: DebtStatus::OnTime,
            category: "Financiamento".into(),
            installments: 36,
            paid_installments: 8,
            notes: "Financiamento do Honda Civic".into(),
            payments: vec![
                payment(1, 850, d(2025, 5, 5), "PIX", "Pagamento em dia"),
                payment(2, 850, d(2025, 4, 5), "PIX", "Pagamento em dia"),
                payment(3, 850, d(2025, 3, 5), "PIX", "Pagamento em dia"),
            ],
        },
        Debt {
            id: 2,
            description: "Cartão de Crédito".into(),
            total_amount: brl(3500),
            remaining_amount: brl(3500),
            monthly_payment: brl(350),
            due_date: Some(d(2025, 6, 25)),
            status: DebtStatus::Overdue,
            category: "Cartão de Crédito".into(),
            installments: 10,
            paid_installments: 0,
            notes: "Fatura em atraso".into(),
            payments: Vec::new(),
        },
        Debt {
            id: 3,
            description: "Empréstimo Pessoal".into(),
            total_amount: brl(10000),
            remaining_amount: brl(4500),
            monthly_payment: brl(450),
            due_date: Some(d(2025, 7, 10)),
            status: DebtStatus::OnTime,
            category: "Empréstimo Pessoal".into(),
            installments: 24,
            paid_installments: 12,
            notes: "Empréstimo para reforma".into(),
            payments: vec![
                payment(1, 450, d(2025, 6, 10), "Débito Automático", "Pagamento automático"),
                payment(2, 450, d(2025, 5, 10), "Débito Automático", "Pagamento automático"),
            ],
        },
    ]
}

fn contribution(
    id: u32,
    amount: i64,
    date: NaiveDate,
    description: &str,
    source: &str,
    is_important: bool,
) -> Contribution {
    Contribution {
        id,
        amount: brl(amount),
        date,
        description: description.into(),
        source: source.into(),
        is_important,
    }
}

fn seed_goals() -> Vec<Goal> {
    vec![
        Goal {
            id: 1,
            title: "Expansão da Frota".into(),
            description: "Comprar 5 novos veículos para locação e aumentar a receita mensal".into(),
            target_amount: brl(150000),
            current_amount: brl(45000),
            deadline: d(2025, 12, 31),
            category: "Negócio".into(),
            status: GoalStatus::InProgress,
            kind: GoalKind::Monetary,
            created_at: d(2025, 1, 15),
            contributions: vec![
                contribution(1, 15000, d(2025, 2, 1), "Lucro Janeiro", "Economia", true),
                contribution(2, 20000, d(2025, 3, 1), "Lucro Fevereiro", "Economia", false),
                contribution(3, 10000, d(2025, 4, 1), "Venda equipamento antigo", "Venda", false),
            ],
        },
        Goal {
            id: 2,
            title: "Reserva de Emergência".into(),
            description: "Criar reserva para 6 meses de despesas operacionais".into(),
            target_amount: brl(30000),
            current_amount: brl(18000),
            deadline: d(2025, 9, 30),
            category: "Pessoal".into(),
            status: GoalStatus::InProgress,
            kind: GoalKind::Monetary,
            created_at: d(2025, 1, 1),
            contributions: vec![
                contribution(1, 5000, d(2025, 1, 31), "Economia mensal", "Economia", false),
                contribution(2, 8000, d(2025, 2, 28), "Bônus trimestral", "Bônus", true),
                contribution(3, 5000, d(2025, 3, 31), "Economia mensal", "Economia", false),
            ],
        },
        Goal {
            id: 3,
            title: "Reforma da Garagem".into(),
            description: "Reformar espaço para acomodar mais veículos".into(),
            target_amount: brl(25000),
            current_amount: brl(25000),
            deadline: d(2025, 6, 30),
            category: "Infraestrutura".into(),
            status: GoalStatus::Completed,
            kind: GoalKind::Monetary,
            created_at: d(2024, 12, 1),
            contributions: vec![contribution(
                1,
                25000,
                d(2025, 5, 15),
                "Investimento completo",
                "Investimento",
                true,
            )],
        },
        Goal {
            id: 4,
            title: "Sistema de Gestão".into(),
            description: "Implementar sistema completo de gestão".into(),
            target_amount: brl(8000),
            current_amount: brl(2000),
            deadline: d(2025, 8, 15),
            category: "Tecnologia".into(),
            status: GoalStatus::InProgress,
            kind: GoalKind::Monetary,
            created_at: d(2025, 2, 1),
            contributions: vec![contribution(
                1,
                2000,
                d(2025, 2, 15),
                "Primeira parcela",
                "Investimento",
                false,
            )],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DebtTotals, FinancialSummary, FleetSummary, GoalTotals};

    #[test]
    fn test_seed_counts() {
        let store = Store::seeded();
        assert_eq!(store.vehicles.len(), 4);
        assert_eq!(store.rentals.len(), 3);
        assert_eq!(store.transactions.len(), 5);
        assert_eq!(store.debts.len(), 3);
        assert_eq!(store.goals.len(), 4);
    }

    #[test]
    fn test_seed_summaries() {
        let store = Store::seeded();
        let fleet = FleetSummary::of(store.vehicles.items());
        assert_eq!(fleet.available, 2);

        let money = FinancialSummary::of(store.transactions.items());
        assert_eq!(money.income, Decimal::from(6200));
        assert_eq!(money.expense, Decimal::from(730));

        let debts = DebtTotals::of(store.debts.items());
        assert_eq!(debts.remaining, Decimal::from(26000));
        assert_eq!(debts.overdue, 1);

        let goals = GoalTotals::of(store.goals.items());
        assert_eq!(goals.completed, 1);
        assert_eq!(goals.current, Decimal::from(90000));
    }

    #[test]
    fn test_reset_restores_seed() {
        let mut store = Store::seeded();
        store.vehicles.remove(1).ok();
        store.settings.theme = "dark".into();
        store.reset();
        assert_eq!(store.vehicles.len(), 4);
        assert_eq!(store.settings.theme, "light");
    }

    #[test]
    fn test_new_ids_follow_seed() {
        let store = Store::seeded();
        assert_eq!(store.rentals.next_id(), 4);
        assert_eq!(Store::empty().goals.next_id(), 1);
    }
}
