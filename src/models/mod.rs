/// Closed set of display labels stored as the record's status/category.
/// Labels are the values users see and filter on.
macro_rules! labeled_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            pub fn all() -> &'static [$name] {
                &[$(Self::$variant),+]
            }

            pub fn labels() -> Vec<&'static str> {
                Self::all().iter().map(|v| v.as_str()).collect()
            }

            /// Case- and accent-insensitive, so `manutencao` finds `Manutenção`.
            pub fn parse(s: &str) -> Option<Self> {
                let wanted = $crate::models::fold(s);
                Self::all()
                    .iter()
                    .copied()
                    .find(|v| $crate::models::fold(v.as_str()) == wanted)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

mod debt;
mod goal;
mod personal;
mod rental;
mod settings;
mod vehicle;

pub use debt::{
    default_installments, Debt, DebtSchema, DebtStatus, DebtTotals, Payment, PaymentSchema,
    DEBT_CATEGORIES, PAYMENT_METHODS,
};
pub use goal::{
    AddValueOutcome, Contribution, ContributionSchema, Goal, GoalKind, GoalSchema, GoalStatus,
    GoalTotals, Projection, GOAL_CATEGORIES, VALUE_SOURCES,
};
pub use personal::{
    category_breakdown, CategoryTotal, FinancialSummary, PersonalSchema, PersonalTransaction,
    TxnKind, EXPENSE_CATEGORIES, INCOME_CATEGORIES, PERSONAL_PAYMENT_METHODS,
};
pub use rental::{
    contract_text, rental_days, rental_total, Rental, RentalSchema, RentalStatus, RentalSummary,
    RentableVehicle, RENTAL_PAYMENT_METHODS,
};
pub use settings::{SettingEntry, Settings};
pub use vehicle::{
    is_valid_plate, DocumentStatus, FleetSummary, Vehicle, VehicleSchema, VehicleStatus,
    FUEL_TYPES, VEHICLE_CATEGORIES,
};

/// Lowercase and strip Portuguese diacritics.
pub fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
