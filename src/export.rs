//! CSV export of the entity lists.

use std::path::Path;

use crate::error::{Error, Result};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Vehicles,
    Rentals,
    Transactions,
    Debts,
    Goals,
}

impl Entity {
    pub fn all() -> &'static [Entity] {
        &[
            Self::Vehicles,
            Self::Rentals,
            Self::Transactions,
            Self::Debts,
            Self::Goals,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Vehicles => "vehicles",
            Self::Rentals => "rentals",
            Self::Transactions => "transactions",
            Self::Debts => "debts",
            Self::Goals => "goals",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|e| e.name() == lower || e.name().trim_end_matches('s') == lower)
            .ok_or_else(|| {
                Error::invalid(format!(
                    "Unknown entity '{s}'. Expected one of: {}",
                    Self::all()
                        .iter()
                        .map(Entity::name)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }

    /// Default export file name, e.g. `fleetui-vehicles.csv`.
    pub fn file_name(&self) -> String {
        format!("fleetui-{}.csv", self.name())
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Header plus one row per record, all as plain strings.
fn rows(store: &Store, entity: Entity) -> (Vec<&'static str>, Vec<Vec<String>>) {
    match entity {
        Entity::Vehicles => (
            vec![
                "id", "plate", "model", "year", "color", "fuel_type", "category",
                "rental_value", "status", "document_status", "mileage",
                "last_maintenance", "next_maintenance",
            ],
            store
                .vehicles
                .items()
                .iter()
                .map(|v| {
                    vec![
                        v.id.to_string(),
                        v.plate.clone(),
                        v.model.clone(),
                        v.year.to_string(),
                        v.color.clone(),
                        v.fuel_type.clone(),
                        v.category.clone(),
                        v.rental_value.to_string(),
                        v.status.to_string(),
                        v.document_status.to_string(),
                        v.mileage.to_string(),
                        v.last_maintenance.to_string(),
                        v.next_maintenance.to_string(),
                    ]
                })
                .collect(),
        ),
        Entity::Rentals => (
            vec![
                "id", "vehicle_id", "vehicle_plate", "vehicle_model", "customer_name",
                "customer_phone", "customer_document", "start_date", "end_date", "daily_rate",
                "total_amount", "payment_method", "status", "notes", "created_at",
            ],
            store
                .rentals
                .items()
                .iter()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.vehicle_id.to_string(),
                        r.vehicle_plate.clone(),
                        r.vehicle_model.clone(),
                        r.customer_name.clone(),
                        r.customer_phone.clone(),
                        r.customer_document.clone(),
                        r.start_date.to_string(),
                        r.end_date.to_string(),
                        r.daily_rate.to_string(),
                        r.total_amount.to_string(),
                        r.payment_method.clone(),
                        r.status.to_string(),
                        r.notes.clone(),
                        r.created_at.to_string(),
                    ]
                })
                .collect(),
        ),
        Entity::Transactions => (
            vec![
                "id", "date", "description", "type", "category", "amount",
                "payment_method", "notes",
            ],
            store
                .transactions
                .items()
                .iter()
                .map(|t| {
                    vec![
                        t.id.to_string(),
                        t.date.to_string(),
                        t.description.clone(),
                        t.kind.as_str().to_string(),
                        t.category.clone(),
                        t.signed_amount().to_string(),
                        t.payment_method.clone(),
                        t.notes.clone(),
                    ]
                })
                .collect(),
        ),
        Entity::Debts => (
            vec![
                "id", "description", "category", "total_amount", "remaining_amount",
                "monthly_payment", "due_date", "status", "installments",
                "paid_installments", "payments", "notes",
            ],
            store
                .debts
                .items()
                .iter()
                .map(|d| {
                    vec![
                        d.id.to_string(),
                        d.description.clone(),
                        d.category.clone(),
                        d.total_amount.to_string(),
                        d.remaining_amount.to_string(),
                        d.monthly_payment.to_string(),
                        d.due_date.map(|x| x.to_string()).unwrap_or_default(),
                        d.status.to_string(),
                        d.installments.to_string(),
                        d.paid_installments.to_string(),
                        d.payments.len().to_string(),
                        d.notes.clone(),
                    ]
                })
                .collect(),
        ),
        Entity::Goals => (
            vec![
                "id", "title", "category", "kind", "status", "target_amount",
                "current_amount", "deadline", "created_at", "contributions", "description",
            ],
            store
                .goals
                .items()
                .iter()
                .map(|g| {
                    vec![
                        g.id.to_string(),
                        g.title.clone(),
                        g.category.clone(),
                        g.kind.to_string(),
                        g.status.to_string(),
                        g.target_amount.to_string(),
                        g.current_amount.to_string(),
                        g.deadline.to_string(),
                        g.created_at.to_string(),
                        g.contributions.len().to_string(),
                        g.description.clone(),
                    ]
                })
                .collect(),
        ),
    }
}

/// Write one entity list to `path`. Returns the number of records written.
pub fn export(store: &Store, entity: Entity, path: &Path) -> Result<usize> {
    let (header, records) = rows(store, entity);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;
    for record in &records {
        writer.write_record(record)?;
    }
    writer.flush()?;
    tracing::info!(%entity, count = records.len(), path = %path.display(), "exported csv");
    Ok(records.len())
}
