use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;

use crate::crud::{FieldSpec, FormValues, Record, Schema, Validator};
use crate::error::Result;

labeled_enum!(VehicleStatus {
    Available => "Disponível",
    Rented => "Alugado",
    Maintenance => "Manutenção",
    Inactive => "Inativo",
});

labeled_enum!(DocumentStatus {
    Regular => "Regular",
    Pending => "Pendente",
    Expired => "Vencido",
});

pub const FUEL_TYPES: &[&str] = &["Flex", "Gasolina", "Etanol", "Diesel", "Elétrico"];
pub const VEHICLE_CATEGORIES: &[&str] = &["Sedan", "Hatch", "SUV", "Pickup", "Van"];

const MAINTENANCE_INTERVAL_DAYS: u64 = 180;

/// Old `ABC-1234` plates and Mercosul `ABC1D23` plates.
static PLATE_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:[A-Z]{3}-[0-9]{4}|[A-Z]{3}[0-9][A-Z][0-9]{2})$").ok());

pub fn is_valid_plate(plate: &str) -> bool {
    PLATE_RE.as_ref().is_some_and(|re| re.is_match(plate))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub id: u32,
    pub plate: String,
    pub model: String,
    pub year: u32,
    pub color: String,
    pub fuel_type: String,
    pub category: String,
    /// Daily rate.
    pub rental_value: Decimal,
    pub status: VehicleStatus,
    pub document_status: DocumentStatus,
    pub mileage: u32,
    pub last_maintenance: NaiveDate,
    pub next_maintenance: NaiveDate,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.model, self.plate)
    }

    pub fn maintenance_due(&self, today: NaiveDate, within_days: u64) -> bool {
        today
            .checked_add_days(Days::new(within_days))
            .is_some_and(|limit| self.next_maintenance <= limit)
    }
}

impl Record for Vehicle {
    const ENTITY: &'static str = "vehicle";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.model, &self.plate]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "document" => Some(self.document_status.as_str()),
            "category" => Some(&self.category),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetSummary {
    pub total: usize,
    pub available: usize,
    pub rented: usize,
    pub maintenance: usize,
    pub inactive: usize,
}

impl FleetSummary {
    pub fn of(vehicles: &[Vehicle]) -> Self {
        vehicles.iter().fold(Self::default(), |mut acc, v| {
            acc.total += 1;
            match v.status {
                VehicleStatus::Available => acc.available += 1,
                VehicleStatus::Rented => acc.rented += 1,
                VehicleStatus::Maintenance => acc.maintenance += 1,
                VehicleStatus::Inactive => acc.inactive += 1,
            }
            acc
        })
    }
}

pub struct VehicleSchema {
    pub today: NaiveDate,
}

impl Schema for VehicleSchema {
    type Record = Vehicle;

    fn title(&self) -> &'static str {
        "Vehicle"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("plate", "Plate").required(),
            FieldSpec::text("model", "Model").required(),
            FieldSpec::integer("year", "Year").required(),
            FieldSpec::text("color", "Color"),
            FieldSpec::choice("fuel_type", "Fuel", FUEL_TYPES),
            FieldSpec::choice("category", "Category", VEHICLE_CATEGORIES),
            FieldSpec::number("rental_value", "Daily rate").required(),
            FieldSpec::choice("status", "Status", &VehicleStatus::labels()),
            FieldSpec::choice("document_status", "Documents", &DocumentStatus::labels()),
        ]
    }

    fn build(&self, form: &FormValues, existing: Option<&Vehicle>) -> Result<Vehicle> {
        let mut v = Validator::new(form);
        let plate = v.required("plate", "Plate").to_uppercase();
        if !plate.is_empty() {
            v.check(
                is_valid_plate(&plate),
                "Plate must look like ABC-1234 or ABC1D23",
            );
        }
        let model = v.required("model", "Model");
        let color = v.text("color");
        let year = v.required_integer("year", "Year");
        let rental_value = v.required_decimal("rental_value", "Daily rate");
        let fuel_type = v.choice("fuel_type", "Fuel", FUEL_TYPES);
        let category = v.choice("category", "Category", VEHICLE_CATEGORIES);
        let status_raw = v.text("status");
        let status = VehicleStatus::parse(&status_raw);
        v.check(
            status_raw.is_empty() || status.is_some(),
            "Status is not a known vehicle status",
        );
        let document_raw = v.text("document_status");
        let document_status = DocumentStatus::parse(&document_raw);
        v.check(
            document_raw.is_empty() || document_status.is_some(),
            "Documents is not a known document status",
        );
        v.finish()?;

        let (mileage, last_maintenance, next_maintenance) = match existing {
            Some(prev) => (prev.mileage, prev.last_maintenance, prev.next_maintenance),
            None => (
                0,
                self.today,
                self.today
                    .checked_add_days(Days::new(MAINTENANCE_INTERVAL_DAYS))
                    .unwrap_or(self.today),
            ),
        };

        Ok(Vehicle {
            id: existing.map_or(0, |prev| prev.id),
            plate,
            model,
            year: year.unwrap_or_default(),
            color,
            fuel_type: non_empty_or(fuel_type, FUEL_TYPES[0]),
            category: non_empty_or(category, VEHICLE_CATEGORIES[0]),
            rental_value: rental_value.unwrap_or_default(),
            status: status.unwrap_or(VehicleStatus::Available),
            document_status: document_status.unwrap_or(DocumentStatus::Regular),
            mileage,
            last_maintenance,
            next_maintenance,
        })
    }

    fn to_form(&self, vehicle: &Vehicle) -> FormValues {
        FormValues::default()
            .with("plate", vehicle.plate.as_str())
            .with("model", vehicle.model.as_str())
            .with("year", vehicle.year.to_string())
            .with("color", vehicle.color.as_str())
            .with("fuel_type", vehicle.fuel_type.as_str())
            .with("category", vehicle.category.as_str())
            .with("rental_value", vehicle.rental_value.to_string())
            .with("status", vehicle.status.as_str())
            .with("document_status", vehicle.document_status.as_str())
    }
}

pub(super) fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
