use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::vehicle::{Vehicle, VehicleStatus};
use crate::crud::{FieldSpec, FormValues, Record, Schema, Validator};
use crate::error::Result;
use crate::ui::util::{format_amount, format_date};

labeled_enum!(RentalStatus {
    Active => "Ativo",
    Finished => "Finalizado",
    Pending => "Pendente",
    Cancelled => "Cancelado",
});

pub const RENTAL_PAYMENT_METHODS: &[&str] = &["Dinheiro", "PIX", "Cartão", "Transferência"];

#[derive(Debug, Clone, PartialEq)]
pub struct Rental {
    pub id: u32,
    /// Not checked against the fleet; the plate and model below are a copy.
    pub vehicle_id: u32,
    pub vehicle_plate: String,
    pub vehicle_model: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_document: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_rate: Decimal,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub status: RentalStatus,
    pub notes: String,
    pub created_at: NaiveDate,
}

impl Rental {
    pub fn days(&self) -> i64 {
        rental_days(self.start_date, self.end_date)
    }

    pub fn set_status(&mut self, status: RentalStatus) {
        self.status = status;
    }
}

/// Whole days between the two dates, in either order.
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().abs()
}

pub fn rental_total(start: NaiveDate, end: NaiveDate, daily_rate: Decimal) -> Decimal {
    Decimal::from(rental_days(start, end)) * daily_rate
}

/// Printable contract summary for a rental.
pub fn contract_text(rental: &Rental) -> String {
    let mut lines = vec![
        format!("RENTAL CONTRACT #{}", rental.id),
        String::new(),
        format!("Customer:  {}", rental.customer_name),
    ];
    if !rental.customer_document.is_empty() {
        lines.push(format!("Document:  {}", rental.customer_document));
    }
    if !rental.customer_phone.is_empty() {
        lines.push(format!("Phone:     {}", rental.customer_phone));
    }
    lines.push(format!(
        "Vehicle:   {} ({})",
        rental.vehicle_model, rental.vehicle_plate
    ));
    lines.push(format!(
        "Period:    {} to {} ({} days)",
        format_date(rental.start_date),
        format_date(rental.end_date),
        rental.days()
    ));
    lines.push(format!("Daily:     {}", format_amount(rental.daily_rate)));
    lines.push(format!("Total:     {}", format_amount(rental.total_amount)));
    lines.push(format!("Payment:   {}", rental.payment_method));
    lines.push(format!("Status:    {}", rental.status));
    if !rental.notes.is_empty() {
        lines.push(format!("Notes:     {}", rental.notes));
    }
    lines.join("\n")
}

impl Record for Rental {
    const ENTITY: &'static str = "rental";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.customer_name, &self.vehicle_model, &self.vehicle_plate]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        (name == "status").then_some(self.status.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RentalSummary {
    pub total: usize,
    pub active: usize,
    pub finished: usize,
    pub pending: usize,
    pub cancelled: usize,
    pub revenue: Decimal,
}

impl RentalSummary {
    pub fn of(rentals: &[Rental]) -> Self {
        rentals.iter().fold(Self::default(), |mut acc, r| {
            acc.total += 1;
            acc.revenue += r.total_amount;
            match r.status {
                RentalStatus::Active => acc.active += 1,
                RentalStatus::Finished => acc.finished += 1,
                RentalStatus::Pending => acc.pending += 1,
                RentalStatus::Cancelled => acc.cancelled += 1,
            }
            acc
        })
    }
}

/// A vehicle as offered in the rental form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentableVehicle {
    pub id: u32,
    pub plate: String,
    pub model: String,
    pub daily_rate: Decimal,
}

impl RentableVehicle {
    /// Every vehicle currently available in the fleet.
    pub fn from_fleet(vehicles: &[Vehicle]) -> Vec<Self> {
        vehicles
            .iter()
            .filter(|v| v.status == VehicleStatus::Available)
            .map(|v| Self {
                id: v.id,
                plate: v.plate.clone(),
                model: v.model.clone(),
                daily_rate: v.rental_value,
            })
            .collect()
    }
}

pub struct RentalSchema {
    pub vehicles: Vec<RentableVehicle>,
    pub today: NaiveDate,
}

impl RentalSchema {
    fn vehicle(&self, plate: &str) -> Option<&RentableVehicle> {
        self.vehicles.iter().find(|v| v.plate.eq_ignore_ascii_case(plate))
    }

    fn plates(&self) -> Vec<&str> {
        self.vehicles.iter().map(|v| v.plate.as_str()).collect()
    }
}

impl Schema for RentalSchema {
    type Record = Rental;

    fn title(&self) -> &'static str {
        "Rental"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::choice("vehicle", "Vehicle", &self.plates())
                .default_value("")
                .required(),
            FieldSpec::text("customer_name", "Customer").required(),
            FieldSpec::text("customer_phone", "Phone"),
            FieldSpec::text("customer_document", "Document"),
            FieldSpec::date("start_date", "Start").required(),
            FieldSpec::date("end_date", "End").required(),
            FieldSpec::number("daily_rate", "Daily rate"),
            FieldSpec::choice("payment_method", "Payment", RENTAL_PAYMENT_METHODS),
            FieldSpec::choice("status", "Status", &RentalStatus::labels()),
            FieldSpec::text("notes", "Notes"),
        ]
    }

    /// Picking a vehicle copies its daily rate into the form.
    fn on_change(&self, key: &str, form: &mut FormValues) {
        if key == "vehicle" {
            if let Some(vehicle) = self.vehicle(form.get("vehicle")) {
                let rate = vehicle.daily_rate.to_string();
                form.set("daily_rate", rate);
            }
        }
    }

    fn build(&self, form: &FormValues, existing: Option<&Rental>) -> Result<Rental> {
        let mut v = Validator::new(form);
        let plate = v.required("vehicle", "Vehicle");
        let picked = self.vehicle(&plate);
        // an edited rental may keep a vehicle that is no longer available
        let kept = existing.filter(|prev| prev.vehicle_plate.eq_ignore_ascii_case(&plate));
        if !plate.is_empty() {
            v.check(
                picked.is_some() || kept.is_some(),
                format!("Vehicle {plate} is not available for rent"),
            );
        }
        let customer_name = v.required("customer_name", "Customer");
        let customer_phone = v.text("customer_phone");
        let customer_document = v.text("customer_document");
        let start = v.required_date("start_date", "Start");
        let end = v.required_date("end_date", "End");
        let rate = v.decimal("daily_rate", "Daily rate");
        if let Some(rate) = rate {
            v.check(rate >= Decimal::ZERO, "Daily rate cannot be negative");
        }
        let payment_method = v.choice("payment_method", "Payment", RENTAL_PAYMENT_METHODS);
        let status_raw = v.text("status");
        let status = RentalStatus::parse(&status_raw);
        v.check(
            status_raw.is_empty() || status.is_some(),
            "Status is not a known rental status",
        );
        let notes = v.text("notes");
        v.finish()?;

        let (vehicle_id, vehicle_plate, vehicle_model, vehicle_rate) = match (picked, kept) {
            (Some(p), _) => (p.id, p.plate.clone(), p.model.clone(), p.daily_rate),
            (None, Some(k)) => (
                k.vehicle_id,
                k.vehicle_plate.clone(),
                k.vehicle_model.clone(),
                k.daily_rate,
            ),
            (None, None) => (0, plate, String::new(), Decimal::ZERO),
        };
        let daily_rate = rate.unwrap_or(vehicle_rate);
        let start_date = start.unwrap_or(self.today);
        let end_date = end.unwrap_or(self.today);

        Ok(Rental {
            id: existing.map_or(0, |prev| prev.id),
            vehicle_id,
            vehicle_plate,
            vehicle_model,
            customer_name,
            customer_phone,
            customer_document,
            start_date,
            end_date,
            daily_rate,
            total_amount: rental_total(start_date, end_date, daily_rate),
            payment_method: super::vehicle::non_empty_or(payment_method, RENTAL_PAYMENT_METHODS[0]),
            status: status.unwrap_or(RentalStatus::Active),
            notes,
            created_at: existing.map_or(self.today, |prev| prev.created_at),
        })
    }

    fn to_form(&self, rental: &Rental) -> FormValues {
        FormValues::default()
            .with("vehicle", rental.vehicle_plate.as_str())
            .with("customer_name", rental.customer_name.as_str())
            .with("customer_phone", rental.customer_phone.as_str())
            .with("customer_document", rental.customer_document.as_str())
            .with("start_date", rental.start_date.to_string())
            .with("end_date", rental.end_date.to_string())
            .with("daily_rate", rental.daily_rate.to_string())
            .with("payment_method", rental.payment_method.as_str())
            .with("status", rental.status.as_str())
            .with("notes", rental.notes.as_str())
    }
}
