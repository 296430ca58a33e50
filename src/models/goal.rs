use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::crud::{FieldSpec, FormValues, Record, Schema, Validator};
use crate::error::{Error, Result};

labeled_enum!(GoalStatus {
    InProgress => "Em andamento",
    Completed => "Concluída",
    Paused => "Pausada",
    Late => "Atrasada",
});

labeled_enum!(GoalKind {
    Monetary => "Valor monetário",
    Quantity => "Quantidade",
    Percentage => "Percentual",
});

pub const GOAL_CATEGORIES: &[&str] = &[
    "Negócio",
    "Pessoal",
    "Investimento",
    "Infraestrutura",
    "Tecnologia",
    "Educação",
    "Saúde",
    "Outros",
];

pub const VALUE_SOURCES: &[&str] = &[
    "Economia",
    "Investimento",
    "Venda",
    "Salário",
    "Freelance",
    "Bônus",
    "Outros",
];

/// Adding value past this share of the target needs an explicit override.
const OVERSHOOT_RATIO: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// Average month length used for projections.
const DAYS_PER_CONTRIBUTION: u32 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub id: u32,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub source: String,
    pub is_important: bool,
}

impl Record for Contribution {
    const ENTITY: &'static str = "contribution";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.description, &self.source]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddValueOutcome {
    Applied { reached_target: bool },
    /// The new total would be `percent`% of the target; ask before applying.
    NeedsConfirmation { percent: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub average: Decimal,
    pub needed: u32,
    pub days: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    pub category: String,
    pub status: GoalStatus,
    pub kind: GoalKind,
    pub created_at: NaiveDate,
    pub contributions: Vec<Contribution>,
}

impl Goal {
    /// Add a contribution. Totals at or past 120% of the target come back as
    /// `NeedsConfirmation` unless `confirmed` is set.
    pub fn add_value(&mut self, mut contribution: Contribution, confirmed: bool) -> Result<AddValueOutcome> {
        if contribution.amount <= Decimal::ZERO {
            return Err(Error::invalid("Value must be greater than zero"));
        }

        let new_total = self.current_amount + contribution.amount;
        if !confirmed && self.target_amount > Decimal::ZERO && new_total >= self.target_amount * OVERSHOOT_RATIO {
            let percent = (new_total / self.target_amount * Decimal::ONE_HUNDRED)
                .round()
                .to_u32()
                .unwrap_or(u32::MAX);
            tracing::debug!(goal = self.id, percent, "contribution overshoots target");
            return Ok(AddValueOutcome::NeedsConfirmation { percent });
        }

        let was_completed = self.status == GoalStatus::Completed;
        contribution.id = self.contributions.len() as u32 + 1;
        self.current_amount = new_total;
        self.contributions.push(contribution);

        let reached = new_total >= self.target_amount;
        if reached {
            self.status = GoalStatus::Completed;
        }
        tracing::info!(goal = self.id, current = %self.current_amount, "goal value added");
        Ok(AddValueOutcome::Applied {
            reached_target: reached && !was_completed,
        })
    }

    pub fn complete(&mut self) {
        self.status = GoalStatus::Completed;
    }

    pub fn pause(&mut self) {
        self.status = GoalStatus::Paused;
    }

    pub fn resume(&mut self) {
        self.status = GoalStatus::InProgress;
    }

    /// Days until the deadline; zero or negative means overdue.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.deadline - today).num_days()
    }

    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }

    pub fn progress_percent(&self) -> u16 {
        if self.target_amount <= Decimal::ZERO {
            return 0;
        }
        (self.current_amount / self.target_amount * Decimal::ONE_HUNDRED)
            .round()
            .to_u16()
            .unwrap_or(0)
            .min(100)
    }

    /// Based on the average positive contribution so far.
    pub fn projection(&self) -> Option<Projection> {
        let positive: Vec<Decimal> = self
            .contributions
            .iter()
            .map(|c| c.amount)
            .filter(|a| *a > Decimal::ZERO)
            .collect();
        if positive.is_empty() {
            return None;
        }
        let average = positive.iter().sum::<Decimal>() / Decimal::from(positive.len());
        let needed = (self.remaining() / average).ceil().to_u32()?;
        Some(Projection {
            average,
            needed,
            days: needed.saturating_mul(DAYS_PER_CONTRIBUTION),
        })
    }
}

impl Record for Goal {
    const ENTITY: &'static str = "goal";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.title, &self.description, &self.category]
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
pub struct GoalTotals {
    pub count: usize,
    pub completed: usize,
    pub target: Decimal,
    pub current: Decimal,
}

impl GoalTotals {
    pub fn of(goals: &[Goal]) -> Self {
        goals.iter().fold(Self::default(), |mut acc, g| {
            acc.count += 1;
            if g.status == GoalStatus::Completed {
                acc.completed += 1;
            }
            acc.target += g.target_amount;
            acc.current += g.current_amount;
            acc
        })
    }
}

pub struct GoalSchema {
    pub today: NaiveDate,
}

impl Schema for GoalSchema {
    type Record = Goal;

    fn title(&self) -> &'static str {
        "Goal"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("title", "Title").required(),
            FieldSpec::text("description", "Description"),
            FieldSpec::number("target_amount", "Target").required(),
            FieldSpec::number("current_amount", "Initial value"),
            FieldSpec::date("deadline", "Deadline").required(),
            FieldSpec::choice("category", "Category", GOAL_CATEGORIES)
                .default_value("")
                .required(),
            FieldSpec::choice("kind", "Kind", &GoalKind::labels()),
            FieldSpec::choice("status", "Status", &GoalStatus::labels()),
        ]
    }

    fn build(&self, form: &FormValues, existing: Option<&Goal>) -> Result<Goal> {
        let mut v = Validator::new(form);
        let title = v.required("title", "Title");
        let description = v.text("description");
        let target_amount = v.positive("target_amount", "Target");
        let initial = v.decimal("current_amount", "Initial value").unwrap_or_default();
        v.check(initial >= Decimal::ZERO, "Initial value cannot be negative");
        if target_amount > Decimal::ZERO {
            v.check(
                initial <= target_amount,
                "Initial value cannot exceed the target",
            );
        }
        let deadline = v.required_date("deadline", "Deadline");
        // an existing goal may already be past its deadline
        if existing.is_none() {
            if let Some(deadline) = deadline {
                v.check(deadline >= self.today, "Deadline cannot be in the past");
            }
        }
        let category = v.required("category", "Category");
        let kind_raw = v.text("kind");
        let kind = GoalKind::parse(&kind_raw);
        v.check(kind_raw.is_empty() || kind.is_some(), "Kind is not a known goal kind");
        let status_raw = v.text("status");
        let status = GoalStatus::parse(&status_raw);
        v.check(
            status_raw.is_empty() || status.is_some(),
            "Status is not a known goal status",
        );
        v.finish()?;

        let deadline = deadline.unwrap_or(self.today);
        let kind = kind.unwrap_or(GoalKind::Monetary);
        let status = status.unwrap_or(GoalStatus::InProgress);

        Ok(match existing {
            Some(prev) => Goal {
                id: prev.id,
                title,
                description,
                target_amount,
                current_amount: prev.current_amount,
                deadline,
                category,
                status,
                kind,
                created_at: prev.created_at,
                contributions: prev.contributions.clone(),
            },
            None => {
                let contributions = if initial > Decimal::ZERO {
                    vec![Contribution {
                        id: 1,
                        amount: initial,
                        date: self.today,
                        description: "Valor inicial".to_string(),
                        source: "Investimento".to_string(),
                        is_important: true,
                    }]
                } else {
                    Vec::new()
                };
                Goal {
                    id: 0,
                    title,
                    description,
                    target_amount,
                    current_amount: initial,
                    deadline,
                    category,
                    status,
                    kind,
                    created_at: self.today,
                    contributions,
                }
            }
        })
    }

    fn to_form(&self, goal: &Goal) -> FormValues {
        FormValues::default()
            .with("title", goal.title.as_str())
            .with("description", goal.description.as_str())
            .with("target_amount", goal.target_amount.to_string())
            .with("current_amount", goal.current_amount.to_string())
            .with("deadline", goal.deadline.to_string())
            .with("category", goal.category.as_str())
            .with("kind", goal.kind.as_str())
            .with("status", goal.status.as_str())
    }
}

pub struct ContributionSchema {
    pub today: NaiveDate,
}

impl Schema for ContributionSchema {
    type Record = Contribution;

    fn title(&self) -> &'static str {
        "Add value"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("amount", "Amount").required(),
            FieldSpec::date("date", "Date")
                .default_value(self.today.to_string())
                .required(),
            FieldSpec::text("description", "Description"),
            FieldSpec::choice("source", "Source", VALUE_SOURCES),
            FieldSpec::toggle("is_important", "Important"),
        ]
    }

    fn build(&self, form: &FormValues, existing: Option<&Contribution>) -> Result<Contribution> {
        let mut v = Validator::new(form);
        let amount = v.positive("amount", "Amount");
        let date = v.required_date("date", "Date");
        let description = v.text("description");
        let source = v.choice("source", "Source", VALUE_SOURCES);
        let is_important = v.toggle("is_important");
        v.finish()?;

        Ok(Contribution {
            id: existing.map_or(0, |prev| prev.id),
            amount,
            date: date.unwrap_or(self.today),
            description,
            source: super::vehicle::non_empty_or(source, VALUE_SOURCES[0]),
            is_important,
        })
    }

    fn to_form(&self, c: &Contribution) -> FormValues {
        FormValues::default()
            .with("amount", c.amount.to_string())
            .with("date", c.date.to_string())
            .with("description", c.description.as_str())
            .with("source", c.source.as_str())
            .with("is_important", c.is_important.to_string())
    }
}
