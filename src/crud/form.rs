use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
    Date,
    Choice(Vec<String>),
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: String,
}

impl FieldSpec {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
            default: String::new(),
        }
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn number(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Number)
    }

    pub fn integer(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Integer)
    }

    pub fn date(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Date)
    }

    /// The first option is the default.
    pub fn choice(key: &'static str, label: &'static str, options: &[&str]) -> Self {
        let mut spec = Self::new(
            key,
            label,
            FieldKind::Choice(options.iter().map(|o| o.to_string()).collect()),
        );
        spec.default = options.first().map(|o| o.to_string()).unwrap_or_default();
        spec
    }

    pub fn toggle(key: &'static str, label: &'static str) -> Self {
        let mut spec = Self::new(key, label, FieldKind::Toggle);
        spec.default = "false".to_string();
        spec
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = value.into();
        self
    }

    pub fn options(&self) -> &[String] {
        match &self.kind {
            FieldKind::Choice(options) => options,
            _ => &[],
        }
    }
}

/// Raw string values of a form, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: BTreeMap<String, String>,
}

impl FormValues {
    pub fn defaults(fields: &[FieldSpec]) -> Self {
        let mut form = Self::default();
        for field in fields {
            form.set(field.key, field.default.clone());
        }
        form
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut form = Self::default();
        for (k, v) in pairs {
            form.set(k, *v);
        }
        form
    }

    /// Missing keys read as empty.
    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }
}

/// Accepts `1234.5`, `1234,5` and `1.234,50`.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let s = raw.trim().trim_start_matches("R$").trim();
    if s.is_empty() {
        return None;
    }
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    Decimal::from_str(&normalized).ok()
}

/// Accepts ISO `2025-06-15` and `15/06/2025`.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

/// Collects every failed check, then reports them together.
pub struct Validator<'a> {
    form: &'a FormValues,
    errors: Vec<String>,
}

impl<'a> Validator<'a> {
    pub fn new(form: &'a FormValues) -> Self {
        Self {
            form,
            errors: Vec::new(),
        }
    }

    pub fn text(&self, key: &str) -> String {
        self.form.get(key).trim().to_string()
    }

    pub fn required(&mut self, key: &str, label: &str) -> String {
        let value = self.text(key);
        if value.is_empty() {
            self.errors.push(format!("{label} is required"));
        }
        value
    }

    pub fn min_len(&mut self, key: &str, label: &str, min: usize) -> String {
        let value = self.text(key);
        if value.is_empty() {
            self.errors.push(format!("{label} is required"));
        } else if value.chars().count() < min {
            self.errors
                .push(format!("{label} must be at least {min} characters"));
        }
        value
    }

    /// Optional number. Present but unparseable is an error.
    pub fn decimal(&mut self, key: &str, label: &str) -> Option<Decimal> {
        let raw = self.text(key);
        if raw.is_empty() {
            return None;
        }
        let parsed = parse_decimal(&raw);
        if parsed.is_none() {
            self.errors.push(format!("{label} must be a number"));
        }
        parsed
    }

    pub fn required_decimal(&mut self, key: &str, label: &str) -> Option<Decimal> {
        if self.text(key).is_empty() {
            self.errors.push(format!("{label} is required"));
            return None;
        }
        self.decimal(key, label)
    }

    /// Required and strictly greater than zero.
    pub fn positive(&mut self, key: &str, label: &str) -> Decimal {
        if self.text(key).is_empty() {
            self.errors.push(format!("{label} is required"));
            return Decimal::ZERO;
        }
        match parse_decimal(&self.text(key)) {
            Some(n) if n > Decimal::ZERO => n,
            _ => {
                self.errors
                    .push(format!("{label} must be a positive number"));
                Decimal::ZERO
            }
        }
    }

    pub fn integer(&mut self, key: &str, label: &str) -> Option<u32> {
        let raw = self.text(key);
        if raw.is_empty() {
            return None;
        }
        let parsed = raw.parse::<u32>().ok();
        if parsed.is_none() {
            self.errors.push(format!("{label} must be a whole number"));
        }
        parsed
    }

    pub fn required_integer(&mut self, key: &str, label: &str) -> Option<u32> {
        if self.text(key).is_empty() {
            self.errors.push(format!("{label} is required"));
            return None;
        }
        self.integer(key, label)
    }

    pub fn date(&mut self, key: &str, label: &str) -> Option<NaiveDate> {
        let raw = self.text(key);
        if raw.is_empty() {
            return None;
        }
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            self.errors
                .push(format!("{label} must be a date (YYYY-MM-DD)"));
        }
        parsed
    }

    pub fn required_date(&mut self, key: &str, label: &str) -> Option<NaiveDate> {
        if self.text(key).is_empty() {
            self.errors.push(format!("{label} is required"));
            return None;
        }
        self.date(key, label)
    }

    /// Value must be one of `options` when present.
    pub fn choice(&mut self, key: &str, label: &str, options: &[&str]) -> String {
        let value = self.text(key);
        if !value.is_empty() && !options.contains(&value.as_str()) {
            self.errors
                .push(format!("{label} must be one of: {}", options.join(", ")));
        }
        value
    }

    pub fn toggle(&self, key: &str) -> bool {
        matches!(
            self.text(key).to_lowercase().as_str(),
            "true" | "yes" | "y" | "1" | "on" | "sim"
        )
    }

    pub fn check(&mut self, ok: bool, message: impl Into<String>) {
        if !ok {
            self.errors.push(message.into());
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

/// An open create/edit dialog. `T` says what a successful submit applies to.
#[derive(Debug, Clone)]
pub struct FormState<T> {
    pub title: String,
    pub fields: Vec<FieldSpec>,
    pub values: FormValues,
    pub focus: usize,
    pub errors: Vec<String>,
    pub target: T,
}

impl<T> FormState<T> {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSpec>, values: FormValues, target: T) -> Self {
        Self {
            title: title.into(),
            fields,
            values,
            focus: 0,
            errors: Vec::new(),
            target,
        }
    }

    pub fn focused(&self) -> Option<&FieldSpec> {
        self.fields.get(self.focus)
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len() - 1);
        }
    }

    /// Typing goes into text-like fields only.
    pub fn input(&mut self, c: char) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        if matches!(field.kind, FieldKind::Choice(_) | FieldKind::Toggle) {
            return;
        }
        let key = field.key;
        let mut value = self.values.get(key).to_string();
        value.push(c);
        self.values.set(key, value);
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        if matches!(field.kind, FieldKind::Choice(_) | FieldKind::Toggle) {
            return;
        }
        let key = field.key;
        let mut value = self.values.get(key).to_string();
        value.pop();
        self.values.set(key, value);
    }

    /// Step a choice field through its options, or flip a toggle.
    pub fn cycle(&mut self, forward: bool) {
        let Some(field) = self.fields.get(self.focus) else {
            return;
        };
        let key = field.key;
        match &field.kind {
            FieldKind::Choice(options) if !options.is_empty() => {
                let current = options.iter().position(|o| o == self.values.get(key));
                let next = match (current, forward) {
                    (None, _) => 0,
                    (Some(i), true) => (i + 1) % options.len(),
                    (Some(0), false) => options.len() - 1,
                    (Some(i), false) => i - 1,
                };
                let value = options[next].clone();
                self.values.set(key, value);
            }
            FieldKind::Toggle => {
                let on = self.values.get(key) == "true";
                self.values.set(key, if on { "false" } else { "true" });
            }
            _ => {}
        }
    }

    /// Replace the field list, keeping values for keys that survive.
    pub fn set_fields(&mut self, fields: Vec<FieldSpec>) {
        self.fields = fields;
        if self.focus >= self.fields.len() {
            self.focus = self.fields.len().saturating_sub(1);
        }
    }
}
