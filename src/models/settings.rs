use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@ ]+@[^@ ]+\.[^@ ]+$").ok());

pub const THEMES: &[&str] = &["light", "dark", "auto"];
pub const LANGUAGES: &[&str] = &["pt-BR", "en-US", "es-ES"];
pub const CURRENCIES: &[&str] = &["BRL", "USD", "EUR"];
pub const DATE_FORMATS: &[&str] = &["DD/MM/YYYY", "MM/DD/YYYY", "YYYY-MM-DD"];
pub const BACKUP_FREQUENCIES: &[&str] = &["daily", "weekly", "monthly"];

/// One row of the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingEntry {
    pub section: &'static str,
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub name: String,
    pub email: String,
    pub phone: String,

    pub email_notifications: bool,
    pub sms_notifications: bool,
    pub push_notifications: bool,
    pub maintenance_alerts: bool,
    pub payment_reminders: bool,

    pub theme: String,
    pub language: String,
    pub currency: String,
    pub date_format: String,

    pub company_name: String,
    pub company_document: String,
    pub company_address: String,

    pub auto_backup: bool,
    pub backup_frequency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            name: "Administrador".to_string(),
            email: "admin@liberdadepro.com".to_string(),
            phone: "(11) 99999-9999".to_string(),
            email_notifications: true,
            sms_notifications: false,
            push_notifications: true,
            maintenance_alerts: true,
            payment_reminders: true,
            theme: "light".to_string(),
            language: "pt-BR".to_string(),
            currency: "BRL".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            company_name: "Liberdade Pro Locações".to_string(),
            company_document: "12.345.678/0001-90".to_string(),
            company_address: "Rua das Flores, 123 - São Paulo, SP".to_string(),
            auto_backup: true,
            backup_frequency: "daily".to_string(),
        }
    }
}

impl Settings {
    /// Options for keys that only take a fixed set of values.
    pub fn choices(key: &str) -> Option<&'static [&'static str]> {
        match key {
            "theme" => Some(THEMES),
            "language" => Some(LANGUAGES),
            "currency" => Some(CURRENCIES),
            "date_format" => Some(DATE_FORMATS),
            "backup_frequency" => Some(BACKUP_FREQUENCIES),
            _ => None,
        }
    }

    pub fn is_toggle(key: &str) -> bool {
        matches!(
            key,
            "email_notifications"
                | "sms_notifications"
                | "push_notifications"
                | "maintenance_alerts"
                | "payment_reminders"
                | "auto_backup"
        )
    }

    pub fn entries(&self) -> Vec<SettingEntry> {
        let flag = |b: bool| String::from(if b { "on" } else { "off" });
        let rows: [(&'static str, &'static str, String); 17] = [
            ("Profile", "name", self.name.clone()),
            ("Profile", "email", self.email.clone()),
            ("Profile", "phone", self.phone.clone()),
            ("Notifications", "email_notifications", flag(self.email_notifications)),
            ("Notifications", "sms_notifications", flag(self.sms_notifications)),
            ("Notifications", "push_notifications", flag(self.push_notifications)),
            ("Notifications", "maintenance_alerts", flag(self.maintenance_alerts)),
            ("Notifications", "payment_reminders", flag(self.payment_reminders)),
            ("System", "theme", self.theme.clone()),
            ("System", "language", self.language.clone()),
            ("System", "currency", self.currency.clone()),
            ("System", "date_format", self.date_format.clone()),
            ("Business", "company_name", self.company_name.clone()),
            ("Business", "company_document", self.company_document.clone()),
            ("Business", "company_address", self.company_address.clone()),
            ("Backup", "auto_backup", flag(self.auto_backup)),
            ("Backup", "backup_frequency", self.backup_frequency.clone()),
        ];
        rows.into_iter()
            .map(|(section, key, value)| SettingEntry {
                section,
                key,
                value,
            })
            .collect()
    }

    /// Set one key from user input. Invalid values leave the settings as
    /// they were.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();

        if Self::is_toggle(key) {
            let on = parse_flag(value)
                .ok_or_else(|| Error::invalid(format!("{key} must be on or off")))?;
            let slot = match key {
                "email_notifications" => &mut self.email_notifications,
                "sms_notifications" => &mut self.sms_notifications,
                "push_notifications" => &mut self.push_notifications,
                "maintenance_alerts" => &mut self.maintenance_alerts,
                "payment_reminders" => &mut self.payment_reminders,
                _ => &mut self.auto_backup,
            };
            *slot = on;
            return Ok(());
        }

        if let Some(options) = Self::choices(key) {
            let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(value)) else {
                return Err(Error::invalid(format!(
                    "{key} must be one of: {}",
                    options.join(", ")
                )));
            };
            let slot = match key {
                "theme" => &mut self.theme,
                "language" => &mut self.language,
                "currency" => &mut self.currency,
                "date_format" => &mut self.date_format,
                _ => &mut self.backup_frequency,
            };
            *slot = option.to_string();
            return Ok(());
        }

        let slot = match key {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "company_name" => &mut self.company_name,
            "company_document" => &mut self.company_document,
            "company_address" => &mut self.company_address,
            _ => return Err(Error::invalid(format!("Unknown setting: {key}"))),
        };
        if key == "name" && value.is_empty() {
            return Err(Error::invalid("Name is required"));
        }
        if key == "email" && !EMAIL_RE.as_ref().is_some_and(|re| re.is_match(value)) {
            return Err(Error::invalid("Email must be a valid address"));
        }
        *slot = value.to_string();
        Ok(())
    }

    /// Flip a toggle key.
    pub fn toggle(&mut self, key: &str) -> Result<bool> {
        let current = self
            .entries()
            .into_iter()
            .find(|e| e.key == key && Self::is_toggle(key))
            .map(|e| e.value == "on")
            .ok_or_else(|| Error::invalid(format!("{key} is not an on/off setting")))?;
        self.set(key, if current { "off" } else { "on" })?;
        Ok(!current)
    }

    /// Step a choice key to its next option.
    pub fn cycle(&mut self, key: &str) -> Result<String> {
        let options =
            Self::choices(key).ok_or_else(|| Error::invalid(format!("{key} has no options")))?;
        let current = self
            .entries()
            .into_iter()
            .find(|e| e.key == key)
            .map(|e| e.value)
            .unwrap_or_default();
        let next = options
            .iter()
            .position(|o| *o == current)
            .map_or(0, |i| (i + 1) % options.len());
        self.set(key, options[next])?;
        Ok(options[next].to_string())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" | "sim" => Some(true),
        "off" | "false" | "no" | "n" | "0" | "nao" | "não" => Some(false),
        _ => None,
    }
}
