//! Transient toasts and confirmation requests.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const MAX_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl Level {
    pub fn lifetime(&self) -> Duration {
        match self {
            Self::Success | Self::Warning => Duration::from_millis(4000),
            Self::Error => Duration::from_millis(5000),
            Self::Info => Duration::from_millis(3000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub level: Level,
    pub message: String,
    pub description: String,
    pub expires_at: Instant,
}

/// Fire-and-forget feedback. Oldest toasts are dropped past a small cap.
#[derive(Debug, Default)]
pub struct Notifier {
    toasts: VecDeque<Toast>,
}

impl Notifier {
    pub fn push(&mut self, level: Level, message: &str, description: &str, now: Instant) {
        match level {
            Level::Error => tracing::warn!(toast = message, description, "error shown"),
            _ => tracing::info!(?level, toast = message, description, "notification shown"),
        }
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            level,
            message: message.to_string(),
            description: description.to_string(),
            expires_at: now + level.lifetime(),
        });
    }

    pub fn success(&mut self, message: &str, description: &str) {
        self.push(Level::Success, message, description, Instant::now());
    }

    pub fn error(&mut self, message: &str, description: &str) {
        self.push(Level::Error, message, description, Instant::now());
    }

    pub fn warning(&mut self, message: &str, description: &str) {
        self.push(Level::Warning, message, description, Instant::now());
    }

    pub fn info(&mut self, message: &str, description: &str) {
        self.push(Level::Info, message, description, Instant::now());
    }

    /// Drop expired toasts.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires_at > now);
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

// ── Confirmation ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone)]
pub struct ConfirmOptions {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
    pub variant: Variant,
    /// Auto-cancel after this long. `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            title: "Confirm action".to_string(),
            message: "Are you sure you want to continue?".to_string(),
            confirm_text: "Confirm".to_string(),
            cancel_text: "Cancel".to_string(),
            variant: Variant::Default,
            timeout: None,
        }
    }
}

impl ConfirmOptions {
    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: "Delete".to_string(),
            variant: Variant::Destructive,
            ..Self::default()
        }
    }

    pub fn ask(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Pending,
    Confirmed,
    Cancelled,
    TimedOut,
}

/// A question awaiting a yes/no, carrying the action it guards.
///
/// Resolves exactly once; later `resolve`/`cancel` calls are ignored. A
/// timed-out request counts as a "no".
#[derive(Debug)]
pub struct ConfirmRequest<A> {
    pub options: ConfirmOptions,
    action: A,
    opened_at: Instant,
    state: ConfirmState,
}

impl<A> ConfirmRequest<A> {
    pub fn new(options: ConfirmOptions, action: A, now: Instant) -> Self {
        Self {
            options,
            action,
            opened_at: now,
            state: ConfirmState::Pending,
        }
    }

    /// Returns `false` when the request had already settled.
    pub fn resolve(&mut self, confirmed: bool) -> bool {
        if self.state != ConfirmState::Pending {
            return false;
        }
        self.state = if confirmed {
            ConfirmState::Confirmed
        } else {
            ConfirmState::Cancelled
        };
        true
    }

    pub fn cancel(&mut self) {
        self.resolve(false);
    }

    /// The answer once settled. Applies the timeout first.
    pub fn poll(&mut self, now: Instant) -> Option<bool> {
        if self.state == ConfirmState::Pending {
            if let Some(timeout) = self.options.timeout {
                if now.duration_since(self.opened_at) >= timeout {
                    self.state = ConfirmState::TimedOut;
                }
            }
        }
        match self.state {
            ConfirmState::Pending => None,
            ConfirmState::Confirmed => Some(true),
            ConfirmState::Cancelled | ConfirmState::TimedOut => Some(false),
        }
    }

    pub fn state(&self) -> ConfirmState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == ConfirmState::Pending
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn into_action(self) -> A {
        self.action
    }

    /// Seconds left before auto-cancel, for the prompt.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.options
            .timeout
            .map(|t| t.saturating_sub(now.duration_since(self.opened_at)))
    }
}

#[cfg(test)]
mod tests;
