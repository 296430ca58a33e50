//! Error boundaries: catch a failure at some scope, show a fallback, offer
//! recovery. One type covers the app, page and component scopes.

use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    App,
    Page,
    Component,
}

impl Scope {
    pub fn label(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Page => "page",
            Self::Component => "component",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Clear the error and render again. Data is left as it was.
    Retry,
    /// Clear the error and navigate to the dashboard.
    GoHome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryState {
    Ok,
    Errored { message: String, error_id: String },
}

#[derive(Debug, Clone)]
pub struct Boundary {
    scope: Scope,
    actions: &'static [Recovery],
    state: BoundaryState,
}

impl Boundary {
    pub fn new(scope: Scope, actions: &'static [Recovery]) -> Self {
        Self {
            scope,
            actions,
            state: BoundaryState::Ok,
        }
    }

    pub fn page() -> Self {
        Self::new(Scope::Page, &[Recovery::Retry, Recovery::GoHome])
    }

    pub fn component() -> Self {
        Self::new(Scope::Component, &[Recovery::Retry])
    }

    /// Pass `Ok` values through; on `Err` switch to the errored state and log.
    pub fn catch<T>(&mut self, result: anyhow::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let error_id = error_id(SystemTime::now());
                tracing::error!(
                    scope = self.scope.label(),
                    error_id = %error_id,
                    error = ?e,
                    "error boundary caught a failure"
                );
                self.state = BoundaryState::Errored {
                    message: format!("{e:#}"),
                    error_id,
                };
                None
            }
        }
    }

    pub fn is_errored(&self) -> bool {
        matches!(self.state, BoundaryState::Errored { .. })
    }

    pub fn state(&self) -> &BoundaryState {
        &self.state
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn allows(&self, recovery: Recovery) -> bool {
        self.actions.contains(&recovery)
    }

    pub fn actions(&self) -> &'static [Recovery] {
        self.actions
    }

    /// Returns `false` if retry is not offered at this scope.
    pub fn retry(&mut self) -> bool {
        if !self.allows(Recovery::Retry) {
            return false;
        }
        self.state = BoundaryState::Ok;
        true
    }

    /// Where to navigate, if going home is offered at this scope.
    pub fn go_home(&mut self) -> Option<Route> {
        if !self.allows(Recovery::GoHome) {
            return None;
        }
        self.state = BoundaryState::Ok;
        Some(Route::Dashboard)
    }

    /// Forget any error, e.g. when the wrapped page is left.
    pub fn reset(&mut self) {
        self.state = BoundaryState::Ok;
    }
}

/// Random suffix length. Boundaries caught in the same millisecond still differ.
const ERROR_ID_SUFFIX: usize = 8;

/// `<base-36 millis>-<random hex>`, for matching a fallback to its log line.
fn error_id(now: SystemTime) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(ERROR_ID_SUFFIX)
        .collect();
    format!("{}-{suffix}", base36_millis(now))
}

fn base36_millis(now: SystemTime) -> String {
    let mut n = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        let d = (n % 36) as u32;
        digits.push(std::char::from_digit(d, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::time::Duration;

    #[test]
    fn test_ok_passes_through() {
        let mut b = Boundary::page();
        assert_eq!(b.catch(Ok::<_, anyhow::Error>(5)), Some(5));
        assert!(!b.is_errored());
    }

    #[test]
    fn test_err_switches_state() {
        let mut b = Boundary::page();
        let caught: Option<()> = b.catch(Err(anyhow::anyhow!("render failed")));
        assert!(caught.is_none());
        match b.state() {
            BoundaryState::Errored { message, error_id } => {
                assert_eq!(message, "render failed");
                assert!(!error_id.is_empty());
            }
            BoundaryState::Ok => panic!("expected errored state"),
        }
    }

    #[test]
    fn test_context_chain_kept_in_message() {
        use anyhow::Context;
        let mut b = Boundary::component();
        let r: anyhow::Result<()> = Err(anyhow::anyhow!("overflow")).context("fleet summary");
        b.catch(r);
        if let BoundaryState::Errored { message, .. } = b.state() {
            assert_eq!(message, "fleet summary: overflow");
        }
    }

    #[test]
    fn test_retry_resets() {
        let mut b = Boundary::page();
        b.catch::<()>(Err(anyhow::anyhow!("x")));
        assert!(b.retry());
        assert_eq!(b.state(), &BoundaryState::Ok);
    }

    #[test]
    fn test_go_home_navigates() {
        let mut b = Boundary::page();
        b.catch::<()>(Err(anyhow::anyhow!("x")));
        assert_eq!(b.go_home(), Some(Route::Dashboard));
        assert!(!b.is_errored());
    }

    #[test]
    fn test_component_cannot_go_home() {
        let mut b = Boundary::component();
        b.catch::<()>(Err(anyhow::anyhow!("x")));
        assert_eq!(b.go_home(), None);
        assert!(b.is_errored());
        assert!(b.retry());
    }

    #[test]
    fn test_app_scope_without_retry() {
        let mut b = Boundary::new(Scope::App, &[Recovery::GoHome]);
        b.catch::<()>(Err(anyhow::anyhow!("x")));
        assert!(!b.retry());
        assert!(b.is_errored());
        assert_eq!(b.scope().label(), "app");
    }

    #[test]
    fn test_base36_millis() {
        assert_eq!(base36_millis(UNIX_EPOCH), "0");
        assert_eq!(base36_millis(UNIX_EPOCH + Duration::from_millis(35)), "z");
        assert_eq!(base36_millis(UNIX_EPOCH + Duration::from_millis(36)), "10");
    }

    #[test]
    fn test_error_id_has_random_suffix() {
        let now = UNIX_EPOCH + Duration::from_millis(36);
        let id = error_id(now);
        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, "10");
        assert_eq!(suffix.len(), ERROR_ID_SUFFIX);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(error_id(now), error_id(now));
    }

    #[test]
    fn test_back_to_back_catches_get_distinct_ids() {
        let mut stats = Boundary::component();
        let mut alerts = Boundary::component();
        stats.catch::<()>(Err(anyhow::anyhow!("stats")));
        alerts.catch::<()>(Err(anyhow::anyhow!("alerts")));

        let id = |b: &Boundary| match b.state() {
            BoundaryState::Errored { error_id, .. } => error_id.clone(),
            BoundaryState::Ok => String::new(),
        };
        assert!(!id(&stats).is_empty());
        assert_ne!(id(&stats), id(&alerts));
    }
}
