#![allow(clippy::unwrap_used)]

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::app::*;
use crate::config::UiConfig;
use crate::logging::init_test_logging;
use crate::models::{DebtStatus, FinancialSummary, GoalStatus, GoalTotals, DebtTotals, RentalStatus};
use crate::routes::Route;
use crate::session::{AuthContext, MemoryStorage};
use crate::store::Store;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 20).unwrap()
}

fn ui() -> UiConfig {
    UiConfig {
        loading_delay_ms: 0,
        confirm_timeout_secs: 0,
        ..UiConfig::default()
    }
}

fn auth(signed_in: bool) -> AuthContext {
    let mut auth = AuthContext::new(Box::new(MemoryStorage::default()));
    auth.init();
    if signed_in {
        assert!(auth.login("admin@liberdadepro.com", "admin123").success);
    }
    auth
}

fn signed_out() -> App {
    init_test_logging();
    App::new(auth(false), Store::seeded(), &ui(), today())
}

fn signed_in() -> App {
    init_test_logging();
    App::new(auth(true), Store::seeded(), &ui(), today())
}

fn has_toast(app: &App, message: &str) -> bool {
    app.notifier.toasts().any(|t| t.message == message)
}

fn select(app: &mut App, id: u32) {
    app.move_to_top();
    while app.selected_id() != Some(id) {
        let before = app.view().index;
        app.move_down();
        assert_ne!(app.view().index, before, "record #{id} not visible");
    }
}

// ── Session and routing ──────────────────────────────────────

#[test]
fn test_unauthenticated_start_lands_on_login() {
    let app = signed_out();
    assert_eq!(app.route, Route::Login);
    assert_eq!(app.input_mode, InputMode::Editing);
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.target, FormTarget::Login);
    assert_eq!(form.values.get("email"), "admin@liberdadepro.com");
}

#[test]
fn test_bad_password_keeps_login_form() {
    let mut app = signed_out();
    app.form.as_mut().unwrap().values.set("password", "wrong");
    app.submit_form();

    assert_eq!(app.route, Route::Login);
    assert!(!app.auth.is_authenticated());
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.errors, vec!["Invalid credentials".to_string()]);
    assert_eq!(form.values.get("password"), "");
    assert!(has_toast(&app, "Authentication error"));
}

#[test]
fn test_empty_email_is_a_validation_error() {
    let mut app = signed_out();
    app.form.as_mut().unwrap().values.set("email", "");
    app.submit_form();
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.errors, vec!["Email is required".to_string()]);
    assert!(!app.auth.is_authenticated());
}

#[test]
fn test_demo_login_lands_on_dashboard() {
    let mut app = signed_out();
    app.submit_form();

    assert!(app.auth.is_authenticated());
    assert_eq!(app.route, Route::Dashboard);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.form.is_none());
    assert!(app.dashboard.stats.is_some());
    assert!(has_toast(&app, "Login successful"));
}

#[test]
fn test_guard_redirects_both_ways() {
    let mut app = signed_out();
    app.navigate(Route::Vehicles);
    assert_eq!(app.route, Route::Login);

    let mut app = signed_in();
    app.navigate(Route::Login);
    assert_eq!(app.route, Route::Dashboard);
    app.navigate(Route::Debts);
    assert_eq!(app.route, Route::Debts);
}

#[test]
fn test_logout_goes_back_to_login() {
    let mut app = signed_in();
    app.ask(
        crate::notify::ConfirmOptions::ask("Log out", "End the current session?"),
        PendingAction::Logout,
    );
    app.resolve_confirm(true);
    assert!(!app.auth.is_authenticated());
    assert_eq!(app.route, Route::Login);
    assert!(app.auth.storage().get(crate::session::TOKEN_KEY).is_none());
}

#[test]
fn test_cycle_route_wraps() {
    let mut app = signed_in();
    app.cycle_route(false);
    assert_eq!(app.route, Route::Settings);
    app.cycle_route(true);
    assert_eq!(app.route, Route::Dashboard);
}

#[test]
fn test_loading_view_ends_on_tick() {
    let ui = UiConfig {
        loading_delay_ms: 600,
        ..ui()
    };
    let mut app = App::new(auth(true), Store::seeded(), &ui, today());
    let now = Instant::now();
    assert!(app.is_loading(now));
    app.tick(now + Duration::from_secs(1), today());
    assert!(!app.is_loading(now + Duration::from_secs(1)));
    assert!(app.loading_until.is_none());
}

#[test]
fn test_tick_follows_the_calendar_date() {
    let july_1 = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
    let july_11 = NaiveDate::from_ymd_opt(2025, 7, 11).unwrap();
    let mut app = App::new(auth(true), Store::seeded(), &ui(), july_1);
    let goal_alert = |app: &App| {
        app.dashboard
            .alerts
            .as_ref()
            .unwrap()
            .iter()
            .any(|a| a.title == "Goal deadline")
    };
    assert!(!goal_alert(&app));

    app.navigate(Route::Debts);
    select(&mut app, 3);
    app.open_payment();
    app.form.as_mut().unwrap().values.set("amount", "500");
    app.submit_form();
    assert_eq!(app.store.debts.get(3).unwrap().status, DebtStatus::OnTime);

    // Debt 3 falls due on 2025-07-10.
    app.tick(Instant::now(), july_11);
    assert_eq!(app.today, july_11);

    app.open_payment();
    app.form.as_mut().unwrap().values.set("amount", "500");
    app.submit_form();
    let debt = app.store.debts.get(3).unwrap();
    assert_eq!(debt.status, DebtStatus::Overdue);
    assert_eq!(debt.payments.last().unwrap().date, july_11);

    app.tick(Instant::now(), today());
    assert!(goal_alert(&app));
}

// ── Lists ────────────────────────────────────────────────────

#[test]
fn test_search_abc_finds_one_vehicle() {
    let mut app = signed_in();
    app.navigate(Route::Vehicles);
    app.set_search("abc");
    assert_eq!(app.visible_ids(), vec![1]);
    app.set_search("");
    assert_eq!(app.visible_ids().len(), 4);
}

#[test]
fn test_filters_are_kept_per_page() {
    let mut app = signed_in();
    app.navigate(Route::Vehicles);
    app.set_filter("status", "Alugado");
    assert_eq!(app.visible_ids(), vec![2]);

    app.navigate(Route::Debts);
    assert_eq!(app.visible_ids().len(), 3);
    app.navigate(Route::Vehicles);
    assert_eq!(app.visible_ids(), vec![2]);

    app.clear_filters();
    assert_eq!(app.visible_ids().len(), 4);
}

#[test]
fn test_settings_search_matches_section() {
    let mut app = signed_in();
    app.navigate(Route::Settings);
    app.set_search("backup");
    let keys: Vec<_> = app.visible_settings().iter().map(|e| e.key).collect();
    assert_eq!(keys, vec!["auto_backup", "backup_frequency"]);
}

// ── Delete and confirmation ──────────────────────────────────

#[test]
fn test_delete_confirmed_removes_record() {
    let mut app = signed_in();
    app.navigate(Route::Vehicles);
    select(&mut app, 2);
    app.request_delete();
    assert_eq!(app.input_mode, InputMode::Confirm);

    app.resolve_confirm(true);
    assert!(app.store.vehicles.get(2).is_none());
    assert_eq!(app.store.vehicles.len(), 3);
    assert!(has_toast(&app, "Vehicle deleted"));
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn test_delete_cancelled_keeps_record() {
    let mut app = signed_in();
    app.navigate(Route::Debts);
    app.request_delete();
    app.resolve_confirm(false);
    assert_eq!(app.store.debts.len(), 3);
    assert!(app.pending.is_none());
    assert_eq!(app.status_message, "Cancelled");
}

#[test]
fn test_confirmation_times_out() {
    let ui = UiConfig {
        confirm_timeout_secs: 1,
        ..ui()
    };
    let mut app = App::new(auth(true), Store::seeded(), &ui, today());
    app.navigate(Route::Vehicles);
    app.request_delete();
    assert!(app.pending.is_some());

    app.tick(Instant::now() + Duration::from_secs(2), today());
    assert!(app.pending.is_none());
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.store.vehicles.len(), 4);
    assert!(has_toast(&app, "Confirmation timed out"));
}

#[test]
fn test_reset_restores_seed_data() {
    let mut app = signed_in();
    app.navigate(Route::Vehicles);
    app.request_delete();
    app.resolve_confirm(true);
    assert_eq!(app.store.vehicles.len(), 3);

    app.ask(
        crate::notify::ConfirmOptions::destructive("Reset data", "Restore?"),
        PendingAction::ResetData,
    );
    app.resolve_confirm(true);
    assert_eq!(app.store.vehicles.len(), 4);
}

// ── Forms ────────────────────────────────────────────────────

#[test]
fn test_paying_remaining_amount_pays_off_debt() {
    let mut app = signed_in();
    app.navigate(Route::Debts);
    select(&mut app, 2);
    app.open_payment();
    assert_eq!(app.form.as_ref().unwrap().target, FormTarget::Payment(2));

    app.form.as_mut().unwrap().values.set("amount", "3500");
    app.submit_form();

    let debt = app.store.debts.get(2).unwrap();
    assert_eq!(debt.remaining_amount, dec!(0));
    assert_eq!(debt.status, DebtStatus::PaidOff);
    assert_eq!(debt.payments.len(), 1);
    assert!(app.form.is_none());
    assert!(has_toast(&app, "Debt paid off"));
}

#[test]
fn test_overpayment_is_rejected_without_change() {
    let mut app = signed_in();
    app.navigate(Route::Debts);
    select(&mut app, 3);
    app.open_payment();
    app.form.as_mut().unwrap().values.set("amount", "5000");
    app.submit_form();

    let debt = app.store.debts.get(3).unwrap();
    assert_eq!(debt.remaining_amount, dec!(4500));
    assert!(debt.payments.is_empty());
    let form = app.form.as_ref().unwrap();
    assert_eq!(form.errors.len(), 1);
    assert!(form.errors[0].contains("cannot exceed"));
}

#[test]
fn test_paid_off_debt_cannot_open_payment() {
    let mut app = signed_in();
    app.navigate(Route::Debts);
    select(&mut app, 2);
    app.store
        .debts
        .update_with(2, |d| {
            d.status = DebtStatus::PaidOff;
            Ok(())
        })
        .unwrap();
    app.open_payment();
    assert!(app.form.is_none());
}

#[test]
fn test_overshooting_goal_asks_first() {
    let mut app = signed_in();
    app.navigate(Route::Goals);
    select(&mut app, 4);
    app.open_contribution();
    app.form.as_mut().unwrap().values.set("amount", "8000");
    app.submit_form();

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(app.form.is_none());
    assert_eq!(app.store.goals.get(4).unwrap().current_amount, dec!(2000));

    app.resolve_confirm(true);
    let goal = app.store.goals.get(4).unwrap();
    assert_eq!(goal.current_amount, dec!(10000));
    assert_eq!(goal.status, GoalStatus::Completed);
    assert!(has_toast(&app, "Goal reached!"));
}

#[test]
fn test_overshoot_declined_leaves_goal() {
    let mut app = signed_in();
    app.navigate(Route::Goals);
    select(&mut app, 4);
    app.open_contribution();
    app.form.as_mut().unwrap().values.set("amount", "8000");
    app.submit_form();
    app.resolve_confirm(false);

    let goal = app.store.goals.get(4).unwrap();
    assert_eq!(goal.current_amount, dec!(2000));
    assert_eq!(goal.contributions.len(), 1);
}

#[test]
fn test_small_contribution_applies_directly() {
    let mut app = signed_in();
    app.navigate(Route::Goals);
    select(&mut app, 4);
    app.open_contribution();
    app.form.as_mut().unwrap().values.set("amount", "1000");
    app.submit_form();

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.store.goals.get(4).unwrap().current_amount, dec!(3000));
    assert!(has_toast(&app, "Value added"));
}

#[test]
fn test_invalid_vehicle_form_stays_open() {
    let mut app = signed_in();
    app.navigate(Route::Vehicles);
    app.open_create();
    app.submit_form();

    let form = app.form.as_ref().unwrap();
    assert!(!form.errors.is_empty());
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.store.vehicles.len(), 4);
}

#[test]
fn test_close_form_cancels() {
    let mut app = signed_in();
    app.navigate(Route::Vehicles);
    app.open_edit();
    assert!(matches!(
        app.form.as_ref().unwrap().target,
        FormTarget::Edit(Route::Vehicles, 1)
    ));
    app.close_form();
    assert!(app.form.is_none());
    assert_eq!(app.status_message, "Cancelled");
}

// ── Domain actions ───────────────────────────────────────────

#[test]
fn test_rental_status_change() {
    let mut app = signed_in();
    app.navigate(Route::Rentals);
    select(&mut app, 3);
    assert_eq!(app.set_rental_status(RentalStatus::Active).unwrap(), 3);
    assert_eq!(app.store.rentals.get(3).unwrap().status, RentalStatus::Active);
}

#[test]
fn test_contract_only_on_rentals() {
    let mut app = signed_in();
    app.navigate(Route::Vehicles);
    assert!(app.show_contract().is_err());

    app.navigate(Route::Rentals);
    app.show_contract().unwrap();
    assert!(app.contract.as_ref().unwrap().contains("RENTAL CONTRACT #1"));

    app.navigate(Route::Dashboard);
    assert!(app.contract.is_none());
}

#[test]
fn test_goal_pause_and_resume() {
    let mut app = signed_in();
    app.navigate(Route::Goals);
    select(&mut app, 1);
    app.update_goal_status(crate::models::Goal::pause).unwrap();
    assert_eq!(app.store.goals.get(1).unwrap().status, GoalStatus::Paused);
    app.update_goal_status(crate::models::Goal::resume).unwrap();
    assert_eq!(app.store.goals.get(1).unwrap().status, GoalStatus::InProgress);
}

// ── Dashboard ────────────────────────────────────────────────

#[test]
fn test_dashboard_stats_match_store() {
    let store = Store::seeded();
    let stats = dashboard_stats(&store).unwrap();
    let finance = FinancialSummary::of(store.transactions.items());
    let goals = GoalTotals::of(store.goals.items());
    let debts = DebtTotals::of(store.debts.items());

    assert_eq!(stats.fleet.total, 4);
    assert_eq!(stats.fleet.available, 2);
    assert_eq!(stats.rentals.total, 3);
    assert_eq!(stats.debts.overdue, 1);
    assert_eq!(stats.net_position, finance.balance + goals.current - debts.remaining);
}

#[test]
fn test_dashboard_alerts_most_urgent_first() {
    let alerts = dashboard_alerts(&Store::seeded(), today()).unwrap();
    let titles: Vec<_> = alerts.iter().map(|a| a.title.as_str()).collect();

    assert!(titles.contains(&"Licensing pending"));
    assert!(titles.contains(&"Debt overdue"));
    assert!(titles.contains(&"Payment pending"));
    assert_eq!(alerts[0].severity, Severity::High);
    assert!(alerts.windows(2).all(|w| w[0].severity <= w[1].severity));
}

#[test]
fn test_goal_deadline_alert_inside_window() {
    let alerts = dashboard_alerts(&Store::seeded(), today()).unwrap();
    // Goal 4 is due 2025-08-15, inside 30 days of 2025-07-20.
    assert!(alerts
        .iter()
        .any(|a| a.title == "Goal deadline" && a.detail.contains("Sistema de Gestão")));

    let early = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let alerts = dashboard_alerts(&Store::seeded(), early).unwrap();
    assert!(!alerts.iter().any(|a| a.title == "Goal deadline"));
}

#[test]
fn test_recent_rentals_newest_first() {
    let recent = recent_rentals(&Store::seeded(), 2);
    assert_eq!(recent.len(), 2);
    assert!(recent[0].start_date >= recent[1].start_date);
}

#[test]
fn test_component_boundary_retry_recovers() {
    let mut app = signed_in();
    app.stats_boundary
        .catch::<()>(Err(anyhow::anyhow!("stats exploded")));
    assert!(app.stats_boundary.is_errored());

    app.retry();
    assert!(!app.stats_boundary.is_errored());
    assert!(app.dashboard.stats.is_some());
}

#[test]
fn test_page_boundary_go_home() {
    let mut app = signed_in();
    app.navigate(Route::Goals);
    app.page_boundary.catch::<()>(Err(anyhow::anyhow!("page exploded")));
    app.go_home();
    assert_eq!(app.route, Route::Dashboard);
    assert!(!app.page_boundary.is_errored());
}
