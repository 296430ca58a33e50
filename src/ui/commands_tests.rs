#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;

use super::app::{App, InputMode};
use super::commands::*;
use crate::config::UiConfig;
use crate::routes::Route;
use crate::session::{AuthContext, MemoryStorage};
use crate::store::Store;

fn app() -> App {
    let mut auth = AuthContext::new(Box::new(MemoryStorage::default()));
    auth.init();
    assert!(auth.login("admin@liberdadepro.com", "admin123").success);
    let ui = UiConfig {
        loading_delay_ms: 0,
        confirm_timeout_secs: 0,
        ..UiConfig::default()
    };
    App::new(auth, Store::seeded(), &ui, NaiveDate::from_ymd_opt(2025, 7, 20).unwrap())
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("debts", "debts"), 0);
}

#[test]
fn test_find_closest_skips_single_letter_aliases() {
    assert_eq!(find_closest("vehicels"), "vehicles");
    assert_eq!(find_closest("qit"), "quit");
}

#[test]
fn test_registry_has_core_commands() {
    for name in ["q", "go", "filter", "export", "reset", "logout", "retry"] {
        assert!(COMMANDS.contains_key(name), "missing :{name}");
    }
}

#[test]
fn test_unknown_command_suggests() {
    let mut app = app();
    handle_command("vehicels", &mut app).unwrap();
    assert!(app.status_message.contains("Did you mean :vehicles?"));
    assert_eq!(app.route, Route::Dashboard);
}

#[test]
fn test_go_uses_paths() {
    let mut app = app();
    handle_command("go /debts", &mut app).unwrap();
    assert_eq!(app.route, Route::Debts);
    handle_command("go /rental-transactions/", &mut app).unwrap();
    assert_eq!(app.route, Route::Rentals);
    handle_command("go /nowhere", &mut app).unwrap();
    assert_eq!(app.route, Route::Dashboard);
}

#[test]
fn test_quit() {
    let mut app = app();
    handle_command("q", &mut app).unwrap();
    assert!(!app.running);
}

#[test]
fn test_canonical_facet_value_ignores_case_and_accents() {
    assert_eq!(
        canonical_facet_value(Route::Vehicles, "status", "manutencao"),
        Ok("Manutenção".to_string())
    );
    assert_eq!(
        canonical_facet_value(Route::Vehicles, "status", "ALL"),
        Ok("all".to_string())
    );
    assert!(canonical_facet_value(Route::Vehicles, "colour", "red").is_err());
    assert!(canonical_facet_value(Route::Vehicles, "status", "flying").is_err());
}

#[test]
fn test_filter_and_clear() {
    let mut app = app();
    handle_command("vehicles", &mut app).unwrap();
    handle_command("filter status alugado", &mut app).unwrap();
    assert_eq!(app.visible_ids(), vec![2]);
    assert!(app.status_message.contains("1 shown"));

    handle_command("filter status all", &mut app).unwrap();
    assert_eq!(app.visible_ids().len(), 4);
}

#[test]
fn test_filter_unknown_value_keeps_list() {
    let mut app = app();
    handle_command("vehicles", &mut app).unwrap();
    handle_command("filter status flying", &mut app).unwrap();
    assert!(app.status_message.starts_with("Unknown status 'flying'"));
    assert_eq!(app.visible_ids().len(), 4);
}

#[test]
fn test_search_command_reports_matches() {
    let mut app = app();
    handle_command("vehicles", &mut app).unwrap();
    handle_command("search corolla", &mut app).unwrap();
    assert_eq!(app.visible_ids(), vec![1]);
    assert_eq!(app.status_message, "1 matches for 'corolla'");
}

#[test]
fn test_set_and_toggle_settings() {
    let mut app = app();
    handle_command("set name Maria Souza", &mut app).unwrap();
    assert_eq!(app.store.settings.name, "Maria Souza");

    handle_command("set theme neon", &mut app).unwrap();
    assert_eq!(app.store.settings.theme, "light");
    assert!(app.notifier.toasts().any(|t| t.message == "Invalid data"));

    handle_command("toggle sms_notifications", &mut app).unwrap();
    assert!(app.store.settings.sms_notifications);
}

#[test]
fn test_activate_setting_flips_toggle() {
    let mut app = app();
    handle_command("settings", &mut app).unwrap();
    for _ in 0..3 {
        app.move_down();
    }
    assert_eq!(app.selected_setting().unwrap().key, "email_notifications");

    activate_selected_setting(&mut app).unwrap();
    assert!(!app.store.settings.email_notifications);
}

#[test]
fn test_activate_text_setting_prefills_command() {
    let mut app = app();
    handle_command("settings", &mut app).unwrap();
    activate_selected_setting(&mut app).unwrap();
    assert_eq!(app.input_mode, InputMode::Command);
    assert!(app.command_input.starts_with("set name "));
}

#[test]
fn test_export_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v.csv");
    let mut app = app();
    handle_command(&format!("export vehicles {}", path.display()), &mut app).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("ABC-1234"));
    assert!(app.notifier.toasts().any(|t| t.message == "Export complete"));
}

#[test]
fn test_export_unknown_entity() {
    let mut app = app();
    handle_command("export spaceships", &mut app).unwrap();
    assert!(app.notifier.toasts().any(|t| t.level == crate::notify::Level::Error));
}

#[test]
fn test_reset_and_logout_ask_first() {
    let mut app = app();
    handle_command("reset", &mut app).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.pending.as_ref().unwrap().options.confirm_text, "Reset");
    app.resolve_confirm(false);

    handle_command("logout", &mut app).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(app.auth.is_authenticated());
}

#[test]
fn test_goal_commands_off_page_report_error() {
    let mut app = app();
    handle_command("complete", &mut app).unwrap();
    assert!(app
        .notifier
        .toasts()
        .any(|t| t.description.contains("Only available on the Goals page")));
}

#[test]
fn test_status_command_on_rental() {
    let mut app = app();
    handle_command("rentals", &mut app).unwrap();
    handle_command("status Finalizado", &mut app).unwrap();
    assert_eq!(
        app.store.rentals.get(1).unwrap().status,
        crate::models::RentalStatus::Finished
    );

    handle_command("status bogus", &mut app).unwrap();
    assert!(app.status_message.starts_with("Usage: :status"));
}
