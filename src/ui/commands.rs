use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::app::{App, InputMode, PendingAction};
use crate::export::{self, Entity};
use crate::models::*;
use crate::notify::ConfirmOptions;
use crate::routes::Route;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit FleetUI", cmd_quit, r);
    register_command!("quit", "Quit FleetUI", cmd_quit, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!("go", "Go to a path (e.g. :go /vehicles)", cmd_go, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("v", "Go to Vehicles", cmd_vehicles, r);
    register_command!("vehicles", "Go to Vehicles", cmd_vehicles, r);
    register_command!("rentals", "Go to Rentals", cmd_rentals, r);
    register_command!("personal", "Go to Personal transactions", cmd_personal, r);
    register_command!("debts", "Go to Debts", cmd_debts, r);
    register_command!("goals", "Go to Goals", cmd_goals, r);
    register_command!("settings", "Go to Settings", cmd_settings, r);
    register_command!("n", "New record on this page", cmd_new, r);
    register_command!("new", "New record on this page", cmd_new, r);
    register_command!("e", "Edit selected record", cmd_edit, r);
    register_command!("edit", "Edit selected record", cmd_edit, r);
    register_command!("delete", "Delete selected record", cmd_delete, r);
    register_command!("pay", "Register a payment on the selected debt", cmd_pay, r);
    register_command!(
        "add-value",
        "Add a value to the selected goal",
        cmd_add_value,
        r
    );
    register_command!("complete", "Mark selected goal as completed", cmd_complete, r);
    register_command!("pause", "Pause selected goal", cmd_pause, r);
    register_command!("resume", "Resume selected goal", cmd_resume, r);
    register_command!(
        "status",
        "Set status of selected rental (e.g. :status Finalizado)",
        cmd_status,
        r
    );
    register_command!("contract", "Show contract of selected rental", cmd_contract, r);
    register_command!(
        "search",
        "Search this page (e.g. :search corolla)",
        cmd_search,
        r
    );
    register_command!("s", "Search this page (e.g. :s corolla)", cmd_search, r);
    register_command!(
        "filter",
        "Filter by field (e.g. :filter status Disponível, :filter status all)",
        cmd_filter,
        r
    );
    register_command!("f", "Filter by field", cmd_filter, r);
    register_command!("clear", "Clear search and filters", cmd_clear, r);
    register_command!(
        "set",
        "Change a setting (e.g. :set theme dark)",
        cmd_set,
        r
    );
    register_command!(
        "toggle",
        "Flip an on/off setting (e.g. :toggle auto_backup)",
        cmd_toggle,
        r
    );
    register_command!(
        "export",
        "Export to CSV (e.g. :export vehicles ~/frota.csv, :export all ~/backup)",
        cmd_export,
        r
    );
    register_command!("reset", "Restore the example data", cmd_reset, r);
    register_command!("logout", "End the session", cmd_logout, r);
    register_command!("whoami", "Show the signed-in user", cmd_whoami, r);
    register_command!("retry", "Retry a failed panel or page", cmd_retry, r);
    register_command!("home", "Leave a failed page for the Dashboard", cmd_home, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        tracing::debug!(command = cmd_name, args, "running command");
        (cmd.run)(args, app)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_go(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :go <path> (e.g. :go /rental-transactions)");
        return Ok(());
    }
    app.navigate(Route::parse(args));
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(Route::Dashboard);
    Ok(())
}

fn cmd_vehicles(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(Route::Vehicles);
    Ok(())
}

fn cmd_rentals(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(Route::Rentals);
    Ok(())
}

fn cmd_personal(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(Route::PersonalTransactions);
    Ok(())
}

fn cmd_debts(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(Route::Debts);
    Ok(())
}

fn cmd_goals(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(Route::Goals);
    Ok(())
}

fn cmd_settings(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.navigate(Route::Settings);
    Ok(())
}

fn cmd_new(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.open_create();
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.open_edit();
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.request_delete();
    Ok(())
}

fn cmd_pay(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.open_payment();
    Ok(())
}

fn cmd_add_value(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.open_contribution();
    Ok(())
}

fn cmd_complete(_args: &str, app: &mut App) -> anyhow::Result<()> {
    match app.update_goal_status(Goal::complete) {
        Ok(goal) => app.notifier.success("Goal completed", &goal.title),
        Err(e) => app.notify_error(&e),
    }
    Ok(())
}

fn cmd_pause(_args: &str, app: &mut App) -> anyhow::Result<()> {
    match app.update_goal_status(Goal::pause) {
        Ok(goal) => app.notifier.info("Goal paused", &goal.title),
        Err(e) => app.notify_error(&e),
    }
    Ok(())
}

fn cmd_resume(_args: &str, app: &mut App) -> anyhow::Result<()> {
    match app.update_goal_status(Goal::resume) {
        Ok(goal) => app.notifier.info("Goal resumed", &goal.title),
        Err(e) => app.notify_error(&e),
    }
    Ok(())
}

fn cmd_status(args: &str, app: &mut App) -> anyhow::Result<()> {
    let Some(status) = RentalStatus::parse(args) else {
        app.set_status(format!(
            "Usage: :status <{}>",
            RentalStatus::labels().join("|")
        ));
        return Ok(());
    };
    match app.set_rental_status(status) {
        Ok(id) => app
            .notifier
            .success("Rental updated", &format!("Rental #{id} is now {status}")),
        Err(e) => app.notify_error(&e),
    }
    Ok(())
}

fn cmd_contract(_args: &str, app: &mut App) -> anyhow::Result<()> {
    if let Err(e) = app.show_contract() {
        app.notify_error(&e);
    }
    Ok(())
}

fn cmd_search(args: &str, app: &mut App) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.set_search(args);
    let count = app.list_len();
    app.set_status(if args.is_empty() {
        "Search cleared".to_string()
    } else {
        format!("{count} matches for '{args}'")
    });
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App) -> anyhow::Result<()> {
    let facets = facets_of(app.route);
    let mut parts = args.splitn(2, ' ');
    let facet = parts.next().unwrap_or("").trim().to_lowercase();
    let value = parts.next().unwrap_or("").trim();

    if facets.is_empty() {
        app.set_status("Nothing to filter on this page");
        return Ok(());
    }
    if facet.is_empty() || value.is_empty() {
        app.set_status(format!(
            "Usage: :filter <{}> <value|all>",
            facets.join("|")
        ));
        return Ok(());
    }

    match canonical_facet_value(app.route, &facet, value) {
        Ok(canonical) => {
            app.set_filter(&facet, &canonical);
            let count = app.list_len();
            app.set_status(format!("{facet} = {canonical} ({count} shown)"));
        }
        Err(message) => app.set_status(message),
    }
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.clear_filters();
    app.set_status("Search and filters cleared");
    Ok(())
}

fn cmd_set(args: &str, app: &mut App) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let key = parts.next().unwrap_or("").trim();
    let value = parts.next().unwrap_or("").trim();
    if key.is_empty() {
        app.set_status("Usage: :set <key> <value>");
        return Ok(());
    }
    match app.store.settings.set(key, value) {
        Ok(()) => {
            tracing::info!(key, value, "setting changed");
            app.notifier.success("Settings saved", &format!("{key} = {value}"));
        }
        Err(e) => app.notify_error(&e),
    }
    Ok(())
}

fn cmd_toggle(args: &str, app: &mut App) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :toggle <key>");
        return Ok(());
    }
    match app.store.settings.toggle(args) {
        Ok(on) => {
            let state = if on { "on" } else { "off" };
            tracing::info!(key = args, state, "setting toggled");
            app.notifier.success("Settings saved", &format!("{args} = {state}"));
        }
        Err(e) => app.notify_error(&e),
    }
    Ok(())
}

/// Space/Enter on a settings row: flip toggles, step choices, and put
/// everything else on the command line for editing.
pub(crate) fn activate_selected_setting(app: &mut App) -> anyhow::Result<()> {
    let Some(entry) = app.selected_setting() else {
        return Ok(());
    };
    if Settings::is_toggle(entry.key) {
        return cmd_toggle(entry.key, app);
    }
    if Settings::choices(entry.key).is_some() {
        match app.store.settings.cycle(entry.key) {
            Ok(value) => app
                .notifier
                .success("Settings saved", &format!("{} = {value}", entry.key)),
            Err(e) => app.notify_error(&e),
        }
        return Ok(());
    }
    app.input_mode = InputMode::Command;
    app.command_input = format!("set {} {}", entry.key, entry.value);
    Ok(())
}

fn cmd_export(args: &str, app: &mut App) -> anyhow::Result<()> {
    let mut parts = args.splitn(2, ' ');
    let first = parts.next().unwrap_or("").trim();
    let dest = parts.next().unwrap_or("").trim();

    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    let expand = |p: &str| PathBuf::from(crate::run::shellexpand(p));

    if first.eq_ignore_ascii_case("all") {
        let dir = if dest.is_empty() {
            PathBuf::from(&home)
        } else {
            expand(dest)
        };
        let mut total = 0;
        for entity in Entity::all() {
            match export::export(&app.store, *entity, &dir.join(entity.file_name())) {
                Ok(count) => total += count,
                Err(e) => {
                    app.notify_error(&e);
                    return Ok(());
                }
            }
        }
        app.notifier.success(
            "Export complete",
            &format!("{total} records to {}", dir.display()),
        );
        return Ok(());
    }

    let entity = if first.is_empty() {
        route_entity(app.route)
    } else {
        match Entity::parse(first) {
            Ok(entity) => Some(entity),
            Err(e) => {
                app.notify_error(&e);
                return Ok(());
            }
        }
    };
    let Some(entity) = entity else {
        app.set_status("Usage: :export <vehicles|rentals|transactions|debts|goals|all> [path]");
        return Ok(());
    };

    let path = if dest.is_empty() {
        Path::new(&home).join(entity.file_name())
    } else {
        expand(dest)
    };
    match export::export(&app.store, entity, &path) {
        Ok(0) => app.set_status(format!("No {entity} to export")),
        Ok(count) => app.notifier.success(
            "Export complete",
            &format!("{count} {entity} to {}", path.display()),
        ),
        Err(e) => app.notify_error(&e),
    }
    Ok(())
}

fn cmd_reset(_args: &str, app: &mut App) -> anyhow::Result<()> {
    let mut options = ConfirmOptions::destructive(
        "Reset data",
        "Restore the example data? Every change made in this session is lost.",
    );
    options.confirm_text = "Reset".to_string();
    app.ask(options, PendingAction::ResetData);
    Ok(())
}

fn cmd_logout(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.ask(
        ConfirmOptions::ask("Log out", "End the current session?"),
        PendingAction::Logout,
    );
    Ok(())
}

fn cmd_whoami(_args: &str, app: &mut App) -> anyhow::Result<()> {
    let who = match app.auth.user() {
        Some(user) => format!("{} <{}> ({})", user.name, user.email, user.role),
        None => "Not signed in".to_string(),
    };
    app.set_status(who);
    Ok(())
}

fn cmd_retry(_args: &str, app: &mut App) -> anyhow::Result<()> {
    app.retry();
    Ok(())
}

fn cmd_home(_args: &str, app: &mut App) -> anyhow::Result<()> {
    if app.page_boundary.is_errored() {
        app.go_home();
    } else {
        app.navigate(Route::Dashboard);
    }
    Ok(())
}

// ── Filtering helpers ────────────────────────────────────────

pub(crate) fn facets_of(route: Route) -> &'static [&'static str] {
    match route {
        Route::Vehicles => &["status", "document", "category"],
        Route::Rentals => &["status"],
        Route::PersonalTransactions => &["type", "category"],
        Route::Debts | Route::Goals => &["status", "category"],
        Route::Login | Route::Dashboard | Route::Settings => &[],
    }
}

fn facet_options(route: Route, facet: &str) -> Option<Vec<&'static str>> {
    let options = match (route, facet) {
        (Route::Vehicles, "status") => VehicleStatus::labels(),
        (Route::Vehicles, "document") => DocumentStatus::labels(),
        (Route::Vehicles, "category") => VEHICLE_CATEGORIES.to_vec(),
        (Route::Rentals, "status") => RentalStatus::labels(),
        (Route::PersonalTransactions, "type") => vec!["income", "expense"],
        (Route::PersonalTransactions, "category") => INCOME_CATEGORIES
            .iter()
            .chain(EXPENSE_CATEGORIES)
            .copied()
            .collect(),
        (Route::Debts, "status") => DebtStatus::labels(),
        (Route::Debts, "category") => DEBT_CATEGORIES.to_vec(),
        (Route::Goals, "status") => GoalStatus::labels(),
        (Route::Goals, "category") => GOAL_CATEGORIES.to_vec(),
        _ => return None,
    };
    Some(options)
}

/// Map user input onto the stored label, ignoring case and accents.
/// `all` passes through and clears the filter.
pub(crate) fn canonical_facet_value(route: Route, facet: &str, value: &str) -> Result<String, String> {
    if value.eq_ignore_ascii_case("all") {
        return Ok("all".to_string());
    }
    let Some(options) = facet_options(route, facet) else {
        return Err(format!(
            "Unknown filter '{facet}'. Try: {}",
            facets_of(route).join(", ")
        ));
    };
    let wanted = fold(value);
    options
        .iter()
        .find(|o| fold(o) == wanted)
        .map(|o| o.to_string())
        .ok_or_else(|| format!("Unknown {facet} '{value}'. Try: {}", options.join(", ")))
}

fn route_entity(route: Route) -> Option<Entity> {
    match route {
        Route::Vehicles => Some(Entity::Vehicles),
        Route::Rentals => Some(Entity::Rentals),
        Route::PersonalTransactions => Some(Entity::Transactions),
        Route::Debts => Some(Entity::Debts),
        Route::Goals => Some(Entity::Goals),
        Route::Login | Route::Dashboard | Route::Settings => None,
    }
}
