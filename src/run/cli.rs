use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::crud::Query;
use crate::export::{self, Entity};
use crate::models::VehicleStatus;
use crate::routes::{self, Route};
use crate::session::AuthContext;
use crate::store::Store;
use crate::ui::app::{dashboard_stats, DashboardStats};
use crate::ui::util::{format_amount, format_date, truncate};

/// Fleet rental and personal finance dashboard.
#[derive(Debug, Parser)]
#[command(name = "fleetui", version, about)]
pub(crate) struct Cli {
    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    pub(crate) config: Option<PathBuf>,

    /// Keep the session in memory only.
    #[arg(long, global = true)]
    pub(crate) ephemeral: bool,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Sign in and store the session token.
    Login { email: String, password: String },
    /// Clear the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Print the dashboard summary.
    Summary,
    /// List vehicles.
    Vehicles {
        /// Match plate or model.
        #[arg(long)]
        search: Option<String>,
        /// Status label, e.g. "Disponível" or "manutencao".
        #[arg(long)]
        status: Option<String>,
    },
    /// Export one entity list (or `all`) as CSV.
    Export {
        entity: String,
        /// Output file, or a directory for `all`.
        path: Option<String>,
    },
}

pub(crate) fn as_cli(command: Command, auth: &mut AuthContext, store: &Store) -> Result<()> {
    match command {
        Command::Login { email, password } => cli_login(auth, &email, &password),
        Command::Logout => {
            auth.logout();
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            match auth.user() {
                Some(user) => println!("{} <{}> ({})", user.name, user.email, user.role),
                None => println!("Not signed in."),
            }
            Ok(())
        }
        Command::Summary => {
            require_session(auth, Route::Dashboard)?;
            cli_summary(store)
        }
        Command::Vehicles { search, status } => {
            require_session(auth, Route::Vehicles)?;
            cli_vehicles(store, search.as_deref(), status.as_deref())
        }
        Command::Export { entity, path } => {
            require_session(auth, Route::Settings)?;
            cli_export(store, &entity, path.as_deref())
        }
    }
}

/// Same guard the TUI applies to protected routes.
fn require_session(auth: &AuthContext, route: Route) -> Result<()> {
    if routes::resolve(route, auth.state()) == Route::Login {
        anyhow::bail!("Not signed in. Run `fleetui login <email> <password>` first");
    }
    Ok(())
}

fn cli_login(auth: &mut AuthContext, email: &str, password: &str) -> Result<()> {
    let result = auth.login(email, password);
    match (result.success, result.user) {
        (true, Some(user)) => {
            println!("Welcome, {}.", user.name);
            Ok(())
        }
        _ => anyhow::bail!(result.error.unwrap_or_else(|| "Login failed".into())),
    }
}

fn cli_summary(store: &Store) -> Result<()> {
    let DashboardStats {
        fleet,
        rentals,
        finance,
        debts,
        goals,
        net_position,
    } = dashboard_stats(store)?;

    println!("Fleet");
    println!(
        "  {} vehicles: {} available, {} rented, {} in maintenance, {} inactive",
        fleet.total, fleet.available, fleet.rented, fleet.maintenance, fleet.inactive
    );
    println!();
    println!("Rentals");
    println!(
        "  {} total, {} active, {} pending",
        rentals.total, rentals.active, rentals.pending
    );
    println!("  Revenue:        {:>18}", format_amount(rentals.revenue));
    println!();
    println!("Personal");
    println!("  Income:         {:>18}", format_amount(finance.income));
    println!("  Expenses:       {:>18}", format_amount(finance.expense));
    println!("  Balance:        {:>18}", format_amount(finance.balance));
    println!();
    println!("Debts");
    println!("  Remaining:      {:>18}", format_amount(debts.remaining));
    println!("  Monthly:        {:>18}", format_amount(debts.monthly));
    println!("  Overdue:        {:>18}", debts.overdue);
    println!();
    println!("Goals");
    println!("  Saved:          {:>18}", format_amount(goals.current));
    println!("  Completed:      {:>18}", format!("{}/{}", goals.completed, goals.count));
    println!();
    println!("  Net position:   {:>18}", format_amount(net_position));
    Ok(())
}

fn cli_vehicles(store: &Store, search: Option<&str>, status: Option<&str>) -> Result<()> {
    let mut query = Query::search(search.unwrap_or_default());
    if let Some(status) = status {
        let parsed = VehicleStatus::parse(status).with_context(|| {
            format!(
                "Unknown status '{status}'. Expected one of: {}",
                VehicleStatus::labels().join(", ")
            )
        })?;
        query.set_facet("status", parsed.as_str());
    }

    let vehicles = store.vehicles.filtered(&query);
    if vehicles.is_empty() {
        println!("No vehicles found.");
        return Ok(());
    }

    println!(
        "{:<9} {:<24} {:>4} {:<12} {:>14} {:<10}",
        "Plate", "Model", "Year", "Status", "Daily", "Service"
    );
    println!("{}", "-".repeat(78));
    for v in vehicles {
        println!(
            "{:<9} {:<24} {:>4} {:<12} {:>14} {:<10}",
            v.plate,
            truncate(&v.model, 24),
            v.year,
            v.status,
            format_amount(v.rental_value),
            format_date(v.next_maintenance)
        );
    }
    Ok(())
}

fn cli_export(store: &Store, entity: &str, path: Option<&str>) -> Result<()> {
    if entity.eq_ignore_ascii_case("all") {
        let dir = PathBuf::from(super::shellexpand(path.unwrap_or(".")));
        for entity in Entity::all() {
            let file = dir.join(entity.file_name());
            let count = export::export(store, *entity, &file)
                .with_context(|| format!("Failed to export {entity}"))?;
            println!("Exported {count} {entity} to {}", file.display());
        }
        return Ok(());
    }

    let entity = Entity::parse(entity)?;
    let file = PathBuf::from(match path {
        Some(p) => super::shellexpand(p),
        None => entity.file_name(),
    });
    let count = export::export(store, entity, &file)
        .with_context(|| format!("Failed to export {entity}"))?;
    println!("Exported {count} {entity} to {}", file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::session::MemoryStorage;

    fn auth() -> AuthContext {
        let mut auth = AuthContext::new(Box::new(MemoryStorage::default()));
        auth.init();
        auth
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["fleetui", "vehicles", "--status", "Alugado"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Vehicles { status: Some(ref s), search: None }) if s == "Alugado"
        ));

        let cli = Cli::try_parse_from(["fleetui", "--ephemeral"]).unwrap();
        assert!(cli.ephemeral);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_data_commands_require_session() {
        let mut auth = auth();
        let err = as_cli(Command::Summary, &mut auth, &Store::seeded()).unwrap_err();
        assert!(err.to_string().contains("Not signed in"));
    }

    #[test]
    fn test_login_then_summary() {
        let mut auth = auth();
        let store = Store::seeded();
        as_cli(
            Command::Login {
                email: "admin@liberdadepro.com".into(),
                password: "admin123".into(),
            },
            &mut auth,
            &store,
        )
        .unwrap();
        assert!(auth.is_authenticated());
        as_cli(Command::Summary, &mut auth, &store).unwrap();
    }

    #[test]
    fn test_bad_login_fails() {
        let mut auth = auth();
        let err = as_cli(
            Command::Login {
                email: "admin@liberdadepro.com".into(),
                password: "nope".into(),
            },
            &mut auth,
            &Store::seeded(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!auth.is_authenticated());
    }

    #[test]
    fn test_vehicles_rejects_unknown_status() {
        let err = cli_vehicles(&Store::seeded(), None, Some("flying")).unwrap_err();
        assert!(err.to_string().contains("Unknown status"));
    }

    #[test]
    fn test_export_all_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        cli_export(&Store::seeded(), "all", dir.path().to_str()).unwrap();
        for entity in Entity::all() {
            assert!(dir.path().join(entity.file_name()).exists());
        }
    }
}
