use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::boundary::{Boundary, BoundaryState, Scope};
use crate::crud::FieldKind;
use crate::routes::Route;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;

pub(crate) fn as_tui(mut app: App, tick: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, tick);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Nothing to recover to once the loop is gone; report and exit.
    let mut boundary = Boundary::new(Scope::App, &[]);
    if boundary.catch(result).is_none() {
        if let BoundaryState::Errored { message, error_id } = boundary.state() {
            eprintln!("Error: {message}");
            eprintln!("Error id: {error_id} (details in the log file)");
            anyhow::bail!("fleetui stopped unexpectedly");
        }
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tick: Duration,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            app.visible_rows = visible_rows(f.area().height, app.route);
            crate::ui::render::render(f, app);
        })?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, app);
                }
            }
        }
        app.tick(Instant::now(), chrono::Local::now().date_naive());
    }
    Ok(())
}

/// Table rows that fit: header, status and command bars, table borders and
/// header row, plus the summary strip some pages show.
fn visible_rows(height: u16, route: Route) -> usize {
    let summary = match route {
        Route::Rentals | Route::PersonalTransactions | Route::Debts | Route::Goals => 3,
        _ => 0,
    };
    (height.saturating_sub(6 + summary) as usize).max(1)
}

fn handle_key(key: KeyEvent, app: &mut App) {
    if app.show_help {
        app.show_help = false;
        return;
    }
    let result = match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app),
        InputMode::Command => handle_command_input(key, app),
        InputMode::Search => handle_search_input(key, app),
        InputMode::Editing => handle_editing_input(key, app),
        InputMode::Confirm => handle_confirm_input(key, app),
    };
    app.page_boundary.catch(result);
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') => app.running = false,
            KeyCode::Char('d') => {
                for _ in 0..app.visible_rows / 2 {
                    app.move_down();
                }
            }
            KeyCode::Char('u') => {
                for _ in 0..app.visible_rows / 2 {
                    app.move_up();
                }
            }
            _ => {}
        }
        return Ok(());
    }

    if app.page_boundary.is_errored() {
        match key.code {
            KeyCode::Char('r') => app.retry(),
            KeyCode::Char('h') => app.go_home(),
            KeyCode::Char(':') => {
                app.input_mode = InputMode::Command;
                app.command_input.clear();
            }
            KeyCode::Char('?') => app.show_help = true,
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') if app.route != Route::Login && app.route != Route::Dashboard => {
            app.input_mode = InputMode::Search;
            app.search_input = app.view().query.search.clone();
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.move_to_top(),
        KeyCode::Char('G') | KeyCode::End => app.move_to_bottom(),
        KeyCode::Tab => app.cycle_route(true),
        KeyCode::BackTab => app.cycle_route(false),
        KeyCode::Char(c @ '1'..='7') => {
            let idx = c as usize - '1' as usize;
            if let Some(route) = Route::nav().get(idx) {
                app.navigate(*route);
            }
        }
        KeyCode::Enter if app.route == Route::Login => app.navigate(Route::Login),
        KeyCode::Enter | KeyCode::Char(' ') if app.route == Route::Settings => {
            commands::activate_selected_setting(app)?
        }
        KeyCode::Char('n') => app.open_create(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit(),
        KeyCode::Char('D') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('p') => app.open_payment(),
        KeyCode::Char('a') => app.open_contribution(),
        KeyCode::Char('c') if app.route == Route::Rentals => {
            if let Err(e) = app.show_contract() {
                app.notify_error(&e);
            }
        }
        KeyCode::Char('r') => app.retry(),
        KeyCode::Esc => handle_escape(app),
        _ => {}
    }
    Ok(())
}

fn handle_escape(app: &mut App) {
    if app.contract.is_some() {
        app.contract = None;
    } else if !app.view().query.is_empty() {
        app.clear_filters();
        app.set_status("Filters cleared");
    } else {
        app.status_message.clear();
    }
}

fn handle_command_input(key: KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

/// Search is live: every keystroke re-filters the current page.
fn handle_search_input(key: KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
            app.set_search("");
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            let text = app.search_input.clone();
            app.set_search(&text);
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            let text = app.search_input.clone();
            app.set_search(&text);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: KeyEvent, app: &mut App) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        app.running = false;
        return Ok(());
    }
    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return Ok(());
    };
    let focused_kind = form.focused().map(|f| f.kind.clone());

    match key.code {
        KeyCode::Enter => app.submit_form(),
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => {
            form.cycle(false);
            app.form_changed();
        }
        KeyCode::Right => {
            form.cycle(true);
            app.form_changed();
        }
        KeyCode::Char(' ')
            if matches!(focused_kind, Some(FieldKind::Toggle | FieldKind::Choice(_))) =>
        {
            form.cycle(true);
            app.form_changed();
        }
        KeyCode::Backspace => {
            form.backspace();
            app.form_changed();
        }
        KeyCode::Char(c) => {
            form.input(c);
            app.form_changed();
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.resolve_confirm(true),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.resolve_confirm(false),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::UiConfig;
    use crate::session::{AuthContext, MemoryStorage};
    use crate::store::Store;
    use chrono::NaiveDate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn signed_in_app() -> App {
        let mut auth = AuthContext::new(Box::new(MemoryStorage::default()));
        auth.init();
        auth.login("admin@liberdadepro.com", "admin123");
        let ui = UiConfig {
            loading_delay_ms: 0,
            confirm_timeout_secs: 0,
            ..UiConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        App::new(auth, Store::seeded(), &ui, today)
    }

    #[test]
    fn test_digit_keys_switch_pages() {
        let mut app = signed_in_app();
        handle_key(key(KeyCode::Char('2')), &mut app);
        assert_eq!(app.route, Route::Vehicles);
        handle_key(key(KeyCode::Char('7')), &mut app);
        assert_eq!(app.route, Route::Settings);
    }

    #[test]
    fn test_live_search_filters_while_typing() {
        let mut app = signed_in_app();
        app.navigate(Route::Vehicles);
        handle_key(key(KeyCode::Char('/')), &mut app);
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "abc".chars() {
            handle_key(key(KeyCode::Char(c)), &mut app);
        }
        assert_eq!(app.visible_ids(), vec![1]);
        handle_key(key(KeyCode::Esc), &mut app);
        assert!(app.visible_ids().len() > 1);
    }

    #[test]
    fn test_delete_key_then_cancel_keeps_record() {
        let mut app = signed_in_app();
        app.navigate(Route::Vehicles);
        let before = app.store.vehicles.len();
        handle_key(key(KeyCode::Char('D')), &mut app);
        assert_eq!(app.input_mode, InputMode::Confirm);
        handle_key(key(KeyCode::Esc), &mut app);
        assert_eq!(app.store.vehicles.len(), before);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = signed_in_app();
        handle_key(key(KeyCode::Char('?')), &mut app);
        assert!(app.show_help);
        handle_key(key(KeyCode::Char('2')), &mut app);
        assert!(!app.show_help);
        assert_eq!(app.route, Route::Dashboard);
    }

    #[test]
    fn test_unknown_command_does_not_trip_boundary() {
        let mut app = signed_in_app();
        handle_key(key(KeyCode::Char(':')), &mut app);
        for c in "vehicels".chars() {
            handle_key(key(KeyCode::Char(c)), &mut app);
        }
        handle_key(key(KeyCode::Enter), &mut app);
        assert!(!app.page_boundary.is_errored());
        assert!(app.status_message.contains("vehicles"));
    }

    #[test]
    fn test_visible_rows_accounts_for_summary() {
        assert_eq!(visible_rows(30, Route::Vehicles), 24);
        assert_eq!(visible_rows(30, Route::Debts), 21);
        assert_eq!(visible_rows(2, Route::Goals), 1);
    }
}
