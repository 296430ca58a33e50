use std::time::Instant;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::app::{App, FormTarget, InputMode};
use super::commands;
use super::screens::{self, centered};
use super::theme;
use super::util::truncate;
use crate::boundary::{Boundary, BoundaryState, Recovery};
use crate::crud::FieldKind;
use crate::notify::Variant;
use crate::routes::Route;

const SIDEBAR_WIDTH: u16 = 24;
const FORM_LABEL_WIDTH: usize = 16;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let now = Instant::now();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(5),    // Sidebar + content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    if app.route == Route::Login || app.is_loading(now) {
        render_screen(f, chunks[1], app, now);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(chunks[1]);
        render_sidebar(f, body[0], app);
        render_screen(f, body[1], app, now);
    }

    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app, now);

    if let Some(text) = &app.contract {
        render_contract(f, f.area(), text);
    }
    if app.form.is_some() {
        render_form(f, f.area(), app);
    }
    if app.pending.is_some() {
        render_confirm(f, f.area(), app, now);
    }
    render_toasts(f, f.area(), app);
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let left = format!(" FleetUI · {} ", app.route);
    let right = match app.auth.user() {
        Some(user) => format!(" {} ({}) ", user.name, user.role),
        None => " not signed in ".to_string(),
    };
    let pad = (area.width as usize).saturating_sub(left.chars().count() + right.chars().count());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            left,
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, Style::default().fg(theme::TEXT_DIM)),
    ]))
    .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(header, area);
}

fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let current = app.route.path();
    let mut lines = vec![Line::from("")];
    for (i, route) in Route::nav().iter().enumerate() {
        let label = format!(" {} {:<18}", i + 1, route.label());
        if route.is_active(current) {
            lines.push(Line::from(Span::styled(
                label,
                theme::selected_style().add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.push(Line::from(Span::styled(label, theme::normal_style())));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" :logout to sign out", theme::dim_style())));

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(theme::OVERLAY)),
    );
    f.render_widget(sidebar, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    if app.is_loading(now) {
        render_loading(f, area);
        return;
    }
    if app.page_boundary.is_errored() {
        render_boundary_fallback(f, area, &app.page_boundary, "This page failed to render");
        return;
    }
    match app.route {
        Route::Login => screens::login::render(f, area, app),
        Route::Dashboard => screens::dashboard::render(f, area, app),
        Route::Vehicles => screens::vehicles::render(f, area, app),
        Route::Rentals => screens::rentals::render(f, area, app),
        Route::PersonalTransactions => screens::personal::render(f, area, app),
        Route::Debts => screens::debts::render(f, area, app),
        Route::Goals => screens::goals::render(f, area, app),
        Route::Settings => screens::settings::render(f, area, app),
    }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let msg = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading…",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY));
    f.render_widget(Paragraph::new(msg).centered().block(block), area);
}

/// Fallback shown in place of anything a boundary caught an error for.
pub(crate) fn render_boundary_fallback(f: &mut Frame, area: Rect, boundary: &Boundary, headline: &str) {
    let BoundaryState::Errored { message, error_id } = boundary.state() else {
        return;
    };
    let hints: Vec<&str> = boundary
        .actions()
        .iter()
        .map(|a| match a {
            Recovery::Retry => "r retry",
            Recovery::GoHome => "h home",
        })
        .collect();

    let msg = vec![
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.as_str(), theme::normal_style())),
        Line::from(Span::styled(format!("Error id: {error_id}"), theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(hints.join("  ·  "), theme::dim_style())),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::RED))
        .title(Span::styled(
            format!(" {} error ", boundary.scope().label()),
            theme::title_style(),
        ));
    f.render_widget(
        Paragraph::new(msg)
            .centered()
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
        InputMode::Command => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::GREEN)
            .add_modifier(Modifier::BOLD),
        InputMode::Search => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
        InputMode::Editing => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::GREEN)
            .add_modifier(Modifier::BOLD),
        InputMode::Confirm => Style::default()
            .fg(theme::HEADER_BG)
            .bg(theme::RED)
            .add_modifier(Modifier::BOLD),
    };

    let query = &app.view().query;
    let filters: Vec<String> = query.facets().map(|(k, v)| format!("{k}={v}")).collect();
    let info = match app.route {
        Route::Login | Route::Dashboard => format!(" {} ", app.route.path()),
        _ => format!(
            " {} | {} shown{}",
            app.route.path(),
            app.list_len(),
            if filters.is_empty() {
                String::new()
            } else {
                format!(" | {}", filters.join(" "))
            }
        ),
    };

    let right = match app.route {
        Route::Login => " Tab next field | Enter sign in | Ctrl-q quit ",
        Route::Dashboard => " Tab pages | r retry panels | ? help ",
        Route::Vehicles | Route::PersonalTransactions => " n new | e edit | D delete | /search | ? help ",
        Route::Rentals => " n new | e edit | c contract | :status | ? help ",
        Route::Debts => " n new | p pay | D delete | ? help ",
        Route::Goals => " n new | a add value | :complete | ? help ",
        Route::Settings => " Space change | :set key value | :export | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.len() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Search => {
            let match_info = if !app.search_input.is_empty() {
                format!("  ({} matches)", app.list_len())
            } else {
                String::new()
            };
            (
                Line::from(vec![
                    Span::styled("/", Style::default().fg(theme::YELLOW)),
                    Span::styled(&app.search_input, theme::command_bar_style()),
                    Span::styled(match_info, theme::dim_style()),
                ]),
                Some(1 + app.search_input.chars().count() as u16),
            )
        }
        InputMode::Editing => (
            Line::from(Span::styled(
                " Tab/↓ next · ↑ previous · ←/→ or Space change option · Enter save · Esc cancel",
                theme::dim_style(),
            )),
            None,
        ),
        InputMode::Confirm => {
            let (message, countdown) = match &app.pending {
                Some(request) => (
                    request.options.message.as_str(),
                    request
                        .remaining(now)
                        .map(|d| format!(" ({}s)", d.as_secs()))
                        .unwrap_or_default(),
                ),
                None => ("", String::new()),
            };
            (
                Line::from(vec![
                    Span::styled(message, Style::default().fg(theme::YELLOW)),
                    Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
                    Span::styled(countdown, theme::dim_style()),
                ]),
                None,
            )
        }
        InputMode::Normal => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, / to search, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

// ── Overlays ─────────────────────────────────────────────────

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let Some(form) = &app.form else {
        return;
    };

    let mut lines = vec![Line::from("")];
    let mut cursor = None;
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let raw = form.values.get(field.key);
        let value = match &field.kind {
            FieldKind::Choice(_) if raw.is_empty() => "‹ choose ›".to_string(),
            FieldKind::Choice(_) => format!("‹ {raw} ›"),
            FieldKind::Toggle if raw == "true" => "[x]".to_string(),
            FieldKind::Toggle => "[ ]".to_string(),
            _ if field.key == "password" => "•".repeat(raw.chars().count()),
            _ => raw.to_string(),
        };
        let marker = if field.required { "*" } else { " " };
        let label = format!(" {:>width$}{marker} ", field.label, width = FORM_LABEL_WIDTH);

        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        let value_style = if focused {
            Style::default().fg(theme::TEXT).bg(theme::SURFACE)
        } else {
            theme::normal_style()
        };
        if focused && !matches!(field.kind, FieldKind::Choice(_) | FieldKind::Toggle) {
            cursor = Some((
                lines.len() as u16,
                (label.chars().count() + value.chars().count()) as u16,
            ));
        }
        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(value, value_style),
        ]));
    }

    if !form.errors.is_empty() {
        lines.push(Line::from(""));
        for error in &form.errors {
            lines.push(Line::from(Span::styled(
                format!("  • {error}"),
                Style::default().fg(theme::RED),
            )));
        }
    }
    if form.target == FormTarget::Login {
        let (email, password) = crate::session::AuthContext::demo_credentials();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  Demo credentials: {email} / {password}"),
            theme::dim_style(),
        )));
    }

    let height = lines.len() as u16 + 3;
    let popup = centered(area, 68, height);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .style(Style::default().bg(theme::HEADER_BG))
        .title(Span::styled(
            format!(" {} ", form.title),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Span::styled(" Enter save · Esc cancel ", theme::dim_style()));
    f.render_widget(Paragraph::new(lines).block(block), popup);

    if let Some((row, col)) = cursor {
        let x = (popup.x + 1 + col).min(popup.right().saturating_sub(2));
        f.set_cursor_position((x, popup.y + 1 + row));
    }
}

fn render_confirm(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let Some(request) = &app.pending else {
        return;
    };
    let options = &request.options;
    let color = match options.variant {
        Variant::Destructive => theme::RED,
        Variant::Default => theme::YELLOW,
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(options.message.as_str(), theme::normal_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!(" y {} ", options.confirm_text),
                Style::default()
                    .fg(theme::HEADER_BG)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(format!(" n {} ", options.cancel_text), theme::alt_row_style()),
        ]),
    ];
    if let Some(left) = request.remaining(now) {
        lines.push(Line::from(Span::styled(
            format!("Closes in {}s", left.as_secs()),
            theme::dim_style(),
        )));
    }

    let popup = centered(area, 60, lines.len() as u16 + 3);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::HEADER_BG))
        .title(Span::styled(
            format!(" {} ", options.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(
        Paragraph::new(lines)
            .centered()
            .wrap(Wrap { trim: true })
            .block(block),
        popup,
    );
}

fn render_contract(f: &mut Frame, area: Rect, text: &str) {
    let lines: Vec<Line> = text
        .lines()
        .map(|l| Line::from(Span::styled(format!(" {l}"), theme::normal_style())))
        .collect();
    let popup = centered(area, 72, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .style(Style::default().bg(theme::HEADER_BG))
        .title(Span::styled(" Rental contract ", theme::title_style()))
        .title_bottom(Span::styled(" Esc close ", theme::dim_style()));
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), popup);
}

/// Toasts stack in the top-right corner, newest at the bottom.
fn render_toasts(f: &mut Frame, area: Rect, app: &App) {
    let width = 44.min(area.width.saturating_sub(2));
    let mut y = area.y + 1;
    for toast in app.notifier.toasts() {
        let height = if toast.description.is_empty() { 3 } else { 4 };
        if y + height > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, height);
        let color = theme::toast_color(toast.level);
        let inner = width.saturating_sub(6) as usize;

        let mut lines = vec![Line::from(vec![
            Span::styled(
                format!("{} ", theme::toast_icon(toast.level)),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                truncate(&toast.message, inner),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
        ])];
        if !toast.description.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", truncate(&toast.description, inner)),
                theme::dim_style(),
            )));
        }

        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .style(Style::default().bg(theme::HEADER_BG)),
            ),
            rect,
        );
        y += height;
    }
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let mut help_text = vec![
        Line::from(Span::styled(
            " FleetUI Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", theme::section_style())),
        Line::from(Span::styled(
            "  j/k or Up/Down   Move cursor           1-7        Switch pages",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Tab/Shift-Tab    Cycle pages           g/G        Top/Bottom",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  Ctrl-d/u         Page Down/Up          Ctrl-q     Quit",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Actions", theme::section_style())),
        Line::from(Span::styled(
            "  n               New record             e/Enter    Edit selected",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  D               Delete selected        /          Search (live)",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  p (Debts)       Register payment       a (Goals)  Add value",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  c (Rentals)     Show contract          Space      Change setting",
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            "  r / h           Retry / go home after an error",
            theme::normal_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Commands", theme::section_style())),
    ];

    // Build command list dynamically from COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<12} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 86.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
