use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::panel;
use crate::models::category_breakdown;
use crate::ui::app::{App, DashboardStats, Severity};
use crate::ui::render::render_boundary_fallback;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Min(8),    // Alerts + recent rentals
            Constraint::Length(9), // Category chart
        ])
        .split(area);

    match (&app.dashboard.stats, app.stats_boundary.is_errored()) {
        (_, true) | (None, _) => {
            render_boundary_fallback(f, chunks[0], &app.stats_boundary, "Summary unavailable")
        }
        (Some(stats), false) => render_summary_cards(f, chunks[0], stats),
    }

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_alerts(f, middle[0], app);
    render_recent(f, middle[1], app);
    render_category_chart(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, stats: &DashboardStats) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Fleet",
        stats.fleet.total.to_string(),
        theme::ACCENT,
        format!(
            "{} free · {} rented · {} shop",
            stats.fleet.available, stats.fleet.rented, stats.fleet.maintenance
        ),
    );
    render_card(
        f,
        cards[1],
        "Rental revenue",
        format_amount(stats.rentals.revenue),
        theme::GREEN,
        format!("{} active · {} pending", stats.rentals.active, stats.rentals.pending),
    );
    render_card(
        f,
        cards[2],
        "Personal balance",
        format_amount(stats.finance.balance),
        sign_color(stats.finance.balance),
        format!("in {}", format_amount(stats.finance.income)),
    );
    render_card(
        f,
        cards[3],
        "Goals",
        format_amount(stats.goals.current),
        theme::MAUVE,
        format!("{} of {} reached", stats.goals.completed, stats.goals.count),
    );
    render_card(
        f,
        cards[4],
        "Net position",
        format_amount(stats.net_position),
        sign_color(stats.net_position),
        format!("debts {}", format_amount(stats.debts.remaining)),
    );
}

fn sign_color(amount: Decimal) -> Color {
    if amount >= Decimal::ZERO {
        theme::GREEN
    } else {
        theme::RED
    }
}

fn render_card(f: &mut Frame, area: Rect, title: &str, value: String, color: Color, subtitle: String) {
    let width = area.width.saturating_sub(2) as usize;
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(truncate(&subtitle, width), theme::dim_style())),
    ])
    .centered()
    .block(panel(format!(" {title} ")));

    f.render_widget(text, area);
}

fn render_alerts(f: &mut Frame, area: Rect, app: &App) {
    let alerts = match (&app.dashboard.alerts, app.alerts_boundary.is_errored()) {
        (Some(alerts), false) => alerts,
        _ => {
            render_boundary_fallback(f, area, &app.alerts_boundary, "Alerts unavailable");
            return;
        }
    };

    if alerts.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("Nothing needs attention", theme::income_style())),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(panel(" Alerts (0) ".into())),
            area,
        );
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let mut lines = Vec::new();
    for alert in alerts.iter().take(area.height.saturating_sub(2) as usize / 2) {
        let color = match alert.severity {
            Severity::High => theme::RED,
            Severity::Medium => theme::YELLOW,
            Severity::Low => theme::ACCENT,
        };
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(color)),
            Span::styled(
                alert.title.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", alert.route.label()), theme::dim_style()),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate(&alert.detail, width)),
            theme::normal_style(),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(panel(format!(" Alerts ({}) ", alerts.len()))),
        area,
    );
}

fn render_recent(f: &mut Frame, area: Rect, app: &App) {
    let recent = &app.dashboard.recent;
    if recent.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No rentals yet. Add one from the Rentals page",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(" Recent rentals ".into()));
        f.render_widget(msg, area);
        return;
    }

    let rows: Vec<Row> = recent
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let status = r.status.as_str();
            Row::new(vec![
                Cell::from(format_date(r.start_date)),
                Cell::from(truncate(&r.customer_name, 18)),
                Cell::from(r.vehicle_plate.clone()),
                Cell::from(format_amount(r.total_amount)),
                Cell::from(Span::styled(status, theme::status_style(status))),
            ])
            .style(if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            })
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Min(10),
        Constraint::Length(9),
        Constraint::Length(13),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(super::header_row(&["Start", "Customer", "Plate", "Total", "Status"]))
        .block(panel(" Recent rentals ".into()));
    f.render_widget(table, area);
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let breakdown = category_breakdown(app.store.transactions.items());
    let expenses: Vec<_> = breakdown
        .iter()
        .filter(|c| c.expense > Decimal::ZERO)
        .collect();

    if expenses.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No personal expenses recorded",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(" Expenses by category ".into()));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = expenses
        .iter()
        .map(|c| {
            let val = c.expense.to_u64().unwrap_or(0);
            Bar::default()
                .value(val)
                .label(Line::from(truncate(&c.category, 10)))
                .text_value(format_amount(c.expense))
                .style(Style::default().fg(theme::PEACH))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .bg(theme::PEACH)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(" Expenses by category ".into()))
        .data(BarGroup::default().bars(&bars))
        .bar_width(12)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::PEACH))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}
