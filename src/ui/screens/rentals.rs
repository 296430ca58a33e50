use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{header_row, list_title, panel, render_empty, row_style, table_rows};
use crate::models::{Rental, RentalSummary};
use crate::routes::Route;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_summary(f, chunks[0], app.store.rentals.items());

    let view = app.view_of(Route::Rentals);
    let rentals = app.store.rentals.filtered(&view.query);
    if rentals.is_empty() {
        render_empty(f, chunks[1], "Rentals", view, "Add one with n or :new");
        return;
    }

    let rows: Vec<Row> = rentals
        .iter()
        .enumerate()
        .skip(view.scroll)
        .take(table_rows(chunks[1]))
        .map(|(i, r)| {
            let status = r.status.as_str();
            let status_cell = if i == view.index {
                Span::raw(status)
            } else {
                Span::styled(status, theme::status_style(status))
            };
            Row::new(vec![
                Cell::from(format!("#{}", r.id)),
                Cell::from(truncate(&r.customer_name, 22)),
                Cell::from(format!("{} {}", r.vehicle_plate, truncate(&r.vehicle_model, 14))),
                Cell::from(format!(
                    "{} → {}",
                    format_date(r.start_date),
                    format_date(r.end_date)
                )),
                Cell::from(r.days().to_string()),
                Cell::from(format_amount(r.total_amount)),
                Cell::from(r.payment_method.clone()),
                Cell::from(status_cell),
            ])
            .style(row_style(i, view.index))
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(14),
        Constraint::Length(24),
        Constraint::Length(23),
        Constraint::Length(4),
        Constraint::Length(13),
        Constraint::Length(13),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(&[
            "#", "Customer", "Vehicle", "Period", "Days", "Total", "Payment", "Status",
        ]))
        .block(panel(list_title("Rentals", rentals.len(), view)));
    f.render_widget(table, chunks[1]);
}

fn render_summary(f: &mut Frame, area: Rect, rentals: &[Rental]) {
    let summary = RentalSummary::of(rentals);
    let stat = |label: &'static str, value: String, color: Color| {
        vec![
            Span::styled(format!(" {label} "), theme::dim_style()),
            Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::raw("   "),
        ]
    };
    let mut spans = stat("Revenue", format_amount(summary.revenue), theme::GREEN);
    spans.extend(stat("Active", summary.active.to_string(), theme::ACCENT));
    spans.extend(stat("Pending", summary.pending.to_string(), theme::YELLOW));
    spans.extend(stat("Finished", summary.finished.to_string(), theme::TEXT));
    spans.extend(stat("Cancelled", summary.cancelled.to_string(), theme::RED));

    f.render_widget(
        Paragraph::new(Line::from(spans)).block(panel(" Summary ".into())),
        area,
    );
}
