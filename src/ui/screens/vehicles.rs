use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use super::{header_row, list_title, panel, render_empty, row_style, table_rows};
use crate::routes::Route;
use crate::ui::app::{App, MAINTENANCE_WINDOW_DAYS};
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let view = app.view_of(Route::Vehicles);
    let vehicles = app.store.vehicles.filtered(&view.query);
    if vehicles.is_empty() {
        render_empty(f, area, "Vehicles", view, "Add one with n or :new");
        return;
    }

    let rows: Vec<Row> = vehicles
        .iter()
        .enumerate()
        .skip(view.scroll)
        .take(table_rows(area))
        .map(|(i, v)| {
            let status = v.status.as_str();
            let docs = v.document_status.as_str();
            let maintenance = if v.maintenance_due(app.today, MAINTENANCE_WINDOW_DAYS) {
                Span::styled(format_date(v.next_maintenance), theme::expense_style())
            } else {
                Span::raw(format_date(v.next_maintenance))
            };
            let cursor = i == view.index;
            let badge = |label: &'static str| {
                if cursor {
                    Span::raw(label)
                } else {
                    Span::styled(label, theme::status_style(label))
                }
            };
            Row::new(vec![
                Cell::from(v.plate.clone()),
                Cell::from(truncate(&v.model, 24)),
                Cell::from(v.year.to_string()),
                Cell::from(v.category.clone()),
                Cell::from(format_amount(v.rental_value)),
                Cell::from(badge(status)),
                Cell::from(badge(docs)),
                Cell::from(format!("{} km", v.mileage)),
                Cell::from(maintenance),
            ])
            .style(row_style(i, view.index))
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Min(16),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(12),
        Constraint::Length(11),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(11),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(&[
            "Plate", "Model", "Year", "Type", "Daily", "Status", "Docs", "Mileage", "Service",
        ]))
        .block(panel(list_title("Vehicles", vehicles.len(), view)));
    f.render_widget(table, area);
}
