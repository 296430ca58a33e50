use ratatui::{
    layout::{Constraint, Rect},
    style::Modifier,
    text::Span,
    widgets::{Cell, Row, Table},
    Frame,
};

use super::{header_row, list_title, panel, render_empty, row_style, table_rows};
use crate::models::Settings;
use crate::routes::Route;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let view = app.view_of(Route::Settings);
    let entries = app.visible_settings();
    if entries.is_empty() {
        render_empty(f, area, "Settings", view, "");
        return;
    }

    let mut last_section = "";
    let rows: Vec<Row> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            // Section name only on the first row of each group.
            let section = if e.section != last_section {
                last_section = e.section;
                Span::styled(e.section, theme::section_style())
            } else {
                Span::raw("")
            };
            let value = if Settings::is_toggle(e.key) {
                let on = e.value == "on";
                let style = if on {
                    theme::income_style()
                } else {
                    theme::dim_style()
                };
                Span::styled(if on { "[x] on" } else { "[ ] off" }, style)
            } else if Settings::choices(e.key).is_some() {
                Span::styled(format!("‹ {} ›", e.value), theme::normal_style())
            } else {
                Span::raw(truncate(&e.value, 48))
            };
            Row::new(vec![
                Cell::from(section),
                Cell::from(Span::styled(e.key, theme::normal_style().add_modifier(Modifier::BOLD))),
                Cell::from(value),
            ])
            .style(row_style(i, view.index))
        })
        .collect::<Vec<_>>()
        .into_iter()
        .skip(view.scroll)
        .take(table_rows(area))
        .collect();

    let widths = [
        Constraint::Length(15),
        Constraint::Length(22),
        Constraint::Min(20),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["Section", "Key", "Value"]))
        .block(panel(list_title("Settings", entries.len(), view)));
    f.render_widget(table, area);
}
