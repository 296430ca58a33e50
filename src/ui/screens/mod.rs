pub(crate) mod dashboard;
pub(crate) mod debts;
pub(crate) mod goals;
pub(crate) mod login;
pub(crate) mod personal;
pub(crate) mod rentals;
pub(crate) mod settings;
pub(crate) mod vehicles;

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row},
    Frame,
};

use super::app::ListView;
use super::theme;

/// A `width` x `height` rect centered in `area`, clamped to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2));
    let h = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(w)) / 2,
        area.y + (area.height.saturating_sub(h)) / 2,
        w,
        h,
    )
}

pub(crate) fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

/// ` Vehicles (3) search: 'abc' status=Alugado `
pub(crate) fn list_title(label: &str, count: usize, view: &ListView) -> String {
    let mut title = format!(" {label} ({count}) ");
    if !view.query.search.is_empty() {
        title.push_str(&format!("search: '{}' ", view.query.search));
    }
    for (facet, value) in view.query.facets() {
        title.push_str(&format!("{facet}={value} "));
    }
    title
}

pub(crate) fn header_row(titles: &[&'static str]) -> Row<'static> {
    Row::new(
        titles
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    )
    .height(1)
}

pub(crate) fn row_style(i: usize, cursor: usize) -> Style {
    if i == cursor {
        theme::selected_style()
    } else if i % 2 == 1 {
        theme::alt_row_style()
    } else {
        theme::normal_style()
    }
}

/// Empty-list message that tells filtered-out apart from nothing recorded.
pub(crate) fn render_empty(f: &mut Frame, area: Rect, label: &str, view: &ListView, hint: &str) {
    let msg = if view.query.is_empty() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No {} yet", label.to_lowercase()),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(hint.to_string(), theme::dim_style())),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No {} match the current search", label.to_lowercase()),
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc or :clear to reset the filters",
                theme::dim_style(),
            )),
        ]
    };
    f.render_widget(
        Paragraph::new(msg)
            .centered()
            .block(panel(list_title(label, 0, view))),
        area,
    );
}

/// Rows that fit inside a bordered table with a header.
pub(crate) fn table_rows(area: Rect) -> usize {
    area.height.saturating_sub(3) as usize
}
