use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;

/// Brand panel behind the sign-in form. The form itself is drawn as an
/// overlay.
pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);

    let brand = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Liberdade Pro",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Fleet rentals and personal finance",
            theme::dim_style(),
        )),
        Line::from(""),
    ];
    f.render_widget(Paragraph::new(brand).centered(), chunks[0]);

    if app.form.is_none() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("Press Enter to sign in", theme::dim_style())),
        ];
        f.render_widget(Paragraph::new(msg).centered(), chunks[1]);
    }
}
