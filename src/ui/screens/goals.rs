use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{header_row, list_title, panel, render_empty, row_style, table_rows};
use crate::models::{Goal, GoalStatus, GoalTotals};
use crate::routes::Route;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, format_days_left, progress_bar, truncate};

const BAR_WIDTH: usize = 12;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let totals = GoalTotals::of(app.store.goals.items());
    let line = Line::from(vec![
        Span::styled(" Saved ", theme::dim_style()),
        Span::styled(
            format_amount(totals.current),
            Style::default().fg(theme::MAUVE).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" of ", theme::dim_style()),
        Span::styled(format_amount(totals.target), theme::normal_style()),
        Span::styled("   Completed ", theme::dim_style()),
        Span::styled(
            format!("{}/{}", totals.completed, totals.count),
            theme::income_style().add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(panel(" Summary ".into())), chunks[0]);

    let view = app.view_of(Route::Goals);
    let goals = app.store.goals.filtered(&view.query);
    if goals.is_empty() {
        render_empty(f, chunks[1], "Goals", view, "Add one with n or :new");
        return;
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(60), Constraint::Length(40)])
        .split(chunks[1]);

    let rows: Vec<Row> = goals
        .iter()
        .enumerate()
        .skip(view.scroll)
        .take(table_rows(body[0]))
        .map(|(i, g)| {
            let status = g.status.as_str();
            let cursor = i == view.index;
            let status_cell = if cursor {
                Span::raw(status)
            } else {
                Span::styled(status, theme::status_style(status))
            };
            let days = g.days_left(app.today);
            let days_cell = if g.status == GoalStatus::Completed {
                Span::raw("-")
            } else if days <= 0 && !cursor {
                Span::styled(format_days_left(days), theme::expense_style())
            } else {
                Span::raw(format_days_left(days))
            };
            Row::new(vec![
                Cell::from(truncate(&g.title, 24)),
                Cell::from(g.category.clone()),
                Cell::from(format!(
                    "{} {:>3}%",
                    progress_bar(g.progress_percent(), BAR_WIDTH),
                    g.progress_percent()
                )),
                Cell::from(format_amount(g.current_amount)),
                Cell::from(format_amount(g.target_amount)),
                Cell::from(days_cell),
                Cell::from(status_cell),
            ])
            .style(row_style(i, view.index))
        })
        .collect();

    let widths = [
        Constraint::Min(14),
        Constraint::Length(14),
        Constraint::Length(BAR_WIDTH as u16 + 5),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(9),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&[
            "Goal", "Category", "Progress", "Current", "Target", "Left", "Status",
        ]))
        .block(panel(list_title("Goals", goals.len(), view)));
    f.render_widget(table, body[0]);

    if let Some(goal) = goals.get(view.index) {
        render_detail(f, body[1], goal, app);
    }
}

fn render_detail(f: &mut Frame, area: Rect, goal: &Goal, app: &App) {
    let width = area.width.saturating_sub(4) as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            truncate(&goal.title, width),
            Style::default().fg(theme::MAUVE).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(truncate(&goal.description, width), theme::dim_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Kind        ", theme::dim_style()),
            Span::styled(goal.kind.as_str(), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("Remaining   ", theme::dim_style()),
            Span::styled(format_amount(goal.remaining()), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled("Deadline    ", theme::dim_style()),
            Span::styled(
                format!(
                    "{} ({})",
                    format_date(goal.deadline),
                    format_days_left(goal.days_left(app.today))
                ),
                theme::normal_style(),
            ),
        ]),
    ];

    if let Some(p) = goal
        .projection()
        .filter(|_| goal.status != GoalStatus::Completed)
    {
        lines.push(Line::from(vec![
            Span::styled("Projection  ", theme::dim_style()),
            Span::styled(
                format!("{} more at {} (~{} days)", p.needed, format_amount(p.average), p.days),
                theme::normal_style(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Contributions ({})", goal.contributions.len()),
        theme::section_style(),
    )));
    if goal.contributions.is_empty() {
        lines.push(Line::from(Span::styled("  none yet · a to add", theme::dim_style())));
    }
    for c in goal.contributions.iter().rev() {
        let marker = if c.is_important { "★ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme::YELLOW)),
            Span::styled(format!("{} ", format_date(c.date)), theme::dim_style()),
            Span::styled(format_amount(c.amount), theme::income_style()),
            Span::styled(format!(" {}", c.source), theme::dim_style()),
        ]));
    }

    f.render_widget(
        Paragraph::new(lines).block(panel(format!(" Goal #{} ", goal.id))),
        area,
    );
}
