use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use super::{header_row, list_title, panel, render_empty, row_style, table_rows};
use crate::models::{Debt, DebtTotals};
use crate::routes::Route;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, progress_bar, truncate};

const BAR_WIDTH: usize = 10;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let totals = DebtTotals::of(app.store.debts.items());
    let line = Line::from(vec![
        Span::styled(" Remaining ", theme::dim_style()),
        Span::styled(
            format_amount(totals.remaining),
            theme::expense_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Monthly ", theme::dim_style()),
        Span::styled(
            format_amount(totals.monthly),
            Style::default().fg(theme::PEACH).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Overdue ", theme::dim_style()),
        Span::styled(
            totals.overdue.to_string(),
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(panel(" Summary ".into())), chunks[0]);

    let view = app.view_of(Route::Debts);
    let debts = app.store.debts.filtered(&view.query);
    if debts.is_empty() {
        render_empty(f, chunks[1], "Debts", view, "Add one with n or :new");
        return;
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(60), Constraint::Length(38)])
        .split(chunks[1]);

    let rows: Vec<Row> = debts
        .iter()
        .enumerate()
        .skip(view.scroll)
        .take(table_rows(body[0]))
        .map(|(i, d)| {
            let status = d.status.as_str();
            let status_cell = if i == view.index {
                Span::raw(status)
            } else {
                Span::styled(status, theme::status_style(status))
            };
            Row::new(vec![
                Cell::from(truncate(&d.description, 26)),
                Cell::from(d.category.clone()),
                Cell::from(format_amount(d.remaining_amount)),
                Cell::from(format!(
                    "{} {:>3}%",
                    progress_bar(d.progress_percent(), BAR_WIDTH),
                    d.progress_percent()
                )),
                Cell::from(d.due_date.map(format_date).unwrap_or_else(|| "-".into())),
                Cell::from(status_cell),
            ])
            .style(row_style(i, view.index))
        })
        .collect();

    let widths = [
        Constraint::Min(16),
        Constraint::Length(20),
        Constraint::Length(14),
        Constraint::Length(BAR_WIDTH as u16 + 5),
        Constraint::Length(11),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header_row(&["Description", "Category", "Remaining", "Paid", "Due", "Status"]))
        .block(panel(list_title("Debts", debts.len(), view)));
    f.render_widget(table, body[0]);

    if let Some(debt) = debts.get(view.index) {
        render_detail(f, body[1], debt);
    }
}

fn render_detail(f: &mut Frame, area: Rect, debt: &Debt) {
    let mut lines = vec![
        Line::from(Span::styled(
            truncate(&debt.description, area.width.saturating_sub(4) as usize),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        detail_row("Total", format_amount(debt.total_amount)),
        detail_row("Paid", format_amount(debt.paid_amount())),
        detail_row("Monthly", format_amount(debt.monthly_payment)),
        detail_row(
            "Installments",
            format!("{}/{}", debt.paid_installments, debt.installments),
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!("Payments ({})", debt.payments.len()),
            theme::section_style(),
        )),
    ];
    if debt.payments.is_empty() {
        lines.push(Line::from(Span::styled("  none yet · p to pay", theme::dim_style())));
    }
    for p in debt.payments.iter().rev() {
        let style = if p.is_late {
            theme::expense_style()
        } else {
            theme::normal_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", format_date(p.date)), theme::dim_style()),
            Span::styled(format_amount(p.amount), style),
            Span::styled(format!(" {}", p.method), theme::dim_style()),
        ]));
    }
    if !debt.notes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(debt.notes.as_str(), theme::dim_style())));
    }

    f.render_widget(
        Paragraph::new(lines).block(panel(format!(" Debt #{} ", debt.id))),
        area,
    );
}

fn detail_row(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<13}"), theme::dim_style()),
        Span::styled(value, theme::normal_style()),
    ])
}
