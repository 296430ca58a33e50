use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use super::{header_row, list_title, panel, render_empty, row_style, table_rows};
use crate::models::{FinancialSummary, TxnKind};
use crate::routes::Route;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, format_date, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let summary = FinancialSummary::of(app.store.transactions.items());
    let balance_style = if summary.balance >= Decimal::ZERO {
        theme::income_style()
    } else {
        theme::expense_style()
    };
    let line = Line::from(vec![
        Span::styled(" Income ", theme::dim_style()),
        Span::styled(
            format_amount(summary.income),
            theme::income_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Expenses ", theme::dim_style()),
        Span::styled(
            format_amount(summary.expense),
            theme::expense_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Balance ", theme::dim_style()),
        Span::styled(
            format_amount(summary.balance),
            balance_style.add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(panel(" Summary ".into())), chunks[0]);

    let view = app.view_of(Route::PersonalTransactions);
    let transactions = app.store.transactions.filtered(&view.query);
    if transactions.is_empty() {
        render_empty(f, chunks[1], "Transactions", view, "Add one with n or :new");
        return;
    }

    let rows: Vec<Row> = transactions
        .iter()
        .enumerate()
        .skip(view.scroll)
        .take(table_rows(chunks[1]))
        .map(|(i, t)| {
            let amount_style = match t.kind {
                TxnKind::Income => theme::income_style(),
                TxnKind::Expense => theme::expense_style(),
            };
            let sign = if t.kind == TxnKind::Income { "+" } else { "-" };
            let amount = format!("{sign}{}", format_amount(t.amount));
            let amount_cell = if i == view.index {
                Span::raw(amount)
            } else {
                Span::styled(amount, amount_style)
            };

            Row::new(vec![
                Cell::from(format_date(t.date)),
                Cell::from(truncate(&t.description, 36)),
                Cell::from(t.kind.label()),
                Cell::from(t.category.clone()),
                Cell::from(t.payment_method.clone()),
                Cell::from(amount_cell),
            ])
            .style(row_style(i, view.index))
        })
        .collect();

    let widths = [
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(20),
        Constraint::Length(18),
        Constraint::Length(15),
    ];

    let table = Table::new(rows, widths)
        .header(header_row(&["Date", "Description", "Type", "Category", "Method", "Amount"]))
        .block(panel(list_title("Transactions", transactions.len(), view)));
    f.render_widget(table, chunks[1]);
}
