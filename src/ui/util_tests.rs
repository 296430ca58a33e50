#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("Corolla", 10), "Corolla");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("Toyota Corolla", 6), "Toyot…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("Civic", 0), "");
}

#[test]
fn test_truncate_accented() {
    assert_eq!(truncate("Manutenção Veículos", 11), "Manutenção…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("Gol", 1), "…");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "R$ 1.234,56");
}

#[test]
fn test_format_amount_small() {
    assert_eq!(format_amount(dec!(840)), "R$ 840,00");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "R$ 0,00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-350)), "-R$ 350,00");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(150000)), "R$ 150.000,00");
    assert_eq!(format_amount(dec!(1234567.89)), "R$ 1.234.567,89");
}

#[test]
fn test_format_amount_rounds_to_two_decimals() {
    assert_eq!(format_amount(dec!(95.5)), "R$ 95,50");
}

// ── dates ─────────────────────────────────────────────────────

#[test]
fn test_format_date() {
    let d = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
    assert_eq!(format_date(d), "05/06/2025");
}

#[test]
fn test_format_days_left() {
    assert_eq!(format_days_left(12), "12 days");
    assert_eq!(format_days_left(1), "1 day");
    assert_eq!(format_days_left(0), "Vencido");
    assert_eq!(format_days_left(-3), "Vencido");
}

// ── progress / scrolling ──────────────────────────────────────

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(0, 4), "░░░░");
    assert_eq!(progress_bar(50, 4), "██░░");
    assert_eq!(progress_bar(250, 4), "████");
}

#[test]
fn test_scroll_down_keeps_cursor_visible() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 10, 3);
    assert_eq!((index, scroll), (3, 1));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (4, 2);
    scroll_down(&mut index, &mut scroll, 5, 3);
    assert_eq!((index, scroll), (4, 2));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_clamp_cursor_after_delete() {
    let (mut index, mut scroll) = (4, 3);
    clamp_cursor(&mut index, &mut scroll, 3);
    assert_eq!((index, scroll), (2, 2));
    clamp_cursor(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}
