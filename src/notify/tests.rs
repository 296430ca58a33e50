#![allow(clippy::unwrap_used)]

use super::*;

// ── Toasts ────────────────────────────────────────────────────

#[test]
fn test_lifetimes_per_level() {
    assert_eq!(Level::Success.lifetime(), Duration::from_millis(4000));
    assert_eq!(Level::Error.lifetime(), Duration::from_millis(5000));
    assert_eq!(Level::Warning.lifetime(), Duration::from_millis(4000));
    assert_eq!(Level::Info.lifetime(), Duration::from_millis(3000));
}

#[test]
fn test_tick_expires_by_level() {
    let now = Instant::now();
    let mut n = Notifier::default();
    n.push(Level::Info, "info", "", now);
    n.push(Level::Error, "error", "details", now);

    n.tick(now + Duration::from_millis(3500));
    let left: Vec<&str> = n.toasts().map(|t| t.message.as_str()).collect();
    assert_eq!(left, vec!["error"]);

    n.tick(now + Duration::from_millis(5000));
    assert!(n.is_empty());
}

#[test]
fn test_cap_drops_oldest() {
    let now = Instant::now();
    let mut n = Notifier::default();
    for i in 0..6 {
        n.push(Level::Success, &format!("t{i}"), "", now);
    }
    let left: Vec<&str> = n.toasts().map(|t| t.message.as_str()).collect();
    assert_eq!(left, vec!["t2", "t3", "t4", "t5"]);
}

#[test]
fn test_convenience_methods_record_level() {
    let mut n = Notifier::default();
    n.success("a", "");
    n.error("b", "");
    n.warning("c", "");
    n.info("d", "");
    let levels: Vec<Level> = n.toasts().map(|t| t.level).collect();
    assert_eq!(
        levels,
        vec![Level::Success, Level::Error, Level::Warning, Level::Info]
    );
}

// ── Confirmation ──────────────────────────────────────────────

#[test]
fn test_confirm_resolves_true() {
    let now = Instant::now();
    let mut req = ConfirmRequest::new(ConfirmOptions::default(), 7u32, now);
    assert!(req.is_pending());
    assert_eq!(req.poll(now), None);
    assert!(req.resolve(true));
    assert_eq!(req.poll(now), Some(true));
    assert_eq!(req.into_action(), 7);
}

#[test]
fn test_confirm_resolves_once() {
    let now = Instant::now();
    let mut req = ConfirmRequest::new(ConfirmOptions::default(), (), now);
    assert!(req.resolve(false));
    assert!(!req.resolve(true));
    assert_eq!(req.state(), ConfirmState::Cancelled);
    assert_eq!(req.poll(now), Some(false));
}

#[test]
fn test_cancel() {
    let now = Instant::now();
    let mut req = ConfirmRequest::new(ConfirmOptions::default(), (), now);
    req.cancel();
    assert_eq!(req.state(), ConfirmState::Cancelled);
}

#[test]
fn test_no_timeout_waits_forever() {
    let now = Instant::now();
    let mut req = ConfirmRequest::new(ConfirmOptions::default(), (), now);
    assert_eq!(req.poll(now + Duration::from_secs(86_400)), None);
    assert!(req.remaining(now).is_none());
}

#[test]
fn test_timeout_resolves_false() {
    let now = Instant::now();
    let options = ConfirmOptions::ask("Overshoot", "Continue?")
        .with_timeout(Some(Duration::from_secs(10)));
    let mut req = ConfirmRequest::new(options, (), now);

    assert_eq!(req.poll(now + Duration::from_secs(9)), None);
    assert_eq!(
        req.remaining(now + Duration::from_secs(9)),
        Some(Duration::from_secs(1))
    );
    assert_eq!(req.poll(now + Duration::from_secs(10)), Some(false));
    assert_eq!(req.state(), ConfirmState::TimedOut);
    // a late answer does not revive it
    assert!(!req.resolve(true));
}

#[test]
fn test_answer_before_timeout_wins() {
    let now = Instant::now();
    let options = ConfirmOptions::default().with_timeout(Some(Duration::from_secs(1)));
    let mut req = ConfirmRequest::new(options, (), now);
    req.resolve(true);
    assert_eq!(req.poll(now + Duration::from_secs(5)), Some(true));
}

#[test]
fn test_destructive_options() {
    let opts = ConfirmOptions::destructive("Delete vehicle", "Remove ABC-1234?");
    assert_eq!(opts.variant, Variant::Destructive);
    assert_eq!(opts.confirm_text, "Delete");
    assert_eq!(opts.cancel_text, "Cancel");
}
