#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::form::{parse_date, parse_decimal};
use super::*;
use crate::error::Error;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: u32,
    name: String,
    status: String,
}

impl Record for Item {
    const ENTITY: &'static str = "item";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    fn search_text(&self) -> Vec<&str> {
        vec![&self.name]
    }

    fn facet(&self, name: &str) -> Option<&str> {
        (name == "status").then_some(self.status.as_str())
    }
}

struct ItemSchema;

impl Schema for ItemSchema {
    type Record = Item;

    fn title(&self) -> &'static str {
        "Item"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::text("name", "Name").required(),
            FieldSpec::choice("status", "Status", &["open", "closed"]),
        ]
    }

    fn build(&self, form: &FormValues, _existing: Option<&Item>) -> crate::error::Result<Item> {
        let mut v = Validator::new(form);
        let name = v.min_len("name", "Name", 3);
        let status = v.choice("status", "Status", &["open", "closed"]);
        v.finish()?;
        Ok(Item { id: 0, name, status })
    }

    fn to_form(&self, item: &Item) -> FormValues {
        FormValues::from_pairs(&[("name", item.name.as_str()), ("status", item.status.as_str())])
    }
}

fn item(id: u32, name: &str, status: &str) -> Item {
    Item {
        id,
        name: name.into(),
        status: status.into(),
    }
}

fn sample() -> ListController<Item> {
    ListController::new(vec![
        item(1, "Alpha", "open"),
        item(2, "Beta", "closed"),
        item(3, "alphabet", "closed"),
    ])
}

// ── Query ─────────────────────────────────────────────────────

#[test]
fn test_search_is_case_insensitive_substring() {
    let list = sample();
    let ids: Vec<u32> = list
        .filtered(&Query::search("ALPHA"))
        .iter()
        .map(|i| i.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[test]
fn test_facet_and_search_combine() {
    let list = sample();
    let q = Query::search("alpha").with_facet("status", "closed");
    let ids: Vec<u32> = list.filtered(&q).iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![3]);
}

#[test]
fn test_all_facet_and_empty_search_match_everything() {
    let list = sample();
    let mut q = Query::default().with_facet("status", "open");
    q.set_facet("status", "all");
    assert!(q.is_empty());
    assert_eq!(list.filtered(&q).len(), 3);
}

#[test]
fn test_unknown_facet_matches_nothing() {
    let list = sample();
    let q = Query::default().with_facet("color", "red");
    assert!(list.filtered(&q).is_empty());
}

// ── Ids ───────────────────────────────────────────────────────

#[test]
fn test_next_id_after_delete_does_not_collide() {
    let mut list = sample();
    list.remove(2).unwrap();
    // a length-based id would reuse 3
    assert_eq!(list.next_id(), 4);
    let id = list.insert(item(0, "Gamma", "open"));
    assert_eq!(id, 4);
}

#[test]
fn test_next_id_empty_list() {
    let list: ListController<Item> = ListController::default();
    assert_eq!(list.next_id(), 1);
}

// ── Create / update / remove ──────────────────────────────────

#[test]
fn test_create_validates_first() {
    let mut list = sample();
    let bad = FormValues::from_pairs(&[("name", "ab"), ("status", "weird")]);
    let err = list.create(&ItemSchema, &bad).unwrap_err();
    match err {
        Error::Validation(messages) => assert_eq!(messages.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(list.len(), 3);

    let good = ItemSchema.empty_form().with("name", "Delta");
    let id = list.create(&ItemSchema, &good).unwrap();
    assert_eq!(list.get(id).unwrap().status, "open");
}

#[test]
fn test_update_keeps_id() {
    let mut list = sample();
    let form = ItemSchema.to_form(list.get(2).unwrap()).with("name", "Beta 2");
    list.update(&ItemSchema, 2, &form).unwrap();
    let updated = list.get(2).unwrap();
    assert_eq!(updated.id, 2);
    assert_eq!(updated.name, "Beta 2");
}

#[test]
fn test_update_missing_is_not_found() {
    let mut list = sample();
    let form = FormValues::from_pairs(&[("name", "Nobody")]);
    let err = list.update(&ItemSchema, 99, &form).unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "item", id: 99 }));
}

#[test]
fn test_update_with_rolls_back_on_error() {
    let mut list = sample();
    let result: crate::error::Result<()> = list.update_with(1, |i| {
        i.name = "changed".into();
        Err(Error::business("nope"))
    });
    assert!(result.is_err());
    assert_eq!(list.get(1).unwrap().name, "Alpha");

    list.update_with(1, |i| {
        i.status = "closed".into();
        Ok(())
    })
    .unwrap();
    assert_eq!(list.get(1).unwrap().status, "closed");
}

#[test]
fn test_remove() {
    let mut list = sample();
    let removed = list.remove(1).unwrap();
    assert_eq!(removed.name, "Alpha");
    assert!(list.get(1).is_none());
    assert!(list.remove(1).is_err());
}

// ── Parsing ───────────────────────────────────────────────────

#[test]
fn test_parse_decimal_formats() {
    assert_eq!(parse_decimal("1234.5"), Some(dec!(1234.5)));
    assert_eq!(parse_decimal("1234,5"), Some(dec!(1234.5)));
    assert_eq!(parse_decimal("1.234,50"), Some(dec!(1234.50)));
    assert_eq!(parse_decimal("R$ 80"), Some(dec!(80)));
    assert_eq!(parse_decimal(""), None);
    assert_eq!(parse_decimal("abc"), None);
}

#[test]
fn test_parse_date_formats() {
    let expected = chrono::NaiveDate::from_ymd_opt(2025, 6, 15);
    assert_eq!(parse_date("2025-06-15"), expected);
    assert_eq!(parse_date("15/06/2025"), expected);
    assert_eq!(parse_date("2025-13-01"), None);
}

#[test]
fn test_validator_positive() {
    let form = FormValues::from_pairs(&[("a", "0"), ("b", "-1"), ("c", "12,5")]);
    let mut v = Validator::new(&form);
    assert_eq!(v.positive("a", "A"), rust_decimal::Decimal::ZERO);
    v.positive("b", "B");
    assert_eq!(v.positive("c", "C"), dec!(12.5));
    v.positive("missing", "Missing");
    let messages = v.finish().unwrap_err().messages();
    assert_eq!(
        messages,
        vec![
            "A must be a positive number",
            "B must be a positive number",
            "Missing is required",
        ]
    );
}

// ── FormState ─────────────────────────────────────────────────

#[test]
fn test_form_state_typing_and_cycling() {
    let fields = ItemSchema.fields();
    let mut form = FormState::new("New item", fields.clone(), FormValues::defaults(&fields), ());

    for c in "Zed".chars() {
        form.input(c);
    }
    form.backspace();
    assert_eq!(form.values.get("name"), "Ze");

    form.next_field();
    form.input('x'); // ignored on a choice field
    assert_eq!(form.values.get("status"), "open");
    form.cycle(true);
    assert_eq!(form.values.get("status"), "closed");
    form.cycle(true);
    assert_eq!(form.values.get("status"), "open");
    form.cycle(false);
    assert_eq!(form.values.get("status"), "closed");

    form.next_field();
    assert_eq!(form.focus, 0);
    form.prev_field();
    assert_eq!(form.focus, 1);
}

#[test]
fn test_toggle_field() {
    let fields = vec![FieldSpec::toggle("late", "Late")];
    let mut form = FormState::new("t", fields.clone(), FormValues::defaults(&fields), ());
    assert_eq!(form.values.get("late"), "false");
    form.cycle(true);
    assert_eq!(form.values.get("late"), "true");
    assert!(Validator::new(&form.values).toggle("late"));
}
