//! Generic list handling shared by every entity page: filtering, id
//! assignment, create/edit/delete through a [`Schema`].

mod form;

pub use form::{FieldKind, FieldSpec, FormState, FormValues, Validator};

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A row that can live in a [`ListController`].
pub trait Record: Clone {
    /// Lowercase entity name used in messages and logs.
    const ENTITY: &'static str;

    fn id(&self) -> u32;
    fn set_id(&mut self, id: u32);

    /// Fields the free-text search looks at.
    fn search_text(&self) -> Vec<&str>;

    /// Value of a named dropdown filter, if the record has one.
    fn facet(&self, _name: &str) -> Option<&str> {
        None
    }
}

/// Field layout, validation and conversion for one entity's form.
pub trait Schema {
    type Record: Record;

    /// Dialog title, e.g. "Vehicle".
    fn title(&self) -> &'static str;
    fn fields(&self) -> Vec<FieldSpec>;

    /// Validate the form and build a record. `existing` is the record being
    /// edited, so fields the form does not show can be carried over.
    fn build(&self, form: &FormValues, existing: Option<&Self::Record>) -> Result<Self::Record>;

    fn to_form(&self, record: &Self::Record) -> FormValues;

    /// Field layout for the current values, for forms whose options depend
    /// on another field.
    fn fields_for(&self, _form: &FormValues) -> Vec<FieldSpec> {
        self.fields()
    }

    /// Called after `key` changed; may fill in dependent fields.
    fn on_change(&self, _key: &str, _form: &mut FormValues) {}

    /// Blank form with every field's default.
    fn empty_form(&self) -> FormValues {
        FormValues::defaults(&self.fields())
    }
}

/// Search text plus exact-match facet filters, ANDed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub search: String,
    facets: BTreeMap<String, String>,
}

impl Query {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            facets: BTreeMap::new(),
        }
    }

    /// `"all"` (or an empty value) clears the facet.
    pub fn set_facet(&mut self, name: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            self.facets.remove(name);
        } else {
            self.facets.insert(name.to_string(), value.to_string());
        }
    }

    pub fn with_facet(mut self, name: &str, value: &str) -> Self {
        self.set_facet(name, value);
        self
    }

    pub fn facet(&self, name: &str) -> Option<&str> {
        self.facets.get(name).map(String::as_str)
    }

    pub fn facets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facets.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn clear(&mut self) {
        self.search.clear();
        self.facets.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.facets.is_empty()
    }

    pub fn matches<T: Record>(&self, record: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        let text_ok = needle.is_empty()
            || record
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
        text_ok
            && self
                .facets
                .iter()
                .all(|(name, value)| record.facet(name) == Some(value.as_str()))
    }
}

/// In-memory list of one entity type. Aggregates are always computed from
/// the full list, never from a filtered view.
#[derive(Debug, Clone)]
pub struct ListController<T: Record> {
    items: Vec<T>,
}

impl<T: Record> Default for ListController<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> ListController<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn filtered(&self, query: &Query) -> Vec<&T> {
        self.items.iter().filter(|r| query.matches(*r)).collect()
    }

    /// One past the highest id in use, so ids never repeat after deletions.
    pub fn next_id(&self) -> u32 {
        self.items.iter().map(Record::id).max().unwrap_or(0) + 1
    }

    /// Append a record under a fresh id.
    pub fn insert(&mut self, mut record: T) -> u32 {
        let id = self.next_id();
        record.set_id(id);
        self.items.push(record);
        tracing::debug!(entity = T::ENTITY, id, "record created");
        id
    }

    pub fn create<S>(&mut self, schema: &S, form: &FormValues) -> Result<u32>
    where
        S: Schema<Record = T>,
    {
        let record = schema.build(form, None)?;
        Ok(self.insert(record))
    }

    pub fn update<S>(&mut self, schema: &S, id: u32, form: &FormValues) -> Result<()>
    where
        S: Schema<Record = T>,
    {
        let pos = self.position(id)?;
        let mut record = schema.build(form, Some(&self.items[pos]))?;
        record.set_id(id);
        self.items[pos] = record;
        tracing::debug!(entity = T::ENTITY, id, "record updated");
        Ok(())
    }

    /// Run a domain mutation on one record. The change is applied to a copy
    /// and only committed when `f` succeeds.
    pub fn update_with<R>(&mut self, id: u32, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let pos = self.position(id)?;
        let mut draft = self.items[pos].clone();
        let out = f(&mut draft)?;
        self.items[pos] = draft;
        Ok(out)
    }

    pub fn remove(&mut self, id: u32) -> Result<T> {
        let pos = self.position(id)?;
        let removed = self.items.remove(pos);
        tracing::info!(entity = T::ENTITY, id, "record deleted");
        Ok(removed)
    }

    fn position(&self, id: u32) -> Result<usize> {
        self.items
            .iter()
            .position(|r| r.id() == id)
            .ok_or(Error::NotFound {
                entity: T::ENTITY,
                id,
            })
    }
}

#[cfg(test)]
mod tests;
