//! Append-only record collections.

use serde::Serialize;

use mindful_core::types::{Contact, Reminder};

/// A record with one required field.
pub trait Record {
    /// Value that must be non-empty for the record to be stored.
    fn primary(&self) -> &str;

    /// Short name used in logs.
    const KIND: &'static str;
}

impl Record for Reminder {
    const KIND: &'static str = "reminder";

    fn primary(&self) -> &str {
        &self.medicine
    }
}

impl Record for Contact {
    const KIND: &'static str = "contact";

    fn primary(&self) -> &str {
        &self.name
    }
}

/// Insertion-ordered list of records with no update, delete or dedup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` unless its primary field is empty.
    ///
    /// Returns whether the record was stored. A skipped record is not an
    /// error; the form is simply ignored.
    pub fn add(&mut self, record: T) -> bool {
        if record.primary().is_empty() {
            tracing::debug!(kind = T::KIND, "Skipped record with empty primary field");
            return false;
        }
        self.items.push(record);
        tracing::debug!(kind = T::KIND, count = self.items.len(), "Record added");
        true
    }

    /// All records, oldest first.
    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
