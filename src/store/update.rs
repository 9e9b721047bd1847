//! # Update Documents and Find Options
//!
//! `Update` mirrors the Mongo `$set`/`$inc`/`$unset` surface. `$inc`
//! must be applied inside the store's critical section so counters stay
//! correct under concurrent requests.

use serde_json::Value;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A single sort key
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on a field
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on a field
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Options for find operations
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Sort keys applied in order; ties keep insertion order (stable)
    pub sort: Vec<SortSpec>,

    /// Maximum number of documents returned
    pub limit: Option<usize>,

    /// Number of matching documents skipped before collecting
    pub skip: usize,

    /// When set, returned documents keep only the listed fields
    pub projection: Option<Vec<String>>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.sort.push(spec);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn projection(mut self, fields: Vec<String>) -> Self {
        self.projection = Some(fields);
        self
    }
}

/// A mutation applied to matching documents
#[derive(Debug, Clone, Default)]
pub struct Update {
    set: Vec<(String, Value)>,
    inc: Vec<(String, i64)>,
    unset: Vec<String>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a value
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.set.push((field.into(), value));
        self
    }

    /// Atomically add a delta to an integer field (absent counts as 0)
    pub fn inc(mut self, field: impl Into<String>, delta: i64) -> Self {
        self.inc.push((field.into(), delta));
        self
    }

    /// Remove a field
    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.unset.push(field.into());
        self
    }

    /// True when the update performs no mutation
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.inc.is_empty() && self.unset.is_empty()
    }

    /// Apply the mutation to a document in place
    pub fn apply(&self, doc: &mut Value) {
        let Some(obj) = doc.as_object_mut() else {
            return;
        };

        for (field, value) in &self.set {
            obj.insert(field.clone(), value.clone());
        }

        for (field, delta) in &self.inc {
            let current = obj.get(field).and_then(Value::as_i64).unwrap_or(0);
            obj.insert(field.clone(), Value::from(current + delta));
        }

        for field in &self.unset {
            obj.remove(field);
        }
    }
}
