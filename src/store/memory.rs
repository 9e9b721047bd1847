//! # In-Memory Document Store
//!
//! A process-local implementation of the store contract. Every
//! mutation runs under one write lock, so a conditional `update_one`
//! (filter + mutation) is a single critical section. Slot admission
//! and status transitions rely on this to close their check-then-act
//! races.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::filter::{compare_values, Filter};
use super::update::{FindOptions, SortDirection, Update};
use super::{Document, DocumentStore, UpdateOutcome};

#[derive(Default)]
struct Inner {
    collections: HashMap<String, Vec<Document>>,
    unique_indexes: HashMap<String, Vec<Vec<String>>>,
}

/// In-memory document store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index key for a document, or None when any indexed field is
    /// absent (absent fields are exempt from uniqueness)
    fn index_key(doc: &Document, fields: &[String]) -> Option<Vec<Value>> {
        fields.iter().map(|f| doc.get(f).cloned()).collect()
    }

    fn unique_conflict(
        docs: &[Document],
        candidate: &Document,
        fields: &[String],
        skip: Option<usize>,
    ) -> bool {
        let Some(key) = Self::index_key(candidate, fields) else {
            return false;
        };
        docs.iter().enumerate().any(|(i, existing)| {
            Some(i) != skip && Self::index_key(existing, fields).as_ref() == Some(&key)
        })
    }

    fn check_indexes(
        inner: &Inner,
        collection: &str,
        candidate: &Document,
        skip: Option<usize>,
    ) -> StoreResult<()> {
        let docs = inner
            .collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        if let Some(indexes) = inner.unique_indexes.get(collection) {
            for fields in indexes {
                if Self::unique_conflict(docs, candidate, fields, skip) {
                    return Err(StoreError::UniqueViolation {
                        collection: collection.to_string(),
                        fields: fields.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn sort_documents(docs: &mut [Document], options: &FindOptions) {
        if options.sort.is_empty() {
            return;
        }
        docs.sort_by(|a, b| {
            for spec in &options.sort {
                let ordering = Self::order_values(a.get(&spec.field), b.get(&spec.field));
                let ordering = match spec.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Total ordering over optional JSON values.
    ///
    /// Absent sorts first; mixed types order by type rank
    /// (null < bool < number < string < array < object).
    fn order_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => {
                let rank = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };
                let (ra, rb) = (rank(a), rank(b));
                if ra != rb {
                    return ra.cmp(&rb);
                }
                compare_values(a, b).unwrap_or(Ordering::Equal)
            }
        }
    }

    fn project(doc: &Document, options: &FindOptions) -> Document {
        match &options.projection {
            None => doc.clone(),
            Some(fields) => {
                let mut out = serde_json::Map::new();
                if let Some(obj) = doc.as_object() {
                    for field in fields {
                        if let Some(value) = obj.get(field) {
                            out.insert(field.clone(), value.clone());
                        }
                    }
                }
                Value::Object(out)
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument(
                "Document must be a JSON object".to_string(),
            ));
        }

        let mut inner = self.inner.write().expect("Lock poisoned");
        Self::check_indexes(&inner, collection, &document, None)?;
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        let inner = self.inner.read().expect("Lock poisoned");
        let mut matched: Vec<Document> = inner
            .collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();

        Self::sort_documents(&mut matched, options);

        let matched: Vec<Document> = matched
            .into_iter()
            .skip(options.skip)
            .take(options.limit.unwrap_or(usize::MAX))
            .map(|doc| Self::project(&doc, options))
            .collect();

        Ok(matched)
    }

    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>> {
        let inner = self.inner.read().expect("Lock poisoned");
        Ok(inner
            .collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .find(|doc| filter.matches(doc))
            .cloned())
    }

    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome> {
        let mut inner = self.inner.write().expect("Lock poisoned");

        let position = inner
            .collections
            .get(collection)
            .and_then(|docs| docs.iter().position(|doc| filter.matches(doc)));
        let Some(position) = position else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };

        let before = inner.collections[collection][position].clone();
        let mut after = before.clone();
        update.apply(&mut after);

        Self::check_indexes(&inner, collection, &after, Some(position))?;

        let modified = usize::from(after != before);
        if let Some(docs) = inner.collections.get_mut(collection) {
            docs[position] = after;
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome> {
        let mut inner = self.inner.write().expect("Lock poisoned");

        let positions: Vec<usize> = inner
            .collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(i, _)| i)
            .collect();

        let mut outcome = UpdateOutcome {
            matched: positions.len(),
            modified: 0,
        };

        for position in positions {
            let before = inner.collections[collection][position].clone();
            let mut after = before.clone();
            update.apply(&mut after);

            Self::check_indexes(&inner, collection, &after, Some(position))?;

            if after != before {
                outcome.modified += 1;
            }
            if let Some(docs) = inner.collections.get_mut(collection) {
                docs[position] = after;
            }
        }

        Ok(outcome)
    }

    fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<bool> {
        let mut inner = self.inner.write().expect("Lock poisoned");
        let Some(docs) = inner.collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(position) => {
                docs.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count(&self, collection: &str, filter: &Filter) -> StoreResult<usize> {
        let inner = self.inner.read().expect("Lock poisoned");
        Ok(inner
            .collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(|doc| filter.matches(doc))
            .count())
    }

    fn ensure_unique_index(&self, collection: &str, fields: &[&str]) -> StoreResult<()> {
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let mut inner = self.inner.write().expect("Lock poisoned");

        // Reject an index the existing data already violates
        let docs = inner
            .collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        for (i, doc) in docs.iter().enumerate() {
            if Self::unique_conflict(docs, doc, &fields, Some(i)) {
                return Err(StoreError::UniqueViolation {
                    collection: collection.to_string(),
                    fields,
                });
            }
        }

        let indexes = inner.unique_indexes.entry(collection.to_string()).or_default();
        if !indexes.contains(&fields) {
            indexes.push(fields);
        }
        Ok(())
    }
}
