//! Document store adapter
//!
//! The engine consumes a generic collection-scoped CRUD contract with
//! Mongo-style filter operators and per-document atomic updates. A
//! managed database sits behind this trait in production; the
//! in-memory implementation here backs tests and the single-binary
//! deployment.

mod errors;
mod filter;
mod memory;
mod update;

pub use errors::{StoreError, StoreResult};
pub use filter::{Clause, Filter, Predicate};
pub use memory::MemoryStore;
pub use update::{FindOptions, SortDirection, SortSpec, Update};

/// A stored document
pub type Document = serde_json::Value;

/// Collection names
pub mod collections {
    pub const APPS: &str = "apps";
    pub const COMPETITIONS: &str = "competitions";
    pub const VOTES: &str = "votes";
    pub const USERS: &str = "users";
    pub const WEBHOOK_LOGS: &str = "webhook_logs";
    pub const LINK_TYPE_CHANGES: &str = "link_type_changes";
}

/// Result of an update operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents the filter matched
    pub matched: usize,

    /// Documents actually changed by the mutation
    pub modified: usize,
}

/// Collection-scoped document operations.
///
/// Contract requirements:
/// - `update_one`/`update_many` evaluate the filter and apply the
///   mutation as one atomic step per document (conditional updates are
///   usable as compare-and-swap gates).
/// - `$inc` is atomic per document.
/// - `insert_one` fails with a unique violation when a compound index
///   installed via `ensure_unique_index` would be broken; it never
///   silently succeeds on conflict.
pub trait DocumentStore: Send + Sync {
    /// Insert a single document (must be a JSON object)
    fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()>;

    /// Find all matching documents
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>>;

    /// Find the first matching document
    fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Apply an update to the first matching document
    fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome>;

    /// Apply an update to every matching document
    fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<UpdateOutcome>;

    /// Delete the first matching document; returns whether one was deleted
    fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<bool>;

    /// Count matching documents
    fn count(&self, collection: &str, filter: &Filter) -> StoreResult<usize>;

    /// Install a unique compound index over the given fields
    fn ensure_unique_index(&self, collection: &str, fields: &[&str]) -> StoreResult<()>;
}
