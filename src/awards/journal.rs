//! Link-type change journal
//!
//! An append-only ledger over the `link_type_changes` collection. The
//! type exposes appends and reads only; there is no way to mutate or
//! delete a record through it, which makes the audit-trail invariant
//! structural rather than conventional.

use std::sync::Arc;

use crate::models::{from_document, to_document, LinkTypeChange};
use crate::store::{collections, DocumentStore, Filter, FindOptions, SortSpec, StoreResult};

/// Append-only journal of link-type transitions
#[derive(Clone)]
pub struct LinkTypeJournal {
    store: Arc<dyn DocumentStore>,
}

impl LinkTypeJournal {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record one transition
    pub fn append(&self, change: &LinkTypeChange) -> StoreResult<()> {
        self.store
            .insert_one(collections::LINK_TYPE_CHANGES, to_document(change)?)
    }

    /// All transitions for a project, oldest first
    pub fn for_project(&self, project_id: &str) -> StoreResult<Vec<LinkTypeChange>> {
        let docs = self.store.find(
            collections::LINK_TYPE_CHANGES,
            &Filter::new().eq("project_id", serde_json::json!(project_id)),
            &FindOptions::new().sort(SortSpec::asc("timestamp")),
        )?;
        docs.iter().map(from_document).collect()
    }

    /// Total number of journaled transitions
    pub fn len(&self) -> StoreResult<usize> {
        self.store.count(collections::LINK_TYPE_CHANGES, &Filter::all())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkType;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    #[test]
    fn test_append_and_read_in_order() {
        let journal = LinkTypeJournal::new(Arc::new(MemoryStore::new()));
        let t0 = chrono::Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap();

        for (i, reason) in ["weekly_winner_position_1", "manual_downgrade"].iter().enumerate() {
            journal
                .append(&LinkTypeChange {
                    project_id: "app-1".into(),
                    from_type: if i == 0 { LinkType::Nofollow } else { LinkType::Dofollow },
                    to_type: if i == 0 { LinkType::Dofollow } else { LinkType::Nofollow },
                    changed_by: "system".into(),
                    reason: reason.to_string(),
                    timestamp: t0 + chrono::Duration::hours(i as i64),
                })
                .unwrap();
        }

        let changes = journal.for_project("app-1").unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].reason, "weekly_winner_position_1");
        assert_eq!(changes[1].reason, "manual_downgrade");
    }
}
