//! Link-type and winner award subsystem
//!
//! Automatic awarding on competition close plus admin-triggered manual
//! overrides, all journaled through the append-only link-type ledger.

mod engine;
mod errors;
mod journal;
mod link_types;

pub use engine::{AwardEngine, AwardSummary};
pub use errors::{AwardError, AwardResult};
pub use journal::LinkTypeJournal;
pub use link_types::{
    BulkError, BulkOutcome, LinkTypeDirection, LinkTypeManager, LinkTypeUpdate,
};
