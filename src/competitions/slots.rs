//! Slot allocation
//!
//! Standard and premium share slots 0..max_standard_slots; the slots
//! above that are premium-exclusive. Admission looks only at the
//! combined total against the tier's ceiling.

use serde::Serialize;
use serde_json::json;

use super::errors::{CompetitionError, CompetitionResult};
use crate::models::{Competition, Plan};
use crate::store::{collections, DocumentStore, Filter, Update};

/// Remaining capacity for a plan tier in one week
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SlotAvailability {
    pub available: bool,
    pub remaining: i64,
}

/// Decides and records slot admission
pub struct SlotAllocator;

impl SlotAllocator {
    /// Pure capacity check; safe to call repeatedly for display
    pub fn check_availability(competition: &Competition, plan: Plan) -> SlotAvailability {
        let ceiling = competition.slot_ceiling(plan);
        let remaining = (ceiling - competition.total_submissions).max(0);
        SlotAvailability {
            available: remaining > 0,
            remaining,
        }
    }

    /// Claim one slot.
    ///
    /// A single conditional increment-if-below-ceiling write, so two
    /// concurrent submissions can never both take the last slot.
    pub fn admit(
        store: &dyn DocumentStore,
        competition: &Competition,
        plan: Plan,
    ) -> CompetitionResult<()> {
        let ceiling = competition.slot_ceiling(plan);
        let outcome = store.update_one(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("id", json!(competition.id))
                .lt("total_submissions", json!(ceiling)),
            &Update::new()
                .inc("total_submissions", 1)
                .inc(Self::plan_counter(plan), 1),
        )?;

        if outcome.matched == 0 {
            return Err(CompetitionError::WeekFull {
                competition_id: competition.competition_id.clone(),
                plan,
            });
        }
        Ok(())
    }

    /// Give back a claimed slot after a failed insert
    pub fn release(
        store: &dyn DocumentStore,
        competition_id: &str,
        plan: Plan,
    ) -> CompetitionResult<()> {
        store.update_one(
            collections::COMPETITIONS,
            &Filter::new()
                .eq("id", json!(competition_id))
                .gt("total_submissions", json!(0)),
            &Update::new()
                .inc("total_submissions", -1)
                .inc(Self::plan_counter(plan), -1),
        )?;
        Ok(())
    }

    fn plan_counter(plan: Plan) -> &'static str {
        match plan {
            Plan::Standard => "standard_submissions",
            Plan::Premium => "premium_submissions",
        }
    }
}
