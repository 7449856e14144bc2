//! Status lifecycle.
//!
//! Statuses move forward through three stages and never back:
//!
//! ```text
//! Draft → {Active | Accepted | Rejected | Withdrawn | Deferred} → {Final | Superseded | Replaced}
//! ```

use crate::date::PostEntry;
use crate::error::LifecycleError;
use crate::record::{ProposalRecord, Status};

impl Status {
    /// 0 = draft, 1 = decided, 2 = closed.
    pub fn stage(self) -> u8 {
        match self {
            Status::Draft => 0,
            Status::Active
            | Status::Accepted
            | Status::Rejected
            | Status::Withdrawn
            | Status::Deferred => 1,
            Status::Final | Status::Superseded | Status::Replaced => 2,
        }
    }

    /// Statuses reachable in one step.
    pub fn successors(self) -> Vec<Status> {
        Status::ALL
            .into_iter()
            .filter(|to| can_transition(self, *to))
            .collect()
    }
}

pub fn can_transition(from: Status, to: Status) -> bool {
    to.stage() == from.stage() + 1
}

impl ProposalRecord {
    /// Move the record to `to`, if the lifecycle allows it.
    pub fn advance_status(&mut self, to: Status) -> Result<(), LifecycleError> {
        if !can_transition(self.status, to) {
            return Err(LifecycleError::Transition {
                number: self.number(),
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Append a discussion date. Dates must not go backwards.
    pub fn record_post(&mut self, entry: impl Into<PostEntry>) -> Result<(), LifecycleError> {
        let entry = entry.into();
        let floor = self
            .post_history
            .last()
            .map(|post| post.date)
            .unwrap_or(self.created)
            .max(self.created);
        if entry.date < floor {
            return Err(LifecycleError::PostOutOfOrder {
                number: self.number(),
                date: entry.date.to_string(),
                floor: floor.to_string(),
            });
        }
        self.post_history.push(entry);
        Ok(())
    }
}
