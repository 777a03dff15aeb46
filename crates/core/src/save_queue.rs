// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::{DraftId, Registration};
use std::time::{Duration, Instant};

/// Debounced queue holding at most one pending draft save.
///
/// Each mutation replaces the pending snapshot and pushes the deadline to
/// `now + debounce`, so a burst of mutations produces a single write once
/// the burst has been quiet for the debounce period. Time is passed in
/// explicitly; the queue never reads a clock.
#[derive(Debug, Clone)]
pub struct SaveQueue {
    debounce: Duration,
    pending: Option<PendingSave>,
}

#[derive(Debug, Clone)]
struct PendingSave {
    registration: Registration,
    deadline: Instant,
}

impl SaveQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            pending: None,
        }
    }

    /// Records the latest state to save.
    pub fn schedule(&mut self, registration: Registration, now: Instant) {
        self.pending = Some(PendingSave {
            registration,
            deadline: now + self.debounce,
        });
    }

    /// Returns whether a save is pending.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the draft the pending save belongs to.
    #[must_use]
    pub fn pending_draft_id(&self) -> Option<&DraftId> {
        self.pending
            .as_ref()
            .and_then(|p| p.registration.draft_id.as_ref())
    }

    /// Returns when the pending save becomes due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Takes the pending state if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<Registration> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            return self.take();
        }
        None
    }

    /// Takes the pending state regardless of its deadline.
    pub fn take(&mut self) -> Option<Registration> {
        self.pending.take().map(|p| p.registration)
    }

    /// Drops the pending save.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
