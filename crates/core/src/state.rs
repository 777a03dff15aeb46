// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use proclamation_domain::{
    AttendeeId, AttendeeRecord, BillingDetails, RegistrationType, Step,
};
use serde::{Deserialize, Serialize};

/// Identifier of a persisted draft.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(String);

impl DraftId {
    /// Wraps an existing identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The whole in-progress registration.
///
/// A registration starts empty. Choosing a type gives it a draft id, after
/// which every change is snapshotted to the local draft store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub draft_id: Option<DraftId>,
    pub registration_type: Option<RegistrationType>,
    /// Attendees in display order.
    pub attendees: Vec<AttendeeRecord>,
    pub billing_details: Option<BillingDetails>,
    pub agree_to_terms: bool,
    /// The step currently shown.
    pub step: Step,
    /// The highest step ever reached in this draft.
    pub furthest_step: Step,
}

impl Registration {
    /// Creates an empty registration at the first step.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            draft_id: None,
            registration_type: None,
            attendees: Vec::new(),
            billing_details: None,
            agree_to_terms: false,
            step: Step::FIRST,
            furthest_step: Step::FIRST,
        }
    }

    /// Looks up an attendee by id.
    #[must_use]
    pub fn attendee(&self, attendee_id: &AttendeeId) -> Option<&AttendeeRecord> {
        self.attendees.iter().find(|a| &a.attendee_id == attendee_id)
    }

    /// Returns the primary attendee, if any.
    #[must_use]
    pub fn primary_attendee(&self) -> Option<&AttendeeRecord> {
        self.attendees.iter().find(|a| a.is_primary)
    }
}

/// What a successful transition did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// A fresh draft was started.
    DraftStarted { draft_id: DraftId },
    /// An attendee was appended.
    AttendeeAdded { attendee_id: AttendeeId },
    /// Attendees were removed, the target first and then its partners.
    AttendeesRemoved { attendee_ids: Vec<AttendeeId> },
    /// The current step changed.
    StepChanged {
        from: Step,
        to: Step,
        scroll_to_top: bool,
    },
    /// Fields were changed in place.
    Updated,
    /// The registration was reset to its initial state.
    Cleared,
    /// Nothing changed.
    Unchanged,
}

impl TransitionOutcome {
    /// Returns whether the transition changed persisted state.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: Registration,
    /// What the transition did.
    pub outcome: TransitionOutcome,
}
