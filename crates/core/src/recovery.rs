// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::{DraftId, Registration};
use proclamation_domain::{RegistrationType, Step};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Returns whether a draft is worth offering for recovery.
///
/// A draft is meaningful when it has an id and at least one attendee with
/// both a first and last name.
#[must_use]
pub fn is_meaningful_draft(registration: &Registration) -> bool {
    registration.draft_id.is_some() && registration.attendees.iter().any(|a| a.has_name())
}

/// Summary shown when an existing draft is found for the selected type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPrompt {
    pub draft_id: DraftId,
    pub registration_type: RegistrationType,
    pub attendee_count: usize,
    pub primary_attendee_name: Option<String>,
    pub step: Step,
}

impl RecoveryPrompt {
    pub(crate) fn for_draft(
        registration: &Registration,
        draft_id: DraftId,
        registration_type: RegistrationType,
    ) -> Self {
        Self {
            draft_id,
            registration_type,
            attendee_count: registration.attendees.len(),
            primary_attendee_name: registration
                .primary_attendee()
                .map(proclamation_domain::AttendeeRecord::full_name)
                .filter(|name| !name.is_empty()),
            step: registration.step,
        }
    }
}

/// How the user answered a recovery prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryChoice {
    /// Resume the draft at its saved step.
    Continue,
    /// Resume the draft at the attendee details step.
    EditAttendees,
    /// Discard the draft and start a new registration.
    StartNew,
}

impl RecoveryChoice {
    /// Converts this choice to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::EditAttendees => "edit_attendees",
            Self::StartNew => "start_new",
        }
    }
}

impl FromStr for RecoveryChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continue" => Ok(Self::Continue),
            "edit_attendees" => Ok(Self::EditAttendees),
            "start_new" => Ok(Self::StartNew),
            _ => Err(format!("Invalid recovery choice: '{s}'")),
        }
    }
}

/// Result of selecting a registration type or answering a recovery prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeSelection {
    /// A meaningful draft exists; the user must choose what to do with it.
    RecoveryPrompt(RecoveryPrompt),
    /// A new draft was started.
    Started { draft_id: DraftId },
    /// An existing draft was resumed.
    Resumed { draft_id: DraftId, step: Step },
}
