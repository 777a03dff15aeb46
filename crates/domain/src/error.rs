// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::AttendeeType;

/// Errors that can occur when building or changing domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Registration type string is not recognised.
    InvalidRegistrationType(String),
    /// Attendee type string is not recognised.
    InvalidAttendeeType(String),
    /// Contact preference string is not recognised.
    InvalidContactPreference(String),
    /// Grand officer status string is not recognised.
    InvalidGrandOfficer(String),
    /// Step number is outside 1..=6.
    InvalidStep(u8),
    /// A partner was created without the attendee it accompanies.
    MissingRelatedAttendee {
        /// The partner type requested.
        attendee_type: AttendeeType,
    },
    /// A partner references an attendee that does not exist or is itself
    /// a partner.
    InvalidRelatedAttendee {
        /// The referenced attendee id.
        related_attendee_id: String,
    },
    /// An attendee id was used twice within one registration.
    DuplicateAttendeeId(String),
    /// A stored selection holds both a package and individual events.
    ConflictingSelection,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRegistrationType(value) => {
                write!(f, "Invalid registration type: '{value}'")
            }
            Self::InvalidAttendeeType(value) => write!(f, "Invalid attendee type: '{value}'"),
            Self::InvalidContactPreference(value) => {
                write!(f, "Invalid contact preference: '{value}'")
            }
            Self::InvalidGrandOfficer(value) => {
                write!(f, "Invalid grand officer status: '{value}'")
            }
            Self::InvalidStep(step) => {
                write!(f, "Invalid step: {step}. Must be between 1 and 6")
            }
            Self::MissingRelatedAttendee { attendee_type } => {
                write!(
                    f,
                    "A {attendee_type} attendee requires the attendee they accompany"
                )
            }
            Self::InvalidRelatedAttendee {
                related_attendee_id,
            } => {
                write!(
                    f,
                    "Related attendee '{related_attendee_id}' does not exist or is a partner"
                )
            }
            Self::DuplicateAttendeeId(id) => write!(f, "Attendee id '{id}' is already in use"),
            Self::ConflictingSelection => write!(
                f,
                "A ticket selection cannot hold both a package and individual events"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
