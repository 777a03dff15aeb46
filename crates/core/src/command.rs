// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use proclamation_domain::{AttendeeId, AttendeePatch, BillingDetails, NewAttendee, RegistrationType};

/// A command represents user intent as data only.
///
/// Commands are the only way to request changes to a `Registration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Discard the current registration and begin a fresh draft.
    StartNewRegistration {
        /// The type of the new registration.
        registration_type: RegistrationType,
    },
    /// Set the registration type, keeping attendees.
    SetRegistrationType {
        /// The registration type.
        registration_type: RegistrationType,
    },
    /// Append an attendee.
    AddAttendee {
        /// Creation input.
        new: NewAttendee,
    },
    /// Create the primary attendee if the registration has none yet.
    AddPrimaryAttendee,
    /// Merge a patch into an attendee.
    UpdateAttendee {
        /// The attendee to update.
        attendee_id: AttendeeId,
        /// The fields to change.
        patch: AttendeePatch,
    },
    /// Remove an attendee and every partner accompanying them.
    RemoveAttendee {
        /// The attendee to remove.
        attendee_id: AttendeeId,
    },
    /// Replace the billing details.
    UpdateBillingDetails {
        /// The new billing details.
        details: BillingDetails,
    },
    /// Record whether the terms and conditions were accepted.
    SetAgreeToTerms {
        /// Acceptance flag.
        agree: bool,
    },
    /// Reset the registration to its initial empty state.
    ClearRegistration,
    /// Move forward one step.
    NextStep,
    /// Move back one step.
    PrevStep,
    /// Jump to a step. Out of range numbers are clamped into the flow.
    GoToStep {
        /// The 1-based step number.
        step: i32,
    },
}
