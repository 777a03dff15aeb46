// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod attendee;
mod billing;
mod error;
mod selection;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use attendee::{
    AttendeeId, AttendeeKind, AttendeePatch, AttendeeRecord, ContactDetails,
    GRAND_LODGE_RANK, GRAND_OFFICE_OTHER, GRAND_OFFICE_PLACEHOLDER, MasonProfile, NewAttendee,
    PartnerLink, PersonalDetails, dangling_partner_references, has_primary_attendee,
    validate_partner_reference,
};
pub use billing::{BillingDetails, validate_billing_details};
pub use error::DomainError;
pub use selection::{SelectionChange, SelectionRecord, SelectionState};
pub use types::{AttendeeType, ContactPreference, GrandOfficer, RegistrationType, Step};
pub use validation::{TERMS_NOT_ACCEPTED, attendee_detail_errors, is_valid_email};
