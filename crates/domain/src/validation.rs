// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Attendee detail validation.
//!
//! Validation here is pure and total: it returns every violation at once as
//! a list of readable messages and never fails. It is safe to call on every
//! render.
//!
//! ## Ownership
//!
//! The rule that a registration needs a primary attendee is NOT checked
//! here. It belongs to `has_primary_attendee`, which the step flow consults
//! when deciding whether attendee details are complete.

use crate::attendee::{
    AttendeeKind, AttendeeRecord, GRAND_OFFICE_OTHER, GRAND_OFFICE_PLACEHOLDER, MasonProfile,
};
use crate::types::{ContactPreference, GrandOfficer};

/// Message reported when the terms have not been accepted.
pub const TERMS_NOT_ACCEPTED: &str = "You must agree to the terms and conditions.";

/// Returns whether `value` looks like `local@domain.tld`.
///
/// The local part and domain must be free of whitespace and `@`, and the
/// domain must contain a dot with text on both sides.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    let value: &str = value.trim();
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    let clean = |part: &str| !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '@');
    if !clean(local) || !clean(domain) {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Returns every attendee-detail violation as a readable message.
///
/// # Arguments
///
/// * `attendees` - The attendees of the registration, in display order
/// * `agree_to_terms` - Whether the terms have been accepted
///
/// # Returns
///
/// All per-attendee messages in attendee order, followed by a single terms
/// message when `agree_to_terms` is false. An empty list means the details
/// may be submitted.
#[must_use]
pub fn attendee_detail_errors(attendees: &[AttendeeRecord], agree_to_terms: bool) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    for (index, attendee) in attendees.iter().enumerate() {
        let descriptor: String = describe_attendee(attendees, index);
        let mut report = |message: &str| errors.push(format!("{descriptor}: {message}"));

        require(&attendee.person.title, "Title is required.", &mut report);
        require(&attendee.person.first_name, "First name is required.", &mut report);
        require(&attendee.person.last_name, "Last name is required.", &mut report);

        match &attendee.kind {
            AttendeeKind::Mason(profile) => {
                check_mason_profile(profile, &mut report);
                if attendee.is_primary {
                    check_direct_contact(attendee, &mut report);
                } else {
                    check_contact_preference(attendee, &mut report);
                }
            }
            AttendeeKind::LadyPartner(link) | AttendeeKind::GuestPartner(link) => {
                require(&link.relationship, "Relationship is required.", &mut report);
                check_contact_preference(attendee, &mut report);
            }
            AttendeeKind::Guest => check_contact_preference(attendee, &mut report),
            AttendeeKind::LodgeContact | AttendeeKind::DelegationContact => {
                if attendee.is_primary {
                    check_direct_contact(attendee, &mut report);
                }
            }
            AttendeeKind::DelegationMember | AttendeeKind::Individual => {}
        }
    }

    if !agree_to_terms {
        errors.push(String::from(TERMS_NOT_ACCEPTED));
    }

    errors
}

/// Builds the label used to prefix an attendee's messages.
///
/// Named attendees are described by role and name. Unnamed partners are
/// described by whom they accompany; other unnamed attendees by role and
/// position among attendees of the same type.
fn describe_attendee(attendees: &[AttendeeRecord], index: usize) -> String {
    let attendee: &AttendeeRecord = &attendees[index];
    let label: &str = attendee.attendee_type().label();

    let name: String = attendee.full_name();
    if !name.is_empty() {
        return format!("{label} {name}");
    }

    if let Some(related_id) = attendee.related_attendee_id() {
        let related_name: String = attendees
            .iter()
            .find(|a| &a.attendee_id == related_id)
            .map(AttendeeRecord::full_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| String::from("attendee"));
        return format!("{label} of {related_name}");
    }

    let ordinal: usize = attendees[..index]
        .iter()
        .filter(|a| a.attendee_type() == attendee.attendee_type())
        .count()
        + 1;
    format!("{label} #{ordinal}")
}

fn require(value: &str, message: &str, report: &mut impl FnMut(&str)) {
    if value.trim().is_empty() {
        report(message);
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn check_mason_profile(profile: &MasonProfile, report: &mut impl FnMut(&str)) {
    if is_blank(profile.rank.as_ref()) {
        report("Rank is required.");
        return;
    }

    if !profile.is_grand_lodge() {
        return;
    }

    let current_officer: bool = profile.grand_officer == Some(GrandOfficer::Current);
    let office: Option<&str> = profile
        .grand_office
        .as_deref()
        .map(str::trim)
        .filter(|o| !o.is_empty() && *o != GRAND_OFFICE_PLACEHOLDER);

    let has_grand_rank: bool = !is_blank(profile.grand_rank.as_ref());
    let has_specific_office: bool = current_officer && office.is_some();
    if !has_grand_rank && !has_specific_office {
        report(
            "Grand Rank or a specific Grand Office (for a current Grand Officer) is required for Grand Lodge rank.",
        );
    }

    if current_officer
        && office == Some(GRAND_OFFICE_OTHER)
        && is_blank(profile.grand_office_other.as_ref())
    {
        report("Please specify the Grand Office when 'Other' is selected.");
    }
}

fn check_direct_contact(attendee: &AttendeeRecord, report: &mut impl FnMut(&str)) {
    if is_blank(attendee.contact.primary_phone.as_ref()) {
        report("Phone number is required.");
    }
    match attendee.contact.primary_email.as_deref().map(str::trim) {
        None | Some("") => report("Email address is required."),
        Some(email) if !is_valid_email(email) => report("Email address format is invalid."),
        Some(_) => {}
    }
}

fn check_contact_preference(attendee: &AttendeeRecord, report: &mut impl FnMut(&str)) {
    match attendee.contact.contact_preference {
        None => report("Contact preference is required."),
        Some(ContactPreference::Directly) => check_direct_contact(attendee, report),
        Some(ContactPreference::PrimaryAttendee | ContactPreference::ProvideLater) => {
            if !attendee.contact.contact_confirmed {
                report("Please confirm the contact arrangement.");
            }
        }
    }
}
