// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The attendee record model.
//!
//! An attendee is a shared base (identity, personal and contact details,
//! ticket selection) plus a variant payload selected by `AttendeeKind`.
//! Partner variants carry the id of the attendee they accompany, so a
//! partner without a related attendee cannot be represented.
//!
//! On the wire an attendee is a flat record tagged by `attendeeType`:
//!
//! ```text
//! { "attendeeId": "...", "attendeeType": "lady_partner", "isPrimary": false,
//!   "title": "Mrs", "firstName": "...", "lastName": "...",
//!   "relatedAttendeeId": "...", "relationship": "Wife",
//!   "ticket": { "ticketDefinitionId": null, "selectedEvents": [] } }
//! ```

use crate::error::DomainError;
use crate::selection::{SelectionChange, SelectionRecord};
use crate::types::{AttendeeType, ContactPreference, GrandOfficer};
use serde::{Deserialize, Serialize};

/// The rank value identifying a Grand Lodge Mason.
pub const GRAND_LODGE_RANK: &str = "GL";

/// The unselected placeholder offered by the Grand Office picker.
pub const GRAND_OFFICE_PLACEHOLDER: &str = "Please Select";

/// The Grand Office value that requires a free-text description.
pub const GRAND_OFFICE_OTHER: &str = "Other";

/// Opaque identifier of an attendee within a registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendeeId(String);

impl AttendeeId {
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

impl std::fmt::Display for AttendeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name and personal requirements.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub dietary_requirements: Option<String>,
    #[serde(default)]
    pub special_needs: Option<String>,
}

/// Contact details and delegation of contact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default)]
    pub primary_email: Option<String>,
    #[serde(default)]
    pub primary_phone: Option<String>,
    #[serde(default)]
    pub contact_preference: Option<ContactPreference>,
    #[serde(default)]
    pub contact_confirmed: bool,
}

/// Masonic profile carried only by Mason attendees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasonProfile {
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(default)]
    pub grand_rank: Option<String>,
    #[serde(default)]
    pub grand_officer: Option<GrandOfficer>,
    #[serde(default)]
    pub grand_office: Option<String>,
    #[serde(default)]
    pub grand_office_other: Option<String>,
    #[serde(default)]
    pub lodge_id: Option<String>,
    #[serde(default)]
    pub lodge_name_number: Option<String>,
}

impl MasonProfile {
    /// Returns whether the rank marks a Grand Lodge Mason.
    #[must_use]
    pub fn is_grand_lodge(&self) -> bool {
        self.rank.as_deref() == Some(GRAND_LODGE_RANK)
    }
}

/// Link from a partner to the attendee they accompany.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerLink {
    pub related_attendee_id: AttendeeId,
    #[serde(default)]
    pub relationship: String,
}

impl PartnerLink {
    /// Creates a link with an empty relationship description.
    #[must_use]
    pub const fn new(related_attendee_id: AttendeeId) -> Self {
        Self {
            related_attendee_id,
            relationship: String::new(),
        }
    }
}

/// Variant payload of an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attendeeType", rename_all = "snake_case")]
pub enum AttendeeKind {
    Mason(MasonProfile),
    LadyPartner(PartnerLink),
    Guest,
    GuestPartner(PartnerLink),
    LodgeContact,
    DelegationContact,
    DelegationMember,
    Individual,
}

impl AttendeeKind {
    /// Builds the default payload for an attendee type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingRelatedAttendee` when a partner type is
    /// requested without the attendee it accompanies.
    pub fn for_type(
        attendee_type: AttendeeType,
        related_attendee_id: Option<AttendeeId>,
    ) -> Result<Self, DomainError> {
        let partner_link = |related: Option<AttendeeId>| {
            related
                .map(PartnerLink::new)
                .ok_or(DomainError::MissingRelatedAttendee { attendee_type })
        };

        Ok(match attendee_type {
            AttendeeType::Mason => Self::Mason(MasonProfile::default()),
            AttendeeType::LadyPartner => Self::LadyPartner(partner_link(related_attendee_id)?),
            AttendeeType::Guest => Self::Guest,
            AttendeeType::GuestPartner => Self::GuestPartner(partner_link(related_attendee_id)?),
            AttendeeType::LodgeContact => Self::LodgeContact,
            AttendeeType::DelegationContact => Self::DelegationContact,
            AttendeeType::DelegationMember => Self::DelegationMember,
            AttendeeType::Individual => Self::Individual,
        })
    }

    /// Returns the discriminant of this payload.
    #[must_use]
    pub const fn attendee_type(&self) -> AttendeeType {
        match self {
            Self::Mason(_) => AttendeeType::Mason,
            Self::LadyPartner(_) => AttendeeType::LadyPartner,
            Self::Guest => AttendeeType::Guest,
            Self::GuestPartner(_) => AttendeeType::GuestPartner,
            Self::LodgeContact => AttendeeType::LodgeContact,
            Self::DelegationContact => AttendeeType::DelegationContact,
            Self::DelegationMember => AttendeeType::DelegationMember,
            Self::Individual => AttendeeType::Individual,
        }
    }

    /// Returns the partner link for partner variants.
    #[must_use]
    pub const fn partner_link(&self) -> Option<&PartnerLink> {
        match self {
            Self::LadyPartner(link) | Self::GuestPartner(link) => Some(link),
            _ => None,
        }
    }

    const fn partner_link_mut(&mut self) -> Option<&mut PartnerLink> {
        match self {
            Self::LadyPartner(link) | Self::GuestPartner(link) => Some(link),
            _ => None,
        }
    }

    /// Returns the Masonic profile for Mason attendees.
    #[must_use]
    pub const fn mason_profile(&self) -> Option<&MasonProfile> {
        match self {
            Self::Mason(profile) => Some(profile),
            _ => None,
        }
    }
}

/// Input for creating an attendee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendee {
    pub attendee_type: AttendeeType,
    pub is_primary: bool,
    /// Required for partner types, ignored otherwise.
    pub related_attendee_id: Option<AttendeeId>,
    /// Initial field values.
    pub details: AttendeePatch,
}

impl NewAttendee {
    /// Creates input for a non-primary attendee with no initial details.
    #[must_use]
    pub fn of_type(attendee_type: AttendeeType) -> Self {
        Self {
            attendee_type,
            is_primary: false,
            related_attendee_id: None,
            details: AttendeePatch::default(),
        }
    }

    /// Creates input for a partner accompanying `related`.
    #[must_use]
    pub fn partner_of(attendee_type: AttendeeType, related: AttendeeId) -> Self {
        Self {
            related_attendee_id: Some(related),
            ..Self::of_type(attendee_type)
        }
    }
}

/// Shallow update of an attendee.
///
/// `None` leaves a field untouched. Fields that do not belong to the
/// attendee's variant are ignored. The attendee type cannot be patched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttendeePatch {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
    pub primary_phone: Option<String>,
    pub dietary_requirements: Option<String>,
    pub special_needs: Option<String>,
    pub contact_preference: Option<ContactPreference>,
    pub contact_confirmed: Option<bool>,
    pub relationship: Option<String>,
    pub rank: Option<String>,
    pub grand_rank: Option<String>,
    pub grand_officer: Option<GrandOfficer>,
    pub grand_office: Option<String>,
    pub grand_office_other: Option<String>,
    pub lodge_id: Option<String>,
    pub lodge_name_number: Option<String>,
    pub ticket: Option<SelectionChange>,
}

impl AttendeePatch {
    /// Returns a patch that only changes the ticket selection.
    #[must_use]
    pub fn ticket(change: SelectionChange) -> Self {
        Self {
            ticket: Some(change),
            ..Self::default()
        }
    }
}

/// One participant within a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeRecord {
    pub attendee_id: AttendeeId,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(flatten)]
    pub person: PersonalDetails,
    #[serde(flatten)]
    pub contact: ContactDetails,
    #[serde(default)]
    pub ticket: SelectionRecord,
    #[serde(flatten)]
    pub kind: AttendeeKind,
}

impl AttendeeRecord {
    /// Creates an attendee from creation input.
    ///
    /// Names default to empty strings and the ticket to an empty selection.
    /// Partners start with an empty title and relationship and no contact
    /// preference.
    ///
    /// # Errors
    ///
    /// Returns an error if a partner type is requested without a related
    /// attendee.
    pub fn create(attendee_id: AttendeeId, new: NewAttendee) -> Result<Self, DomainError> {
        let kind: AttendeeKind =
            AttendeeKind::for_type(new.attendee_type, new.related_attendee_id)?;
        let mut record: Self = Self {
            attendee_id,
            is_primary: new.is_primary,
            person: PersonalDetails::default(),
            contact: ContactDetails::default(),
            ticket: SelectionRecord::empty(),
            kind,
        };
        record.apply_patch(new.details);
        Ok(record)
    }

    /// Returns the attendee's type.
    #[must_use]
    pub const fn attendee_type(&self) -> AttendeeType {
        self.kind.attendee_type()
    }

    /// Returns whether this attendee accompanies another attendee.
    #[must_use]
    pub const fn is_partner(&self) -> bool {
        self.kind.partner_link().is_some()
    }

    /// Returns the id of the attendee this partner accompanies.
    #[must_use]
    pub fn related_attendee_id(&self) -> Option<&AttendeeId> {
        self.kind.partner_link().map(|link| &link.related_attendee_id)
    }

    /// Returns the relationship description for partners.
    #[must_use]
    pub fn relationship(&self) -> Option<&str> {
        self.kind.partner_link().map(|link| link.relationship.as_str())
    }

    /// Returns "First Last", trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.person.first_name.trim(), self.person.last_name.trim())
            .trim()
            .to_string()
    }

    /// Returns whether both first and last name are non-blank.
    #[must_use]
    pub fn has_name(&self) -> bool {
        !self.person.first_name.trim().is_empty() && !self.person.last_name.trim().is_empty()
    }

    /// Merges a patch into this record.
    ///
    /// A ticket change goes through `SelectionRecord::apply`, which keeps the
    /// package and individual selections mutually exclusive.
    pub fn apply_patch(&mut self, patch: AttendeePatch) {
        let AttendeePatch {
            title,
            first_name,
            last_name,
            primary_email,
            primary_phone,
            dietary_requirements,
            special_needs,
            contact_preference,
            contact_confirmed,
            relationship,
            rank,
            grand_rank,
            grand_officer,
            grand_office,
            grand_office_other,
            lodge_id,
            lodge_name_number,
            ticket,
        } = patch;

        if let Some(value) = title {
            self.person.title = value;
        }
        if let Some(value) = first_name {
            self.person.first_name = value;
        }
        if let Some(value) = last_name {
            self.person.last_name = value;
        }
        if dietary_requirements.is_some() {
            self.person.dietary_requirements = dietary_requirements;
        }
        if special_needs.is_some() {
            self.person.special_needs = special_needs;
        }
        if primary_email.is_some() {
            self.contact.primary_email = primary_email;
        }
        if primary_phone.is_some() {
            self.contact.primary_phone = primary_phone;
        }
        if contact_preference.is_some() {
            self.contact.contact_preference = contact_preference;
        }
        if let Some(value) = contact_confirmed {
            self.contact.contact_confirmed = value;
        }

        if let (Some(link), Some(value)) = (self.kind.partner_link_mut(), relationship) {
            link.relationship = value;
        }

        if let AttendeeKind::Mason(profile) = &mut self.kind {
            if rank.is_some() {
                profile.rank = rank;
            }
            if grand_rank.is_some() {
                profile.grand_rank = grand_rank;
            }
            if grand_officer.is_some() {
                profile.grand_officer = grand_officer;
            }
            if grand_office.is_some() {
                profile.grand_office = grand_office;
            }
            if grand_office_other.is_some() {
                profile.grand_office_other = grand_office_other;
            }
            if lodge_id.is_some() {
                profile.lodge_id = lodge_id;
            }
            if lodge_name_number.is_some() {
                profile.lodge_name_number = lodge_name_number;
            }
        }

        if let Some(change) = ticket {
            self.ticket = self.ticket.apply(change);
        }
    }
}

/// Returns whether the list holds an attendee able to anchor the
/// registration: a primary attendee of a Mason or contact variant.
///
/// This is the single owner of the "must have a primary attendee" rule; it
/// is consulted by the step flow, not by `attendee_detail_errors`.
#[must_use]
pub fn has_primary_attendee(attendees: &[AttendeeRecord]) -> bool {
    attendees
        .iter()
        .any(|a| a.is_primary && a.attendee_type().is_primary_capable())
}

/// Checks that `related` names an existing non-partner attendee.
///
/// # Errors
///
/// Returns `DomainError::InvalidRelatedAttendee` if the id is unknown or
/// refers to another partner.
pub fn validate_partner_reference(
    attendees: &[AttendeeRecord],
    related: &AttendeeId,
) -> Result<(), DomainError> {
    let target_ok: bool = attendees
        .iter()
        .any(|a| &a.attendee_id == related && !a.is_partner());
    if !target_ok {
        return Err(DomainError::InvalidRelatedAttendee {
            related_attendee_id: related.value().to_string(),
        });
    }
    Ok(())
}

/// Returns the ids of partners whose related attendee is missing or is
/// itself a partner.
#[must_use]
pub fn dangling_partner_references(attendees: &[AttendeeRecord]) -> Vec<AttendeeId> {
    attendees
        .iter()
        .filter_map(|a| {
            let related: &AttendeeId = a.related_attendee_id()?;
            validate_partner_reference(attendees, related)
                .is_err()
                .then(|| a.attendee_id.clone())
        })
        .collect()
}
