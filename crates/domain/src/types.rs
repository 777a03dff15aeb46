// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kind of registration being made.
///
/// Only `Individual` has a complete attendee flow. `Lodge` and `Delegation`
/// are accepted so drafts can be created and resumed, but they share the
/// individual validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationType {
    /// A single Mason registering themselves and their guests.
    Individual,
    /// A lodge registering on behalf of its members.
    Lodge,
    /// An official delegation.
    Delegation,
}

impl RegistrationType {
    /// All registration types in display order.
    pub const ALL: [Self; 3] = [Self::Individual, Self::Lodge, Self::Delegation];

    /// Converts this registration type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Lodge => "lodge",
            Self::Delegation => "delegation",
        }
    }

    /// Returns the attendee type created for the primary attendee.
    #[must_use]
    pub const fn primary_attendee_type(&self) -> AttendeeType {
        match self {
            Self::Individual => AttendeeType::Mason,
            Self::Lodge => AttendeeType::LodgeContact,
            Self::Delegation => AttendeeType::DelegationContact,
        }
    }
}

impl FromStr for RegistrationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "lodge" => Ok(Self::Lodge),
            "delegation" => Ok(Self::Delegation),
            _ => Err(DomainError::InvalidRegistrationType(s.to_string())),
        }
    }
}

impl std::fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The closed set of attendee variants.
///
/// This is the discriminant of `AttendeeKind`; it carries no payload and is
/// used wherever only the type name matters (creation requests, labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendeeType {
    Mason,
    LadyPartner,
    Guest,
    GuestPartner,
    LodgeContact,
    DelegationContact,
    DelegationMember,
    Individual,
}

impl AttendeeType {
    /// Converts this attendee type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mason => "mason",
            Self::LadyPartner => "lady_partner",
            Self::Guest => "guest",
            Self::GuestPartner => "guest_partner",
            Self::LodgeContact => "lodge_contact",
            Self::DelegationContact => "delegation_contact",
            Self::DelegationMember => "delegation_member",
            Self::Individual => "individual",
        }
    }

    /// Human-readable role label used in validation messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Mason => "Mason",
            Self::LadyPartner => "Lady & Partner",
            Self::Guest => "Guest",
            Self::GuestPartner => "Guest Partner",
            Self::LodgeContact => "Lodge Contact",
            Self::DelegationContact => "Delegation Contact",
            Self::DelegationMember => "Delegation Member",
            Self::Individual => "Attendee",
        }
    }

    /// Returns whether this variant accompanies another attendee.
    #[must_use]
    pub const fn is_partner(&self) -> bool {
        matches!(self, Self::LadyPartner | Self::GuestPartner)
    }

    /// Returns whether this variant may anchor a registration as its
    /// primary attendee.
    #[must_use]
    pub const fn is_primary_capable(&self) -> bool {
        matches!(
            self,
            Self::Mason | Self::LodgeContact | Self::DelegationContact
        )
    }
}

impl FromStr for AttendeeType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mason" => Ok(Self::Mason),
            "lady_partner" => Ok(Self::LadyPartner),
            "guest" => Ok(Self::Guest),
            "guest_partner" => Ok(Self::GuestPartner),
            "lodge_contact" => Ok(Self::LodgeContact),
            "delegation_contact" => Ok(Self::DelegationContact),
            "delegation_member" => Ok(Self::DelegationMember),
            "individual" => Ok(Self::Individual),
            _ => Err(DomainError::InvalidAttendeeType(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttendeeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a non-primary attendee wishes to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactPreference {
    /// Contact the attendee using their own phone and email.
    Directly,
    /// Route all contact through the primary attendee.
    PrimaryAttendee,
    /// Contact details will be supplied later.
    ProvideLater,
}

impl ContactPreference {
    /// Converts this preference to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Directly => "Directly",
            Self::PrimaryAttendee => "PrimaryAttendee",
            Self::ProvideLater => "ProvideLater",
        }
    }
}

impl FromStr for ContactPreference {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Directly" => Ok(Self::Directly),
            "PrimaryAttendee" => Ok(Self::PrimaryAttendee),
            "ProvideLater" => Ok(Self::ProvideLater),
            _ => Err(DomainError::InvalidContactPreference(s.to_string())),
        }
    }
}

impl std::fmt::Display for ContactPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a Grand Lodge Mason holds office now or held it previously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrandOfficer {
    Current,
    Past,
}

impl GrandOfficer {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::Past => "Past",
        }
    }
}

impl FromStr for GrandOfficer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Current" => Ok(Self::Current),
            "Past" => Ok(Self::Past),
            _ => Err(DomainError::InvalidGrandOfficer(s.to_string())),
        }
    }
}

impl std::fmt::Display for GrandOfficer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The six ordered steps of the registration flow.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    #[default]
    RegistrationType,
    AttendeeDetails,
    TicketSelection,
    OrderSummary,
    Payment,
    Confirmation,
}

impl Step {
    /// All steps in flow order.
    pub const ALL: [Self; 6] = [
        Self::RegistrationType,
        Self::AttendeeDetails,
        Self::TicketSelection,
        Self::OrderSummary,
        Self::Payment,
        Self::Confirmation,
    ];

    /// The first step of the flow.
    pub const FIRST: Self = Self::RegistrationType;

    /// The last step of the flow.
    pub const LAST: Self = Self::Confirmation;

    /// Returns the 1-based step number.
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::RegistrationType => 1,
            Self::AttendeeDetails => 2,
            Self::TicketSelection => 3,
            Self::OrderSummary => 4,
            Self::Payment => 5,
            Self::Confirmation => 6,
        }
    }

    /// Returns the step for a 1-based number, if it is in range.
    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::RegistrationType),
            2 => Some(Self::AttendeeDetails),
            3 => Some(Self::TicketSelection),
            4 => Some(Self::OrderSummary),
            5 => Some(Self::Payment),
            6 => Some(Self::Confirmation),
            _ => None,
        }
    }

    /// Returns the step for any number, clamped into `[1, 6]`.
    #[must_use]
    pub const fn clamped(number: i32) -> Self {
        match number {
            i32::MIN..=1 => Self::RegistrationType,
            2 => Self::AttendeeDetails,
            3 => Self::TicketSelection,
            4 => Self::OrderSummary,
            5 => Self::Payment,
            _ => Self::Confirmation,
        }
    }

    /// The following step, saturating at the last step.
    #[must_use]
    pub const fn next(&self) -> Self {
        match self {
            Self::RegistrationType => Self::AttendeeDetails,
            Self::AttendeeDetails => Self::TicketSelection,
            Self::TicketSelection => Self::OrderSummary,
            Self::OrderSummary => Self::Payment,
            Self::Payment | Self::Confirmation => Self::Confirmation,
        }
    }

    /// The preceding step, saturating at the first step.
    #[must_use]
    pub const fn prev(&self) -> Self {
        match self {
            Self::RegistrationType | Self::AttendeeDetails => Self::RegistrationType,
            Self::TicketSelection => Self::AttendeeDetails,
            Self::OrderSummary => Self::TicketSelection,
            Self::Payment => Self::OrderSummary,
            Self::Confirmation => Self::Payment,
        }
    }

    /// URL slug for this step.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::RegistrationType => "registration-type",
            Self::AttendeeDetails => "attendee-details",
            Self::TicketSelection => "ticket-selection",
            Self::OrderSummary => "order-summary",
            Self::Payment => "payment",
            Self::Confirmation => "confirmation",
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or(DomainError::InvalidStep(value))
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.number(), self.slug())
    }
}
