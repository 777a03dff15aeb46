// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry enum values as strings; they are parsed into domain
//! types at this boundary so the error names the offending field.

use proclamation::{DraftId, Registration};
use proclamation_domain::{
    AttendeeId, AttendeePatch, AttendeeType, ContactPreference, GrandOfficer, NewAttendee,
    RegistrationType, SelectionChange, Step,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ApiError, translate_domain_error};

/// API request to choose a registration type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRegistrationTypeRequest {
    pub registration_type: String,
}

impl SelectRegistrationTypeRequest {
    /// Parses the requested type.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown type.
    pub fn registration_type(&self) -> Result<RegistrationType, ApiError> {
        RegistrationType::from_str(&self.registration_type).map_err(translate_domain_error)
    }
}

/// API request answering a recovery prompt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolveRecoveryRequest {
    /// `continue`, `edit_attendees` or `start_new`.
    pub choice: String,
}

/// A ticket choice as sent by the client, in the same shape the attendee
/// record carries.
///
/// Setting `ticketDefinitionId` (even to `null`) selects that package and
/// drops any events. Setting `selectedEvents` selects individual tickets
/// and drops the package. Both populated at once is refused.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(clippy::option_option)] // absent and null differ
pub struct TicketSelectionRequest {
    #[serde(default, deserialize_with = "present")]
    pub ticket_definition_id: Option<Option<String>>,
    #[serde(default)]
    pub selected_events: Option<Vec<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TicketSelectionRequest {
    /// Converts the request into the single selection change it describes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when both a package and events are given, or
    /// when neither field is present.
    pub fn into_change(self) -> Result<SelectionChange, ApiError> {
        match (self.ticket_definition_id, self.selected_events) {
            (Some(Some(_)), Some(events)) if !events.is_empty() => {
                Err(ApiError::InvalidInput {
                    field: String::from("ticket"),
                    message: String::from("Select a package or individual tickets, not both"),
                })
            }
            (Some(None), Some(events)) if !events.is_empty() => {
                Ok(SelectionChange::Events(events))
            }
            (Some(package), _) => Ok(SelectionChange::Package(package)),
            (None, Some(events)) => Ok(SelectionChange::Events(events)),
            (None, None) => Err(ApiError::InvalidInput {
                field: String::from("ticket"),
                message: String::from("Expected ticketDefinitionId or selectedEvents"),
            }),
        }
    }
}

/// Attendee fields as sent by the client. Missing fields are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttendeeFieldsRequest {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
    pub primary_phone: Option<String>,
    pub dietary_requirements: Option<String>,
    pub special_needs: Option<String>,
    pub contact_preference: Option<String>,
    pub contact_confirmed: Option<bool>,
    pub relationship: Option<String>,
    pub rank: Option<String>,
    pub grand_rank: Option<String>,
    pub grand_officer: Option<String>,
    pub grand_office: Option<String>,
    pub grand_office_other: Option<String>,
    pub lodge_id: Option<String>,
    pub lodge_name_number: Option<String>,
    pub ticket: Option<TicketSelectionRequest>,
}

impl AttendeeFieldsRequest {
    /// Converts the request into a domain patch.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown contact preference, grand
    /// officer status or a malformed ticket selection.
    pub fn into_patch(self) -> Result<AttendeePatch, ApiError> {
        let contact_preference: Option<ContactPreference> = self
            .contact_preference
            .as_deref()
            .map(ContactPreference::from_str)
            .transpose()
            .map_err(translate_domain_error)?;
        let grand_officer: Option<GrandOfficer> = self
            .grand_officer
            .as_deref()
            .map(GrandOfficer::from_str)
            .transpose()
            .map_err(translate_domain_error)?;

        Ok(AttendeePatch {
            title: self.title,
            first_name: self.first_name,
            last_name: self.last_name,
            primary_email: self.primary_email,
            primary_phone: self.primary_phone,
            dietary_requirements: self.dietary_requirements,
            special_needs: self.special_needs,
            contact_preference,
            contact_confirmed: self.contact_confirmed,
            relationship: self.relationship,
            rank: self.rank,
            grand_rank: self.grand_rank,
            grand_officer,
            grand_office: self.grand_office,
            grand_office_other: self.grand_office_other,
            lodge_id: self.lodge_id,
            lodge_name_number: self.lodge_name_number,
            ticket: self
                .ticket
                .map(TicketSelectionRequest::into_change)
                .transpose()?,
        })
    }
}

/// API request to add an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttendeeRequest {
    pub attendee_type: String,
    #[serde(default)]
    pub is_primary: bool,
    /// Required for partner types.
    #[serde(default)]
    pub related_attendee_id: Option<String>,
    #[serde(flatten)]
    pub fields: AttendeeFieldsRequest,
}

impl AddAttendeeRequest {
    /// Converts the request into domain creation input.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown attendee type or enum field.
    pub fn into_new_attendee(self) -> Result<NewAttendee, ApiError> {
        let attendee_type: AttendeeType =
            AttendeeType::from_str(&self.attendee_type).map_err(translate_domain_error)?;
        Ok(NewAttendee {
            attendee_type,
            is_primary: self.is_primary,
            related_attendee_id: self.related_attendee_id.map(AttendeeId::new),
            details: self.fields.into_patch()?,
        })
    }
}

/// API request to set billing details.
pub type UpdateBillingRequest = proclamation_domain::BillingDetails;

/// API request to set the terms flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SetAgreeToTermsRequest {
    pub agree: bool,
}

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Prev,
    GoTo(u8),
}

/// API request to pay for the registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPaymentRequest {
    /// Token produced by the payment provider's card widget.
    pub payment_token: String,
}

/// API request to fabricate a bypass reservation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBypassReservationRequest {
    pub ticket_ids: Vec<String>,
}

/// Paging for catalog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListEventsRequest {
    pub limit: u32,
    pub offset: u32,
}

impl Default for ListEventsRequest {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// The registration as the UI renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    pub registration: Registration,
    pub current_step: Step,
    pub step_slug: String,
    /// The step the UI should show. Step 1 until a registration type is set.
    pub render_step: Step,
    /// Problems blocking the current step.
    pub errors: Vec<String>,
    pub completed_steps: Vec<Step>,
    pub available_steps: Vec<Step>,
    /// Whether a saved draft is waiting for a recovery decision.
    pub recovery_pending: bool,
}

/// API response for a successful attendee addition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAttendeeResponse {
    pub attendee_id: AttendeeId,
    pub view: RegistrationView,
}

/// API response for a removal, listing every attendee removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveAttendeeResponse {
    pub removed_attendee_ids: Vec<AttendeeId>,
    pub view: RegistrationView,
}

/// API response for a step change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepChangeResponse {
    pub from: Step,
    pub to: Step,
    pub scroll_to_top: bool,
    pub view: RegistrationView,
}

/// Whether an order item is a package or an individual ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemKind {
    Package,
    Ticket,
}

/// One priced item on an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub kind: OrderItemKind,
    pub id: String,
    pub name: String,
    pub price_cents: i64,
}

/// The cost of one attendee's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub attendee_id: AttendeeId,
    pub attendee_type: AttendeeType,
    pub attendee_name: String,
    pub items: Vec<OrderItem>,
    pub subtotal_cents: i64,
}

/// What the registration costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    pub total_cents: i64,
    pub currency: String,
}

/// API response for an approved payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub registration_id: i64,
    pub draft_id: DraftId,
    pub payment_reference: String,
    pub total_cents: i64,
    pub currency: String,
}

/// API response describing the bypass reservation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassReservationResponse {
    pub reservation: Option<proclamation::BypassReservation>,
    pub redirect_on_expiry: bool,
}
