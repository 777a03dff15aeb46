// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use proclamation_domain::{AttendeeId, AttendeeRecord, BillingDetails, RegistrationType};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::error::PersistenceError;

/// A scheduled event in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ends_at: Option<OffsetDateTime>,
    pub is_published: bool,
}

/// An individually purchasable admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDefinition {
    pub ticket_definition_id: String,
    /// The event admitted to. `None` for passes not tied to one event.
    pub event_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub is_active: bool,
}

/// A bundle of ticket definitions sold as one selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub package_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub included_ticket_ids: Vec<String>,
    pub is_active: bool,
}

/// What one ticket row pays for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PurchasedItem {
    Package(String),
    TicketDefinition(String),
}

/// One priced ticket held by an attendee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketPurchase {
    pub attendee_id: AttendeeId,
    pub item: PurchasedItem,
    pub price_cents: i64,
}

/// A paid registration ready to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRegistration {
    pub draft_id: String,
    pub registration_type: RegistrationType,
    pub attendees: Vec<AttendeeRecord>,
    pub billing_details: Option<BillingDetails>,
    pub tickets: Vec<TicketPurchase>,
    pub total_amount_cents: i64,
    pub payment_reference: String,
}

/// A recorded registration with its attendees and tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRegistration {
    pub registration_id: i64,
    pub draft_id: String,
    pub registration_type: RegistrationType,
    pub billing_details: Option<BillingDetails>,
    pub total_amount_cents: i64,
    pub payment_reference: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// In the order they were registered.
    pub attendees: Vec<AttendeeRecord>,
    pub tickets: Vec<TicketPurchase>,
}

/// Formats a timestamp for a text column, normalized to UTC.
pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.to_offset(UtcOffset::UTC).format(&Rfc3339)?)
}

/// Parses a text column written by `format_timestamp`.
pub(crate) fn parse_timestamp(column: &str, value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|_| PersistenceError::InvalidStoredValue {
        column: column.to_string(),
        value: value.to_string(),
    })
}
