// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use proclamation_domain::{AttendeeId, AttendeeRecord, BillingDetails, RegistrationType};
use tracing::debug;

use crate::data_models::{PurchasedItem, StoredRegistration, TicketPurchase, parse_timestamp};
use crate::diesel_schema::{registration_attendees, registrations, tickets};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = registrations)]
struct RegistrationRow {
    registration_id: i64,
    draft_id: String,
    registration_type: String,
    billing_json: Option<String>,
    total_amount_cents: i64,
    payment_reference: String,
    created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = tickets)]
struct TicketRow {
    attendee_id: String,
    package_id: Option<String>,
    ticket_definition_id: Option<String>,
    price_cents: i64,
}

impl TryFrom<TicketRow> for TicketPurchase {
    type Error = PersistenceError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let item: PurchasedItem = match (row.package_id, row.ticket_definition_id) {
            (Some(package_id), None) => PurchasedItem::Package(package_id),
            (None, Some(ticket_definition_id)) => {
                PurchasedItem::TicketDefinition(ticket_definition_id)
            }
            (package_id, ticket_definition_id) => {
                return Err(PersistenceError::InvalidStoredValue {
                    column: String::from("tickets.package_id/ticket_definition_id"),
                    value: format!("{package_id:?}/{ticket_definition_id:?}"),
                });
            }
        };
        Ok(Self {
            attendee_id: AttendeeId::new(row.attendee_id),
            item,
            price_cents: row.price_cents,
        })
    }
}

/// Returns the id of the registration recorded for a draft, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_registration_for_draft(
    conn: &mut SqliteConnection,
    draft_id: &str,
) -> Result<Option<i64>, PersistenceError> {
    Ok(registrations::table
        .filter(registrations::draft_id.eq(draft_id))
        .select(registrations::registration_id)
        .first::<i64>(conn)
        .optional()?)
}

/// Loads a registration with its attendees and tickets.
///
/// # Errors
///
/// Returns `RegistrationNotFound` if no such registration exists, or an
/// error if a stored payload cannot be decoded.
pub fn get_registration_with_attendees(
    conn: &mut SqliteConnection,
    registration_id: i64,
) -> Result<StoredRegistration, PersistenceError> {
    debug!(registration_id, "Loading registration");

    let row: RegistrationRow = registrations::table
        .find(registration_id)
        .select(RegistrationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::RegistrationNotFound(registration_id))?;

    let attendee_payloads: Vec<(String, String)> = registration_attendees::table
        .inner_join(registrations::table)
        .filter(registrations::registration_id.eq(registration_id))
        .order(registration_attendees::position.asc())
        .select((
            registration_attendees::attendee_id,
            registration_attendees::record_json,
        ))
        .load(conn)?;

    let attendees: Vec<AttendeeRecord> = attendee_payloads
        .into_iter()
        .map(|(attendee_id, payload)| {
            serde_json::from_str(&payload).map_err(|e| {
                PersistenceError::SerializationError(format!("attendee {attendee_id}: {e}"))
            })
        })
        .collect::<Result<_, _>>()?;

    let tickets: Vec<TicketPurchase> = tickets::table
        .filter(tickets::registration_id.eq(registration_id))
        .order(tickets::ticket_id.asc())
        .select(TicketRow::as_select())
        .load(conn)?
        .into_iter()
        .map(TicketPurchase::try_from)
        .collect::<Result<_, _>>()?;

    let registration_type: RegistrationType =
        row.registration_type
            .parse()
            .map_err(|_| PersistenceError::InvalidStoredValue {
                column: String::from("registrations.registration_type"),
                value: row.registration_type.clone(),
            })?;
    let billing_details: Option<BillingDetails> = row
        .billing_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    Ok(StoredRegistration {
        registration_id: row.registration_id,
        created_at: parse_timestamp("registrations.created_at", &row.created_at)?,
        draft_id: row.draft_id,
        registration_type,
        billing_details,
        total_amount_cents: row.total_amount_cents,
        payment_reference: row.payment_reference,
        attendees,
        tickets,
    })
}
