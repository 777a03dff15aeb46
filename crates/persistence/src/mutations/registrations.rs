// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use proclamation_domain::AttendeeId;
use time::OffsetDateTime;
use tracing::info;

use crate::data_models::{CompletedRegistration, PurchasedItem, format_timestamp};
use crate::diesel_schema::{registration_attendees, registrations, tickets};
use crate::error::PersistenceError;
use crate::queries::registrations::find_registration_for_draft;

/// Records a paid registration with its attendees and tickets.
///
/// Runs in one transaction: either every row is written or none is.
///
/// # Returns
///
/// The new registration id.
///
/// # Errors
///
/// Returns `DuplicateRegistration` if the draft was already recorded, or a
/// database error if a ticket references an unknown attendee, package or
/// ticket definition.
pub fn persist_registration(
    conn: &mut SqliteConnection,
    registration: &CompletedRegistration,
) -> Result<i64, PersistenceError> {
    conn.transaction::<i64, PersistenceError, _>(|conn| {
        if find_registration_for_draft(conn, &registration.draft_id)?.is_some() {
            return Err(PersistenceError::DuplicateRegistration(
                registration.draft_id.clone(),
            ));
        }

        let billing_json: Option<String> = registration
            .billing_details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let created_at: String = format_timestamp(OffsetDateTime::now_utc())?;

        let registration_id: i64 = diesel::insert_into(registrations::table)
            .values((
                registrations::draft_id.eq(&registration.draft_id),
                registrations::registration_type.eq(registration.registration_type.as_str()),
                registrations::billing_json.eq(billing_json.as_deref()),
                registrations::total_amount_cents.eq(registration.total_amount_cents),
                registrations::payment_reference.eq(&registration.payment_reference),
                registrations::created_at.eq(&created_at),
            ))
            .returning(registrations::registration_id)
            .get_result(conn)?;

        for (position, attendee) in registration.attendees.iter().enumerate() {
            let position: i32 = i32::try_from(position).map_err(|_| {
                PersistenceError::QueryFailed(String::from("too many attendees"))
            })?;
            let record_json: String = serde_json::to_string(attendee)?;

            diesel::insert_into(registration_attendees::table)
                .values((
                    registration_attendees::registration_id.eq(registration_id),
                    registration_attendees::attendee_id.eq(attendee.attendee_id.value()),
                    registration_attendees::attendee_type.eq(attendee.attendee_type().as_str()),
                    registration_attendees::is_primary.eq(i32::from(attendee.is_primary)),
                    registration_attendees::first_name.eq(&attendee.person.first_name),
                    registration_attendees::last_name.eq(&attendee.person.last_name),
                    registration_attendees::related_attendee_id
                        .eq(attendee.related_attendee_id().map(AttendeeId::value)),
                    registration_attendees::position.eq(position),
                    registration_attendees::record_json.eq(&record_json),
                ))
                .execute(conn)?;
        }

        for ticket in &registration.tickets {
            let (package_id, ticket_definition_id): (Option<&str>, Option<&str>) =
                match &ticket.item {
                    PurchasedItem::Package(id) => (Some(id.as_str()), None),
                    PurchasedItem::TicketDefinition(id) => (None, Some(id.as_str())),
                };

            diesel::insert_into(tickets::table)
                .values((
                    tickets::registration_id.eq(registration_id),
                    tickets::attendee_id.eq(ticket.attendee_id.value()),
                    tickets::package_id.eq(package_id),
                    tickets::ticket_definition_id.eq(ticket_definition_id),
                    tickets::price_cents.eq(ticket.price_cents),
                ))
                .execute(conn)?;
        }

        info!(
            registration_id,
            draft_id = %registration.draft_id,
            attendees = registration.attendees.len(),
            tickets = registration.tickets.len(),
            "Recorded registration"
        );
        Ok(registration_id)
    })
}
