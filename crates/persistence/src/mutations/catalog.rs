// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::data_models::{Event, Package, TicketDefinition, format_timestamp};
use crate::diesel_schema::{events, packages, ticket_definitions};
use crate::error::PersistenceError;

/// Inserts a catalog event.
///
/// # Errors
///
/// Returns an error if the id or slug is already taken.
pub fn insert_event(conn: &mut SqliteConnection, event: &Event) -> Result<(), PersistenceError> {
    let starts_at: String = format_timestamp(event.starts_at)?;
    let ends_at: Option<String> = event.ends_at.map(format_timestamp).transpose()?;

    diesel::insert_into(events::table)
        .values((
            events::event_id.eq(&event.event_id),
            events::slug.eq(&event.slug),
            events::title.eq(&event.title),
            events::description.eq(event.description.as_deref()),
            events::location.eq(event.location.as_deref()),
            events::starts_at.eq(&starts_at),
            events::ends_at.eq(ends_at.as_deref()),
            events::is_published.eq(i32::from(event.is_published)),
        ))
        .execute(conn)?;

    info!(event_id = %event.event_id, "Inserted event");
    Ok(())
}

/// Inserts a ticket definition.
///
/// # Errors
///
/// Returns an error if the id is taken or the referenced event is missing.
pub fn insert_ticket_definition(
    conn: &mut SqliteConnection,
    ticket: &TicketDefinition,
) -> Result<(), PersistenceError> {
    diesel::insert_into(ticket_definitions::table)
        .values((
            ticket_definitions::ticket_definition_id.eq(&ticket.ticket_definition_id),
            ticket_definitions::event_id.eq(ticket.event_id.as_deref()),
            ticket_definitions::name.eq(&ticket.name),
            ticket_definitions::description.eq(ticket.description.as_deref()),
            ticket_definitions::price_cents.eq(ticket.price_cents),
            ticket_definitions::is_active.eq(i32::from(ticket.is_active)),
        ))
        .execute(conn)?;

    info!(ticket_definition_id = %ticket.ticket_definition_id, "Inserted ticket definition");
    Ok(())
}

/// Inserts a package.
///
/// # Errors
///
/// Returns an error if the id is taken.
pub fn insert_package(conn: &mut SqliteConnection, package: &Package) -> Result<(), PersistenceError> {
    let included_ticket_ids: String = serde_json::to_string(&package.included_ticket_ids)?;

    diesel::insert_into(packages::table)
        .values((
            packages::package_id.eq(&package.package_id),
            packages::name.eq(&package.name),
            packages::description.eq(package.description.as_deref()),
            packages::price_cents.eq(package.price_cents),
            packages::included_ticket_ids.eq(&included_ticket_ids),
            packages::is_active.eq(i32::from(package.is_active)),
        ))
        .execute(conn)?;

    info!(package_id = %package.package_id, "Inserted package");
    Ok(())
}
