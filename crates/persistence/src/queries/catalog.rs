// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog queries.
//!
//! Only published events and active ticket definitions or packages are
//! listed. Lookups by id return inactive rows too, so an order placed
//! against a since-retired ticket can still be priced.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{Event, Package, TicketDefinition, parse_timestamp};
use crate::diesel_schema::{events, packages, ticket_definitions};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = events)]
struct EventRow {
    event_id: String,
    slug: String,
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: String,
    ends_at: Option<String>,
    is_published: i32,
}

impl TryFrom<EventRow> for Event {
    type Error = PersistenceError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        Ok(Self {
            starts_at: parse_timestamp("events.starts_at", &row.starts_at)?,
            ends_at: row
                .ends_at
                .as_deref()
                .map(|value| parse_timestamp("events.ends_at", value))
                .transpose()?,
            event_id: row.event_id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            location: row.location,
            is_published: row.is_published != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = ticket_definitions)]
struct TicketDefinitionRow {
    ticket_definition_id: String,
    event_id: Option<String>,
    name: String,
    description: Option<String>,
    price_cents: i64,
    is_active: i32,
}

impl From<TicketDefinitionRow> for TicketDefinition {
    fn from(row: TicketDefinitionRow) -> Self {
        Self {
            ticket_definition_id: row.ticket_definition_id,
            event_id: row.event_id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            is_active: row.is_active != 0,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = packages)]
struct PackageRow {
    package_id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    included_ticket_ids: String,
    is_active: i32,
}

impl TryFrom<PackageRow> for Package {
    type Error = PersistenceError;

    fn try_from(row: PackageRow) -> Result<Self, Self::Error> {
        let included_ticket_ids: Vec<String> = serde_json::from_str(&row.included_ticket_ids)
            .map_err(|_| PersistenceError::InvalidStoredValue {
                column: String::from("packages.included_ticket_ids"),
                value: row.included_ticket_ids.clone(),
            })?;
        Ok(Self {
            package_id: row.package_id,
            name: row.name,
            description: row.description,
            price_cents: row.price_cents,
            included_ticket_ids,
            is_active: row.is_active != 0,
        })
    }
}

/// Lists published events ordered by start time.
///
/// # Errors
///
/// Returns an error if the query fails or a stored timestamp is invalid.
pub fn list_published_events(
    conn: &mut SqliteConnection,
    limit: i64,
    offset: i64,
) -> Result<Vec<Event>, PersistenceError> {
    debug!(limit, offset, "Listing published events");

    events::table
        .filter(events::is_published.ne(0))
        .order((events::starts_at.asc(), events::event_id.asc()))
        .limit(limit)
        .offset(offset)
        .select(EventRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Event::try_from)
        .collect()
}

/// Retrieves an event by id.
///
/// # Errors
///
/// Returns `EventNotFound` if no such event exists.
pub fn get_event(conn: &mut SqliteConnection, event_id: &str) -> Result<Event, PersistenceError> {
    debug!(event_id, "Looking up event");

    events::table
        .find(event_id)
        .select(EventRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::EventNotFound(event_id.to_string()))
        .and_then(Event::try_from)
}

/// Lists active ticket definitions, optionally for one event.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_active_ticket_definitions(
    conn: &mut SqliteConnection,
    event_id: Option<&str>,
) -> Result<Vec<TicketDefinition>, PersistenceError> {
    debug!(?event_id, "Listing ticket definitions");

    let mut query = ticket_definitions::table
        .filter(ticket_definitions::is_active.ne(0))
        .into_boxed();
    if let Some(event_id) = event_id {
        query = query.filter(ticket_definitions::event_id.eq(event_id));
    }

    Ok(query
        .order(ticket_definitions::ticket_definition_id.asc())
        .select(TicketDefinitionRow::as_select())
        .load(conn)?
        .into_iter()
        .map(TicketDefinition::from)
        .collect())
}

/// Retrieves a ticket definition by id.
///
/// # Errors
///
/// Returns `TicketDefinitionNotFound` if no such ticket definition exists.
pub fn get_ticket_definition(
    conn: &mut SqliteConnection,
    ticket_definition_id: &str,
) -> Result<TicketDefinition, PersistenceError> {
    debug!(ticket_definition_id, "Looking up ticket definition");

    ticket_definitions::table
        .find(ticket_definition_id)
        .select(TicketDefinitionRow::as_select())
        .first(conn)
        .optional()?
        .map(TicketDefinition::from)
        .ok_or_else(|| PersistenceError::TicketDefinitionNotFound(ticket_definition_id.to_string()))
}

/// Lists active packages by name.
///
/// # Errors
///
/// Returns an error if the query fails or a stored ticket list is invalid.
pub fn list_active_packages(conn: &mut SqliteConnection) -> Result<Vec<Package>, PersistenceError> {
    packages::table
        .filter(packages::is_active.ne(0))
        .order((packages::name.asc(), packages::package_id.asc()))
        .select(PackageRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Package::try_from)
        .collect()
}

/// Retrieves a package by id.
///
/// # Errors
///
/// Returns `PackageNotFound` if no such package exists.
pub fn get_package(conn: &mut SqliteConnection, package_id: &str) -> Result<Package, PersistenceError> {
    debug!(package_id, "Looking up package");

    packages::table
        .find(package_id)
        .select(PackageRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::PackageNotFound(package_id.to_string()))
        .and_then(Package::try_from)
}

/// Counts catalog events, published or not.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_events(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(events::table.count().get_result(conn)?)
}
