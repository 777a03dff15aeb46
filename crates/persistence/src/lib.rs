// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Grand Proclamation registrations.
//!
//! One `SQLite` database type backs two roles:
//!
//! - the local key-value store holding draft snapshots and reservation
//!   flags (`KeyValueStore` implementation over `kv_entries`)
//! - the record store: the event catalog and completed registrations
//!
//! The server opens a separate `Persistence` for each role. Schema changes
//! are embedded Diesel migrations applied on open.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database, so tests never see each other's rows.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::Connection;
use diesel::SqliteConnection;
use proclamation::KeyValueStore;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod seed;

#[cfg(test)]
mod tests;

pub use backend::JournalMode;
pub use data_models::{
    CompletedRegistration, Event, Package, PurchasedItem, StoredRegistration, TicketDefinition,
    TicketPurchase,
};
pub use error::PersistenceError;
pub use seed::{Catalog, default_catalog};

/// Source of unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via an atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_proclamation_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection = backend::open_database(&shared_memory_url, JournalMode::Default)?;
        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = backend::open_database(path_str, JournalMode::Wal)?;
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Local Store
    // ========================================================================

    /// Lists every local store key in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_local_keys(&mut self) -> Result<Vec<String>, PersistenceError> {
        queries::kv::list_keys(&mut self.conn)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Lists published events ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_events(&mut self, limit: u32, offset: u32) -> Result<Vec<Event>, PersistenceError> {
        queries::catalog::list_published_events(&mut self.conn, i64::from(limit), i64::from(offset))
    }

    /// Retrieves an event by id.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if no such event exists.
    pub fn get_event(&mut self, event_id: &str) -> Result<Event, PersistenceError> {
        queries::catalog::get_event(&mut self.conn, event_id)
    }

    /// Lists active ticket definitions, optionally for one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_ticket_definitions(
        &mut self,
        event_id: Option<&str>,
    ) -> Result<Vec<TicketDefinition>, PersistenceError> {
        queries::catalog::list_active_ticket_definitions(&mut self.conn, event_id)
    }

    /// Retrieves a ticket definition by id.
    ///
    /// # Errors
    ///
    /// Returns `TicketDefinitionNotFound` if no such ticket definition exists.
    pub fn get_ticket_definition(
        &mut self,
        ticket_definition_id: &str,
    ) -> Result<TicketDefinition, PersistenceError> {
        queries::catalog::get_ticket_definition(&mut self.conn, ticket_definition_id)
    }

    /// Lists active packages.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_packages(&mut self) -> Result<Vec<Package>, PersistenceError> {
        queries::catalog::list_active_packages(&mut self.conn)
    }

    /// Retrieves a package by id.
    ///
    /// # Errors
    ///
    /// Returns `PackageNotFound` if no such package exists.
    pub fn get_package(&mut self, package_id: &str) -> Result<Package, PersistenceError> {
        queries::catalog::get_package(&mut self.conn, package_id)
    }

    /// Inserts a catalog event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_event(&mut self, event: &Event) -> Result<(), PersistenceError> {
        mutations::catalog::insert_event(&mut self.conn, event)
    }

    /// Inserts a ticket definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_ticket_definition(
        &mut self,
        ticket: &TicketDefinition,
    ) -> Result<(), PersistenceError> {
        mutations::catalog::insert_ticket_definition(&mut self.conn, ticket)
    }

    /// Inserts a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_package(&mut self, package: &Package) -> Result<(), PersistenceError> {
        mutations::catalog::insert_package(&mut self.conn, package)
    }

    /// Inserts a whole catalog in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails. Nothing is written in that case.
    pub fn insert_catalog(&mut self, catalog: &Catalog) -> Result<(), PersistenceError> {
        self.conn
            .transaction::<(), PersistenceError, _>(|conn| {
                for event in &catalog.events {
                    mutations::catalog::insert_event(conn, event)?;
                }
                for ticket in &catalog.ticket_definitions {
                    mutations::catalog::insert_ticket_definition(conn, ticket)?;
                }
                for package in &catalog.packages {
                    mutations::catalog::insert_package(conn, package)?;
                }
                Ok(())
            })
    }

    /// Inserts the default catalog unless events already exist.
    ///
    /// Returns whether anything was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be written.
    pub fn seed_default_catalog(&mut self) -> Result<bool, PersistenceError> {
        let existing: i64 = queries::catalog::count_events(&mut self.conn)?;
        if existing > 0 {
            info!(existing, "Catalog already present, skipping seed");
            return Ok(false);
        }

        let catalog: Catalog = default_catalog();
        self.insert_catalog(&catalog)?;
        info!(
            events = catalog.events.len(),
            ticket_definitions = catalog.ticket_definitions.len(),
            packages = catalog.packages.len(),
            "Seeded default catalog"
        );
        Ok(true)
    }

    // ========================================================================
    // Registrations
    // ========================================================================

    /// Records a paid registration with its attendees and tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft was already recorded or any row is
    /// rejected. Nothing is written in that case.
    pub fn persist_registration(
        &mut self,
        registration: &CompletedRegistration,
    ) -> Result<i64, PersistenceError> {
        mutations::registrations::persist_registration(&mut self.conn, registration)
    }

    /// Loads a registration with its attendees and tickets.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationNotFound` if no such registration exists.
    pub fn get_registration_with_attendees(
        &mut self,
        registration_id: i64,
    ) -> Result<StoredRegistration, PersistenceError> {
        queries::registrations::get_registration_with_attendees(&mut self.conn, registration_id)
    }

    /// Returns the registration recorded for a draft, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_registration_for_draft(
        &mut self,
        draft_id: &str,
    ) -> Result<Option<i64>, PersistenceError> {
        queries::registrations::find_registration_for_draft(&mut self.conn, draft_id)
    }
}

impl KeyValueStore for Persistence {
    type Error = PersistenceError;

    fn get(&mut self, key: &str) -> Result<Option<String>, Self::Error> {
        queries::kv::get_value(&mut self.conn, key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        mutations::kv::set_value(&mut self.conn, key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        mutations::kv::remove_value(&mut self.conn, key)
    }
}
