// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` connection setup: PRAGMAs, embedded migrations and the
//! foreign key check. Diesel has no PRAGMA DSL, so this is the only module
//! that issues raw SQL.

use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a writer waits on a locked database file.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// How the database journals writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// `SQLite`'s default rollback journal. Used for in-memory databases.
    Default,
    /// Write-ahead logging, for file databases.
    Wal,
}

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Opens a database, applies connection PRAGMAs and runs pending
/// migrations.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, a PRAGMA or
/// migration fails, or foreign keys are not enforced afterwards.
pub fn open_database(
    database_url: &str,
    journal_mode: JournalMode,
) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?journal_mode, "Opening SQLite database");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    let mut pragmas: Vec<String> = vec![
        String::from("PRAGMA foreign_keys = ON"),
        format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
    ];
    if journal_mode == JournalMode::Wal {
        pragmas.push(String::from("PRAGMA journal_mode = WAL"));
    }
    for pragma in &pragmas {
        diesel::sql_query(pragma.as_str())
            .execute(&mut conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("{pragma}: {e}")))?;
    }

    let applied: usize = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?
        .len();
    debug!(applied, "Applied migrations");

    verify_foreign_key_enforcement(&mut conn)?;
    Ok(conn)
}

/// Fails unless `SQLite` enforces foreign keys on this connection.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if enforcement is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }
    Ok(())
}
