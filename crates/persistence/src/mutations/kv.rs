// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_models::format_timestamp;
use crate::diesel_schema::kv_entries;
use crate::error::PersistenceError;

/// Writes a local store value, replacing any existing one.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn set_value(conn: &mut SqliteConnection, key: &str, value: &str) -> Result<(), PersistenceError> {
    let updated_at: String = format_timestamp(OffsetDateTime::now_utc())?;

    diesel::insert_into(kv_entries::table)
        .values((
            kv_entries::entry_key.eq(key),
            kv_entries::entry_value.eq(value),
            kv_entries::updated_at.eq(&updated_at),
        ))
        .on_conflict(kv_entries::entry_key)
        .do_update()
        .set((
            kv_entries::entry_value.eq(value),
            kv_entries::updated_at.eq(&updated_at),
        ))
        .execute(conn)?;

    debug!(key, bytes = value.len(), "Stored local value");
    Ok(())
}

/// Removes a local store value. Removing a missing key succeeds.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn remove_value(conn: &mut SqliteConnection, key: &str) -> Result<(), PersistenceError> {
    let removed: usize = diesel::delete(kv_entries::table.find(key)).execute(conn)?;
    debug!(key, removed, "Removed local value");
    Ok(())
}
