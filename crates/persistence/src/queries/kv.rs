// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::kv_entries;
use crate::error::PersistenceError;

/// Reads a local store value.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_value(conn: &mut SqliteConnection, key: &str) -> Result<Option<String>, PersistenceError> {
    Ok(kv_entries::table
        .find(key)
        .select(kv_entries::entry_value)
        .first::<String>(conn)
        .optional()?)
}

/// Lists every local store key in order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_keys(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(kv_entries::table
        .select(kv_entries::entry_key)
        .order(kv_entries::entry_key.asc())
        .load::<String>(conn)?)
}
