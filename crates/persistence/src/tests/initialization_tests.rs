// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Persistence, PersistenceError};
use proclamation::KeyValueStore;

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = Persistence::new_in_memory().unwrap();
    let mut db2: Persistence = Persistence::new_in_memory().unwrap();

    db1.set("shared-key", "db1").unwrap();
    assert!(db1.seed_default_catalog().unwrap());

    assert_eq!(db2.get("shared-key").unwrap(), None);
    assert!(db2.list_events(50, 0).unwrap().is_empty());
}

#[test]
fn test_file_database_survives_reopen() {
    let path: std::path::PathBuf = std::env::temp_dir().join(format!(
        "proclamation-persistence-{}-{}.db",
        std::process::id(),
        time::OffsetDateTime::now_utc().unix_timestamp_nanos()
    ));

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence.set("registration-last-type", "individual").unwrap();
    }
    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        assert_eq!(
            persistence.get("registration-last-type").unwrap().as_deref(),
            Some("individual")
        );
    }

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
