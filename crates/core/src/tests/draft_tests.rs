// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::create_test_registration;
use crate::{
    CURRENT_SCHEMA_VERSION, DRAFT_INDEX_KEY, DraftId, DraftIndex, DraftSnapshot, DraftStorage,
    DraftStoreError, InMemoryKeyValueStore, KeyValueStore, LAST_DRAFT_ID_KEY, LAST_TYPE_KEY,
    Registration, SequentialIdGenerator, draft_key,
};
use proclamation_domain::{RegistrationType, Step};
use time::OffsetDateTime;
use time::macros::datetime;

fn create_snapshot(registration: &Registration) -> DraftSnapshot {
    DraftSnapshot::from_registration(registration, datetime!(2026-05-01 10:00 UTC)).unwrap()
}

#[test]
fn test_draft_key_layout() {
    assert_eq!(
        draft_key(RegistrationType::Individual, &DraftId::new("draft-1")),
        "registration-draft:individual:draft-1"
    );
}

#[test]
fn test_snapshot_requires_draft_id_and_type() {
    let result: Result<DraftSnapshot, DraftStoreError> =
        DraftSnapshot::from_registration(&Registration::new(), OffsetDateTime::UNIX_EPOCH);
    assert!(matches!(result, Err(DraftStoreError::NotADraft)));
}

#[test]
fn test_snapshot_envelope_shape() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let json: serde_json::Value = serde_json::to_value(create_snapshot(&registration)).unwrap();

    assert_eq!(json["schemaVersion"], CURRENT_SCHEMA_VERSION);
    assert_eq!(json["draftId"], "draft-1");
    assert_eq!(json["registrationType"], "individual");
    assert_eq!(json["step"], 2);
    assert_eq!(json["furthestStep"], 2);
    assert_eq!(json["agreeToTerms"], true);
    assert_eq!(json["savedAt"], "2026-05-01T10:00:00Z");
    assert_eq!(json["attendees"][0]["attendeeType"], "mason");
    assert_eq!(json["attendees"][1]["relatedAttendeeId"], "attendee-1");
}

#[test]
fn test_save_then_load_restores_registration() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let mut storage: DraftStorage<InMemoryKeyValueStore> =
        DraftStorage::new(InMemoryKeyValueStore::new());

    storage.save(&create_snapshot(&registration)).unwrap();
    let loaded: Option<Registration> = storage
        .load(RegistrationType::Individual, &DraftId::new("draft-1"))
        .unwrap();

    assert_eq!(loaded, Some(registration));
}

#[test]
fn test_save_updates_index_and_last_pointers() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let mut storage: DraftStorage<InMemoryKeyValueStore> =
        DraftStorage::new(InMemoryKeyValueStore::new());

    storage.save(&create_snapshot(&registration)).unwrap();
    storage.save(&create_snapshot(&registration)).unwrap();

    let index: DraftIndex = storage.read_index().unwrap();
    assert_eq!(
        index.drafts_for(RegistrationType::Individual),
        [DraftId::new("draft-1")]
    );
    assert!(index.drafts_for(RegistrationType::Lodge).is_empty());
    assert_eq!(storage.store().peek(LAST_DRAFT_ID_KEY), Some("draft-1"));
    assert_eq!(storage.store().peek(LAST_TYPE_KEY), Some("individual"));
    assert_eq!(
        storage.store().peek(DRAFT_INDEX_KEY),
        Some(r#"{"individual":["draft-1"]}"#)
    );
}

#[test]
fn test_load_for_type_prefers_newest_and_skips_missing() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let first: Registration = create_test_registration(&mut ids);
    let second: Registration = Registration {
        draft_id: Some(DraftId::new("draft-9")),
        ..first.clone()
    };
    let mut storage: DraftStorage<InMemoryKeyValueStore> =
        DraftStorage::new(InMemoryKeyValueStore::new());

    storage.save(&create_snapshot(&first)).unwrap();
    storage.save(&create_snapshot(&second)).unwrap();
    let loaded: Option<Registration> = storage.load_for_type(RegistrationType::Individual).unwrap();
    assert_eq!(loaded.unwrap().draft_id, Some(DraftId::new("draft-9")));

    storage
        .store_mut()
        .remove(&draft_key(
            RegistrationType::Individual,
            &DraftId::new("draft-9"),
        ))
        .unwrap();
    let fallback: Option<Registration> =
        storage.load_for_type(RegistrationType::Individual).unwrap();
    assert_eq!(fallback.unwrap().draft_id, Some(DraftId::new("draft-1")));
}

#[test]
fn test_load_for_type_skips_corrupt_snapshot() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let mut storage: DraftStorage<InMemoryKeyValueStore> =
        DraftStorage::new(InMemoryKeyValueStore::new());
    storage.save(&create_snapshot(&registration)).unwrap();
    storage
        .store_mut()
        .set(
            &draft_key(RegistrationType::Individual, &DraftId::new("draft-1")),
            "{not json",
        )
        .unwrap();

    assert_eq!(
        storage.load_for_type(RegistrationType::Individual).unwrap(),
        None
    );
}

#[test]
fn test_load_last_uses_pointers() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let mut storage: DraftStorage<InMemoryKeyValueStore> =
        DraftStorage::new(InMemoryKeyValueStore::new());

    assert_eq!(storage.load_last().unwrap(), None);
    storage.save(&create_snapshot(&registration)).unwrap();
    assert_eq!(storage.load_last().unwrap(), Some(registration));
}

#[test]
fn test_load_last_rejects_unknown_type() {
    let mut store: InMemoryKeyValueStore = InMemoryKeyValueStore::new();
    store.set(LAST_DRAFT_ID_KEY, "draft-1").unwrap();
    store.set(LAST_TYPE_KEY, "chapter").unwrap();
    let mut storage: DraftStorage<InMemoryKeyValueStore> = DraftStorage::new(store);

    assert!(matches!(
        storage.load_last(),
        Err(DraftStoreError::InvalidValue { .. })
    ));
}

#[test]
fn test_delete_draft_removes_snapshot_index_entry_and_pointers() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let mut storage: DraftStorage<InMemoryKeyValueStore> =
        DraftStorage::new(InMemoryKeyValueStore::new());
    storage.save(&create_snapshot(&registration)).unwrap();

    storage
        .delete_draft(RegistrationType::Individual, &DraftId::new("draft-1"))
        .unwrap();

    assert_eq!(
        storage
            .load(RegistrationType::Individual, &DraftId::new("draft-1"))
            .unwrap(),
        None
    );
    assert!(
        storage
            .read_index()
            .unwrap()
            .drafts_for(RegistrationType::Individual)
            .is_empty()
    );
    assert_eq!(storage.store().peek(LAST_DRAFT_ID_KEY), None);
    assert_eq!(storage.store().peek(LAST_TYPE_KEY), None);
}

#[test]
fn test_load_upgrades_unversioned_draft() {
    let mut store: InMemoryKeyValueStore = InMemoryKeyValueStore::new();
    store
        .set(
            "registration-draft:individual:old-draft",
            r#"{"masons":[{"title":"Bro.","firstName":"Alan","lastName":"Brown","rank":"EA"}],
                "step":3}"#,
        )
        .unwrap();
    let mut storage: DraftStorage<InMemoryKeyValueStore> = DraftStorage::new(store);

    let loaded: Registration = storage
        .load(RegistrationType::Individual, &DraftId::new("old-draft"))
        .unwrap()
        .unwrap();

    assert_eq!(loaded.draft_id, Some(DraftId::new("old-draft")));
    assert_eq!(loaded.registration_type, Some(RegistrationType::Individual));
    assert_eq!(loaded.step, Step::TicketSelection);
    assert_eq!(loaded.furthest_step, Step::TicketSelection);
    assert_eq!(loaded.attendees.len(), 1);
    assert!(loaded.attendees[0].is_primary);
}

#[test]
fn test_load_rejects_future_schema_version() {
    let mut store: InMemoryKeyValueStore = InMemoryKeyValueStore::new();
    store
        .set(
            "registration-draft:individual:draft-1",
            r#"{"schemaVersion":99,"draftId":"draft-1","registrationType":"individual"}"#,
        )
        .unwrap();
    let mut storage: DraftStorage<InMemoryKeyValueStore> = DraftStorage::new(store);

    assert!(matches!(
        storage.load(RegistrationType::Individual, &DraftId::new("draft-1")),
        Err(DraftStoreError::UnsupportedVersion(99))
    ));
}
