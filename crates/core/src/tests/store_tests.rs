// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{TestStore, create_mason_details, create_test_store};
use crate::{
    Command, DraftId, InMemoryKeyValueStore, KeyValueStore, LAST_DRAFT_ID_KEY, Registration,
    RegistrationStore, SaveQueue, SequentialIdGenerator, TransitionOutcome, draft_key,
};
use proclamation_domain::{AttendeeId, AttendeePatch, RegistrationType, Step};
use std::time::{Duration, Instant};

fn start_individual(store: &mut TestStore, now: Instant) {
    store
        .dispatch(
            Command::StartNewRegistration {
                registration_type: RegistrationType::Individual,
            },
            now,
        )
        .unwrap();
}

#[test]
fn test_save_queue_debounces_until_quiet() {
    let mut queue: SaveQueue = SaveQueue::new(Duration::from_millis(100));
    let start: Instant = Instant::now();

    queue.schedule(Registration::new(), start);
    queue.schedule(Registration::new(), start + Duration::from_millis(60));

    assert!(queue.take_due(start + Duration::from_millis(120)).is_none());
    assert!(queue.is_dirty());
    assert!(queue.take_due(start + Duration::from_millis(160)).is_some());
    assert!(!queue.is_dirty());
    assert!(queue.take_due(start + Duration::from_millis(500)).is_none());
}

#[test]
fn test_many_mutations_produce_one_write() {
    let mut store: TestStore = create_test_store();
    let start: Instant = Instant::now();

    start_individual(&mut store, start);
    store.dispatch(Command::AddPrimaryAttendee, start).unwrap();
    for offset in 1..=5 {
        store
            .dispatch(
                Command::SetAgreeToTerms {
                    agree: offset % 2 == 0,
                },
                start + Duration::from_millis(offset * 10),
            )
            .unwrap();
    }

    assert!(!store.flush_due(start + Duration::from_millis(100)));
    assert_eq!(store.drafts().store().write_count(), 0);

    assert!(store.flush_due(start + Duration::from_millis(400)));
    assert!(!store.flush_due(start + Duration::from_secs(5)));

    // snapshot, index, last id, last type
    assert_eq!(store.drafts().store().write_count(), 4);
    assert!(!store.has_pending_save());
}

#[test]
fn test_flush_writes_immediately() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();
    start_individual(&mut store, now);

    assert!(store.has_pending_save());
    assert_eq!(
        store.next_save_deadline(),
        Some(now + Duration::from_millis(250))
    );
    assert!(store.flush());
    assert!(!store.flush());

    let key: String = draft_key(RegistrationType::Individual, &DraftId::new("draft-1"));
    assert!(store.drafts().store().peek(&key).is_some());
}

#[test]
fn test_unchanged_outcome_does_not_schedule_save() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();
    start_individual(&mut store, now);
    store.flush();

    let outcome: TransitionOutcome = store
        .dispatch(
            Command::UpdateAttendee {
                attendee_id: AttendeeId::new("nobody"),
                patch: AttendeePatch::default(),
            },
            now,
        )
        .unwrap();

    assert_eq!(outcome, TransitionOutcome::Unchanged);
    assert!(!store.has_pending_save());
}

#[test]
fn test_failed_command_leaves_state_untouched() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();

    assert!(store.dispatch(Command::AddPrimaryAttendee, now).is_err());
    assert_eq!(store.state(), &Registration::new());
    assert!(!store.has_pending_save());
}

#[test]
fn test_registration_without_draft_is_not_saved() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();

    store
        .dispatch(Command::SetAgreeToTerms { agree: true }, now)
        .unwrap();

    assert!(!store.flush());
    assert_eq!(store.drafts().store().write_count(), 0);
}

#[test]
fn test_clear_registration_writes_pending_save() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();
    start_individual(&mut store, now);
    store.flush();
    store.dispatch(Command::AddPrimaryAttendee, now).unwrap();

    store.dispatch(Command::ClearRegistration, now).unwrap();

    assert!(!store.has_pending_save());
    assert_eq!(store.state(), &Registration::new());
    assert_eq!(store.drafts().store().peek(LAST_DRAFT_ID_KEY), None);
    let saved: Registration = store
        .drafts_mut()
        .load(RegistrationType::Individual, &DraftId::new("draft-1"))
        .unwrap()
        .unwrap();
    assert_eq!(saved.attendees.len(), 1);
}

#[test]
fn test_switching_type_writes_pending_save_of_previous_draft() {
    let mut store: TestStore = create_test_store();
    let start: Instant = Instant::now();
    start_individual(&mut store, start);
    store.flush();
    store.dispatch(Command::AddPrimaryAttendee, start).unwrap();
    store
        .dispatch(
            Command::UpdateAttendee {
                attendee_id: AttendeeId::new("attendee-1"),
                patch: create_mason_details(),
            },
            start,
        )
        .unwrap();

    store
        .select_registration_type(RegistrationType::Lodge, start + Duration::from_millis(10))
        .unwrap();
    store.flush();

    let individual: Registration = store
        .drafts_mut()
        .load(RegistrationType::Individual, &DraftId::new("draft-1"))
        .unwrap()
        .unwrap();
    assert_eq!(individual.attendees.len(), 1);
    assert_eq!(individual.attendees[0].person.first_name, "John");
    let lodge: Option<Registration> = store
        .drafts_mut()
        .load(RegistrationType::Lodge, &DraftId::new("draft-2"))
        .unwrap();
    assert!(lodge.is_some());
}

#[test]
fn test_starting_new_draft_writes_previous_pending_save() {
    let mut store: TestStore = create_test_store();
    let start: Instant = Instant::now();
    start_individual(&mut store, start);
    store.dispatch(Command::AddPrimaryAttendee, start).unwrap();

    assert_eq!(store.drafts().store().write_count(), 0);
    assert_eq!(store.state().draft_id, Some(DraftId::new("draft-1")));

    store
        .dispatch(
            Command::StartNewRegistration {
                registration_type: RegistrationType::Delegation,
            },
            start,
        )
        .unwrap();

    // snapshot, index, last id, last type of draft-1
    assert_eq!(store.drafts().store().write_count(), 4);
    assert!(store.has_pending_save());
}

#[test]
fn test_initialize_resumes_saved_draft() {
    let mut first: TestStore = create_test_store();
    let now: Instant = Instant::now();
    start_individual(&mut first, now);
    first.dispatch(Command::AddPrimaryAttendee, now).unwrap();
    first
        .dispatch(
            Command::UpdateAttendee {
                attendee_id: AttendeeId::new("attendee-1"),
                patch: create_mason_details(),
            },
            now,
        )
        .unwrap();
    first.dispatch(Command::NextStep, now).unwrap();
    first.flush();
    let saved: Registration = first.state().clone();
    let kv: InMemoryKeyValueStore = first.drafts().store().clone();

    let mut by_type: TestStore = RegistrationStore::with_id_generator(
        kv.clone(),
        *first.config(),
        SequentialIdGenerator::new(),
    );
    assert!(by_type.initialize(Some(RegistrationType::Individual)));
    assert_eq!(by_type.state(), &saved);

    let mut by_last: TestStore = RegistrationStore::with_id_generator(
        kv,
        *first.config(),
        SequentialIdGenerator::new(),
    );
    assert!(by_last.initialize(Some(RegistrationType::Lodge)));
    assert_eq!(by_last.state().step, Step::AttendeeDetails);
}

#[test]
fn test_initialize_with_empty_store_keeps_empty_registration() {
    let mut store: TestStore = create_test_store();
    assert!(!store.initialize(None));
    assert_eq!(store.state(), &Registration::new());
}

#[test]
fn test_initialize_swallows_corrupt_draft() {
    let mut kv: InMemoryKeyValueStore = InMemoryKeyValueStore::new();
    kv.set(LAST_DRAFT_ID_KEY, "draft-1").unwrap();
    kv.set(crate::LAST_TYPE_KEY, "individual").unwrap();
    kv.set(
        &draft_key(RegistrationType::Individual, &DraftId::new("draft-1")),
        "[]",
    )
    .unwrap();
    let mut store: TestStore = RegistrationStore::with_id_generator(
        kv,
        crate::tests::helpers::create_test_config(),
        SequentialIdGenerator::new(),
    );

    assert!(!store.initialize(None));
}

#[test]
fn test_complete_registration_deletes_draft_and_confirms() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();
    start_individual(&mut store, now);
    store.flush();

    let draft_id: DraftId = store.complete_registration(now).unwrap();

    assert_eq!(draft_id, DraftId::new("draft-1"));
    assert_eq!(store.state().step, Step::Confirmation);
    assert!(!store.has_pending_save());
    let key: String = draft_key(RegistrationType::Individual, &draft_id);
    assert!(store.drafts().store().peek(&key).is_none());
}
