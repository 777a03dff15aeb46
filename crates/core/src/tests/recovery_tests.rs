// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{TestStore, create_mason_details, create_test_store};
use crate::{
    Command, CoreError, DraftId, RecoveryChoice, Registration, TypeSelection, draft_key,
    is_meaningful_draft,
};
use proclamation_domain::{AttendeeId, RegistrationType, Step};
use std::time::Instant;

/// A store holding a saved individual draft (`draft-1`) whose primary Mason
/// is named, currently at the ticket selection step.
fn create_store_with_named_draft(now: Instant) -> TestStore {
    let mut store: TestStore = create_test_store();
    store
        .dispatch(
            Command::StartNewRegistration {
                registration_type: RegistrationType::Individual,
            },
            now,
        )
        .unwrap();
    store.dispatch(Command::AddPrimaryAttendee, now).unwrap();
    store
        .dispatch(
            Command::UpdateAttendee {
                attendee_id: AttendeeId::new("attendee-1"),
                patch: create_mason_details(),
            },
            now,
        )
        .unwrap();
    store.dispatch(Command::GoToStep { step: 3 }, now).unwrap();
    store.flush();
    store
}

#[test]
fn test_meaningful_draft_needs_a_named_attendee() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();
    store
        .dispatch(
            Command::StartNewRegistration {
                registration_type: RegistrationType::Individual,
            },
            now,
        )
        .unwrap();
    store.dispatch(Command::AddPrimaryAttendee, now).unwrap();

    assert!(!is_meaningful_draft(&Registration::new()));
    assert!(!is_meaningful_draft(store.state()));

    let named: TestStore = create_store_with_named_draft(now);
    assert!(is_meaningful_draft(named.state()));
}

#[test]
fn test_selecting_type_without_draft_starts_new() {
    let mut store: TestStore = create_test_store();
    let now: Instant = Instant::now();

    let selection: TypeSelection = store
        .select_registration_type(RegistrationType::Individual, now)
        .unwrap();

    assert_eq!(
        selection,
        TypeSelection::Started {
            draft_id: DraftId::new("draft-1")
        }
    );
    assert_eq!(
        store.state().registration_type,
        Some(RegistrationType::Individual)
    );
    assert!(store.pending_recovery().is_none());
}

#[test]
fn test_selecting_type_with_meaningful_draft_prompts() {
    let now: Instant = Instant::now();
    let mut store: TestStore = create_store_with_named_draft(now);

    let selection: TypeSelection = store
        .select_registration_type(RegistrationType::Individual, now)
        .unwrap();

    let TypeSelection::RecoveryPrompt(prompt) = selection else {
        panic!("expected a recovery prompt, got {selection:?}");
    };
    assert_eq!(prompt.draft_id, DraftId::new("draft-1"));
    assert_eq!(prompt.attendee_count, 1);
    assert_eq!(prompt.primary_attendee_name.as_deref(), Some("John Smith"));
    assert_eq!(prompt.step, Step::TicketSelection);
    assert!(store.pending_recovery().is_some());
}

#[test]
fn test_prompt_finds_stored_draft_of_other_type() {
    let now: Instant = Instant::now();
    let mut store: TestStore = create_store_with_named_draft(now);
    store
        .select_registration_type(RegistrationType::Lodge, now)
        .unwrap();
    assert_eq!(store.state().registration_type, Some(RegistrationType::Lodge));

    let selection: TypeSelection = store
        .select_registration_type(RegistrationType::Individual, now)
        .unwrap();

    assert!(matches!(selection, TypeSelection::RecoveryPrompt(_)));
}

#[test]
fn test_continue_resumes_saved_step() {
    let now: Instant = Instant::now();
    let mut store: TestStore = create_store_with_named_draft(now);
    store
        .select_registration_type(RegistrationType::Individual, now)
        .unwrap();

    let selection: TypeSelection = store
        .resolve_recovery(RecoveryChoice::Continue, now)
        .unwrap();

    assert_eq!(
        selection,
        TypeSelection::Resumed {
            draft_id: DraftId::new("draft-1"),
            step: Step::TicketSelection
        }
    );
    assert_eq!(store.state().attendees.len(), 1);
    assert!(store.pending_recovery().is_none());
}

#[test]
fn test_edit_attendees_resumes_at_attendee_details() {
    let now: Instant = Instant::now();
    let mut store: TestStore = create_store_with_named_draft(now);
    store
        .select_registration_type(RegistrationType::Individual, now)
        .unwrap();

    store
        .resolve_recovery(RecoveryChoice::EditAttendees, now)
        .unwrap();

    assert_eq!(store.state().step, Step::AttendeeDetails);
    assert_eq!(store.state().furthest_step, Step::TicketSelection);
}

#[test]
fn test_start_new_discards_old_draft() {
    let now: Instant = Instant::now();
    let mut store: TestStore = create_store_with_named_draft(now);
    store
        .select_registration_type(RegistrationType::Individual, now)
        .unwrap();

    let selection: TypeSelection = store
        .resolve_recovery(RecoveryChoice::StartNew, now)
        .unwrap();

    assert_eq!(
        selection,
        TypeSelection::Started {
            draft_id: DraftId::new("draft-2")
        }
    );
    assert!(store.state().attendees.is_empty());
    let old_key: String = draft_key(RegistrationType::Individual, &DraftId::new("draft-1"));
    assert!(store.drafts().store().peek(&old_key).is_none());
}

#[test]
fn test_resolve_without_prompt_fails() {
    let mut store: TestStore = create_test_store();
    assert_eq!(
        store.resolve_recovery(RecoveryChoice::Continue, Instant::now()),
        Err(CoreError::NoRecoveryPending)
    );
}

#[test]
fn test_recovery_choice_parsing() {
    assert_eq!(
        "continue".parse::<RecoveryChoice>(),
        Ok(RecoveryChoice::Continue)
    );
    assert_eq!(
        "edit_attendees".parse::<RecoveryChoice>(),
        Ok(RecoveryChoice::EditAttendees)
    );
    assert_eq!(
        "start_new".parse::<RecoveryChoice>(),
        Ok(RecoveryChoice::StartNew)
    );
    assert!("later".parse::<RecoveryChoice>().is_err());
}
