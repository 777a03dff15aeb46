// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Command, InMemoryKeyValueStore, Registration, RegistrationStore, SequentialIdGenerator,
    StoreConfig, TransitionOutcome, TransitionResult, apply,
};
use proclamation_domain::{
    AttendeeId, AttendeePatch, AttendeeType, ContactPreference, NewAttendee, RegistrationType,
    SelectionChange,
};
use std::time::Duration;

pub type TestStore = RegistrationStore<InMemoryKeyValueStore, SequentialIdGenerator>;

pub fn create_test_config() -> StoreConfig {
    StoreConfig::new(Duration::from_millis(250), time::Duration::days(3))
}

pub fn create_test_store() -> TestStore {
    RegistrationStore::with_id_generator(
        InMemoryKeyValueStore::new(),
        create_test_config(),
        SequentialIdGenerator::new(),
    )
}

pub fn create_mason_details() -> AttendeePatch {
    AttendeePatch {
        title: Some(String::from("W.Bro.")),
        first_name: Some(String::from("John")),
        last_name: Some(String::from("Smith")),
        primary_email: Some(String::from("john.smith@example.org")),
        primary_phone: Some(String::from("0400 000 000")),
        rank: Some(String::from("MM")),
        lodge_id: Some(String::from("lodge-42")),
        ..AttendeePatch::default()
    }
}

pub fn create_partner_details() -> AttendeePatch {
    AttendeePatch {
        title: Some(String::from("Mrs")),
        first_name: Some(String::from("Mary")),
        last_name: Some(String::from("Smith")),
        relationship: Some(String::from("Wife")),
        contact_preference: Some(ContactPreference::PrimaryAttendee),
        contact_confirmed: Some(true),
        ..AttendeePatch::default()
    }
}

/// Applies a command, panicking on failure.
pub fn apply_ok(
    state: &Registration,
    command: Command,
    ids: &mut SequentialIdGenerator,
) -> TransitionResult {
    apply(state, command, ids).unwrap()
}

/// Returns the id carried by an `AttendeeAdded` outcome.
pub fn added_id(outcome: &TransitionOutcome) -> AttendeeId {
    match outcome {
        TransitionOutcome::AttendeeAdded { attendee_id } => attendee_id.clone(),
        other => panic!("expected AttendeeAdded, got {other:?}"),
    }
}

/// An individual registration with a complete primary Mason (`attendee-1`)
/// and his partner (`attendee-2`), terms accepted, at step 2.
pub fn create_test_registration(ids: &mut SequentialIdGenerator) -> Registration {
    let mut state: Registration = apply_ok(
        &Registration::new(),
        Command::StartNewRegistration {
            registration_type: RegistrationType::Individual,
        },
        ids,
    )
    .new_state;
    state = apply_ok(&state, Command::NextStep, ids).new_state;

    let primary: TransitionResult = apply_ok(&state, Command::AddPrimaryAttendee, ids);
    let mason_id: AttendeeId = added_id(&primary.outcome);
    state = apply_ok(
        &primary.new_state,
        Command::UpdateAttendee {
            attendee_id: mason_id.clone(),
            patch: create_mason_details(),
        },
        ids,
    )
    .new_state;

    let partner: NewAttendee = NewAttendee {
        details: create_partner_details(),
        ..NewAttendee::partner_of(AttendeeType::LadyPartner, mason_id)
    };
    state = apply_ok(&state, Command::AddAttendee { new: partner }, ids).new_state;
    apply_ok(&state, Command::SetAgreeToTerms { agree: true }, ids).new_state
}

/// Gives every attendee a package so step 3 is complete.
pub fn select_packages(state: &Registration, ids: &mut SequentialIdGenerator) -> Registration {
    let mut state: Registration = state.clone();
    let attendee_ids: Vec<AttendeeId> =
        state.attendees.iter().map(|a| a.attendee_id.clone()).collect();
    for attendee_id in attendee_ids {
        state = apply_ok(
            &state,
            Command::UpdateAttendee {
                attendee_id,
                patch: AttendeePatch::ticket(SelectionChange::Package(Some(String::from(
                    "full-package",
                )))),
            },
            ids,
        )
        .new_state;
    }
    state
}
