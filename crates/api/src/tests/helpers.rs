// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use proclamation::{
    InMemoryKeyValueStore, RegistrationStore, SequentialIdGenerator, StoreConfig, TypeSelection,
};
use proclamation_domain::{BillingDetails, Step};
use proclamation_persistence::Persistence;
use std::time::{Duration, Instant};

use crate::{
    AddAttendeeRequest, AttendeeFieldsRequest, Navigation, SelectRegistrationTypeRequest,
    SetAgreeToTermsRequest, TicketSelectionRequest, add_attendee, advance,
    select_registration_type, set_agree_to_terms, update_attendee, update_billing_details,
};

pub type TestStore = RegistrationStore<InMemoryKeyValueStore, SequentialIdGenerator>;

pub fn create_test_store() -> TestStore {
    RegistrationStore::with_id_generator(
        InMemoryKeyValueStore::new(),
        StoreConfig::new(Duration::from_millis(250), time::Duration::days(3)),
        SequentialIdGenerator::new(),
    )
}

pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.seed_default_catalog().unwrap());
    persistence
}

pub fn create_mason_fields() -> AttendeeFieldsRequest {
    AttendeeFieldsRequest {
        title: Some(String::from("W.Bro.")),
        first_name: Some(String::from("John")),
        last_name: Some(String::from("Smith")),
        primary_email: Some(String::from("john.smith@example.org")),
        primary_phone: Some(String::from("0400 000 000")),
        rank: Some(String::from("MM")),
        lodge_id: Some(String::from("lodge-42")),
        ..AttendeeFieldsRequest::default()
    }
}

pub fn create_partner_request(related_attendee_id: &str) -> AddAttendeeRequest {
    AddAttendeeRequest {
        attendee_type: String::from("lady_partner"),
        is_primary: false,
        related_attendee_id: Some(String::from(related_attendee_id)),
        fields: AttendeeFieldsRequest {
            title: Some(String::from("Mrs")),
            first_name: Some(String::from("Mary")),
            last_name: Some(String::from("Smith")),
            relationship: Some(String::from("Wife")),
            contact_preference: Some(String::from("PrimaryAttendee")),
            contact_confirmed: Some(true),
            ..AttendeeFieldsRequest::default()
        },
    }
}

pub fn create_test_billing() -> BillingDetails {
    BillingDetails {
        billing_name: String::from("John Smith"),
        address_line1: String::from("1 Lodge Street"),
        city: String::from("Sydney"),
        state: String::from("NSW"),
        postcode: String::from("2000"),
        country: String::from("Australia"),
        email: String::from("john.smith@example.org"),
        phone: String::from("0400 000 000"),
        ..BillingDetails::default()
    }
}

pub fn select_individual(store: &mut TestStore, now: Instant) {
    let selection: TypeSelection = select_registration_type(
        store,
        &SelectRegistrationTypeRequest {
            registration_type: String::from("individual"),
        },
        now,
    )
    .unwrap();
    assert!(matches!(selection, TypeSelection::Started { .. }));
}

pub fn ticket_fields(selection: TicketSelectionRequest) -> AttendeeFieldsRequest {
    AttendeeFieldsRequest {
        ticket: Some(selection),
        ..AttendeeFieldsRequest::default()
    }
}

/// Selects a package for an attendee.
pub fn package_selection(package_id: &str) -> TicketSelectionRequest {
    TicketSelectionRequest {
        ticket_definition_id: Some(Some(String::from(package_id))),
        selected_events: None,
    }
}

/// Selects individual tickets for an attendee.
pub fn event_selection(ticket_ids: &[&str]) -> TicketSelectionRequest {
    TicketSelectionRequest {
        ticket_definition_id: None,
        selected_events: Some(ticket_ids.iter().map(ToString::to_string).collect()),
    }
}

/// An individual registration on the attendee step with a complete primary
/// Mason (`attendee-1`), his partner (`attendee-2`) and terms accepted.
pub fn create_attendee_step(store: &mut TestStore, now: Instant) {
    select_individual(store, now);
    advance(store, Navigation::Next, now).unwrap();
    update_attendee(store, "attendee-1", create_mason_fields(), now).unwrap();
    add_attendee(store, create_partner_request("attendee-1"), now).unwrap();
    set_agree_to_terms(store, SetAgreeToTermsRequest { agree: true }, now).unwrap();
}

/// Continues `create_attendee_step` through ticket selection to the
/// payment step with billing details filled in.
///
/// The Mason takes the complete package and the partner takes the ladies
/// program and the banquet.
pub fn create_payment_step(store: &mut TestStore, now: Instant) {
    create_attendee_step(store, now);
    advance(store, Navigation::Next, now).unwrap();
    update_attendee(
        store,
        "attendee-1",
        ticket_fields(package_selection("package-complete")),
        now,
    )
    .unwrap();
    update_attendee(
        store,
        "attendee-2",
        ticket_fields(event_selection(&["ticket-ladies", "ticket-banquet"])),
        now,
    )
    .unwrap();
    advance(store, Navigation::Next, now).unwrap();
    advance(store, Navigation::Next, now).unwrap();
    update_billing_details(store, create_test_billing(), now).unwrap();
    assert_eq!(store.state().step, Step::Payment);
}
