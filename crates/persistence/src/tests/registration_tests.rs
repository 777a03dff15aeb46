// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{
    create_completed_registration, create_seeded_persistence, create_test_attendees,
    create_test_billing,
};
use crate::{
    CompletedRegistration, Persistence, PersistenceError, PurchasedItem, StoredRegistration,
    TicketPurchase,
};
use proclamation_domain::{AttendeeId, RegistrationType};

#[test]
fn test_persist_and_fetch_registration() {
    let mut persistence: Persistence = create_seeded_persistence();

    let registration_id: i64 = persistence
        .persist_registration(&create_completed_registration("draft_1"))
        .unwrap();
    let stored: StoredRegistration = persistence
        .get_registration_with_attendees(registration_id)
        .unwrap();

    assert_eq!(stored.registration_id, registration_id);
    assert_eq!(stored.draft_id, "draft_1");
    assert_eq!(stored.registration_type, RegistrationType::Individual);
    assert_eq!(stored.billing_details, Some(create_test_billing()));
    assert_eq!(stored.total_amount_cents, 57_000);
    assert_eq!(stored.payment_reference, "pay_test_1");
    assert_eq!(stored.attendees, create_test_attendees());
    assert_eq!(stored.tickets.len(), 3);
    assert_eq!(
        stored.tickets[0].item,
        PurchasedItem::Package(String::from("package-complete"))
    );
}

#[test]
fn test_registration_ids_are_distinct() {
    let mut persistence: Persistence = create_seeded_persistence();

    let first: i64 = persistence
        .persist_registration(&create_completed_registration("draft_1"))
        .unwrap();
    let second: i64 = persistence
        .persist_registration(&create_completed_registration("draft_2"))
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(persistence.find_registration_for_draft("draft_2").unwrap(), Some(second));
}

#[test]
fn test_same_draft_cannot_be_recorded_twice() {
    let mut persistence: Persistence = create_seeded_persistence();
    let registration: CompletedRegistration = create_completed_registration("draft_1");

    persistence.persist_registration(&registration).unwrap();

    assert_eq!(
        persistence.persist_registration(&registration),
        Err(PersistenceError::DuplicateRegistration(String::from("draft_1")))
    );
}

#[test]
fn test_unknown_package_rolls_back_whole_registration() {
    let mut persistence: Persistence = create_seeded_persistence();
    let mut registration: CompletedRegistration = create_completed_registration("draft_1");
    registration.tickets[0].item = PurchasedItem::Package(String::from("package-missing"));

    assert!(persistence.persist_registration(&registration).is_err());
    assert_eq!(persistence.find_registration_for_draft("draft_1").unwrap(), None);
}

#[test]
fn test_ticket_for_unregistered_attendee_is_rejected() {
    let mut persistence: Persistence = create_seeded_persistence();
    let mut registration: CompletedRegistration = create_completed_registration("draft_1");
    registration.tickets.push(TicketPurchase {
        attendee_id: AttendeeId::new("attendee-99"),
        item: PurchasedItem::TicketDefinition(String::from("ticket-brunch")),
        price_cents: 5_500,
    });

    assert!(persistence.persist_registration(&registration).is_err());
    assert_eq!(persistence.find_registration_for_draft("draft_1").unwrap(), None);
}

#[test]
fn test_get_missing_registration() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert_eq!(
        persistence.get_registration_with_attendees(42),
        Err(PersistenceError::RegistrationNotFound(42))
    );
}
