// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod registration_tests;

use crate::{CompletedRegistration, Persistence, PurchasedItem, TicketPurchase};
use proclamation_domain::{
    AttendeeId, AttendeePatch, AttendeeRecord, AttendeeType, BillingDetails, ContactPreference,
    NewAttendee, RegistrationType, SelectionRecord,
};

pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.seed_default_catalog().unwrap());
    persistence
}

/// A primary Mason holding the complete package and his partner holding
/// two individual tickets.
pub fn create_test_attendees() -> Vec<AttendeeRecord> {
    let mut mason: AttendeeRecord = AttendeeRecord::create(
        AttendeeId::new("attendee-1"),
        NewAttendee {
            is_primary: true,
            details: AttendeePatch {
                title: Some(String::from("W.Bro.")),
                first_name: Some(String::from("John")),
                last_name: Some(String::from("Smith")),
                primary_email: Some(String::from("john.smith@example.org")),
                primary_phone: Some(String::from("0400 000 000")),
                rank: Some(String::from("MM")),
                ..AttendeePatch::default()
            },
            ..NewAttendee::of_type(AttendeeType::Mason)
        },
    )
    .unwrap();
    mason.ticket = SelectionRecord::package("package-complete");

    let mut partner: AttendeeRecord = AttendeeRecord::create(
        AttendeeId::new("attendee-2"),
        NewAttendee {
            details: AttendeePatch {
                title: Some(String::from("Mrs")),
                first_name: Some(String::from("Mary")),
                last_name: Some(String::from("Smith")),
                relationship: Some(String::from("Wife")),
                contact_preference: Some(ContactPreference::PrimaryAttendee),
                contact_confirmed: Some(true),
                ..AttendeePatch::default()
            },
            ..NewAttendee::partner_of(AttendeeType::LadyPartner, AttendeeId::new("attendee-1"))
        },
    )
    .unwrap();
    partner.ticket = SelectionRecord::events(["ticket-ladies", "ticket-banquet"]);

    vec![mason, partner]
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

pub fn create_completed_registration(draft_id: &str) -> CompletedRegistration {
    let tickets: Vec<TicketPurchase> = vec![
        TicketPurchase {
            attendee_id: AttendeeId::new("attendee-1"),
            item: PurchasedItem::Package(String::from("package-complete")),
            price_cents: 32_500,
        },
        TicketPurchase {
            attendee_id: AttendeeId::new("attendee-2"),
            item: PurchasedItem::TicketDefinition(String::from("ticket-ladies")),
            price_cents: 9_500,
        },
        TicketPurchase {
            attendee_id: AttendeeId::new("attendee-2"),
            item: PurchasedItem::TicketDefinition(String::from("ticket-banquet")),
            price_cents: 15_000,
        },
    ];

    CompletedRegistration {
        draft_id: draft_id.to_string(),
        registration_type: RegistrationType::Individual,
        attendees: create_test_attendees(),
        billing_details: Some(create_test_billing()),
        tickets,
        total_amount_cents: 57_000,
        payment_reference: String::from("pay_test_1"),
    }
}
