// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod attendee;

use crate::{
    AttendeeId, AttendeePatch, AttendeeRecord, AttendeeType, ContactPreference, NewAttendee,
};

pub fn create_primary_mason(id: &str) -> AttendeeRecord {
    AttendeeRecord::create(
        AttendeeId::new(id),
        NewAttendee {
            attendee_type: AttendeeType::Mason,
            is_primary: true,
            related_attendee_id: None,
            details: AttendeePatch {
                title: Some(String::from("Bro.")),
                first_name: Some(String::from("John")),
                last_name: Some(String::from("Smith")),
                primary_email: Some(String::from("john.smith@example.org")),
                primary_phone: Some(String::from("0400 000 000")),
                rank: Some(String::from("MM")),
                lodge_id: Some(String::from("lodge-42")),
                ..AttendeePatch::default()
            },
        },
    )
    .unwrap()
}

pub fn create_lady_partner(id: &str, related: &str) -> AttendeeRecord {
    AttendeeRecord::create(
        AttendeeId::new(id),
        NewAttendee {
            attendee_type: AttendeeType::LadyPartner,
            is_primary: false,
            related_attendee_id: Some(AttendeeId::new(related)),
            details: AttendeePatch {
                title: Some(String::from("Mrs")),
                first_name: Some(String::from("Mary")),
                last_name: Some(String::from("Smith")),
                relationship: Some(String::from("Wife")),
                contact_preference: Some(ContactPreference::PrimaryAttendee),
                contact_confirmed: Some(true),
                ..AttendeePatch::default()
            },
        },
    )
    .unwrap()
}

pub fn create_guest(id: &str) -> AttendeeRecord {
    AttendeeRecord::create(
        AttendeeId::new(id),
        NewAttendee {
            attendee_type: AttendeeType::Guest,
            is_primary: false,
            related_attendee_id: None,
            details: AttendeePatch {
                title: Some(String::from("Mr")),
                first_name: Some(String::from("Peter")),
                last_name: Some(String::from("Jones")),
                contact_preference: Some(ContactPreference::Directly),
                primary_email: Some(String::from("peter@example.com")),
                primary_phone: Some(String::from("0411 111 111")),
                ..AttendeePatch::default()
            },
        },
    )
    .unwrap()
}
