// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{create_guest, create_lady_partner, create_primary_mason};
use crate::{
    AttendeeId, AttendeeKind, AttendeePatch, AttendeeRecord, AttendeeType, DomainError,
    NewAttendee, SelectionChange, SelectionState, dangling_partner_references,
    has_primary_attendee, validate_partner_reference,
};

#[test]
fn test_create_defaults_names_and_ticket() {
    let record: AttendeeRecord =
        AttendeeRecord::create(AttendeeId::new("a1"), NewAttendee::of_type(AttendeeType::Mason))
            .unwrap();

    assert_eq!(record.person.first_name, "");
    assert_eq!(record.person.last_name, "");
    assert_eq!(record.ticket.state(), SelectionState::Empty);
    assert!(!record.is_primary);
    assert!(matches!(record.kind, AttendeeKind::Mason(_)));
}

#[test]
fn test_partner_requires_related_attendee() {
    let result: Result<AttendeeRecord, DomainError> = AttendeeRecord::create(
        AttendeeId::new("p1"),
        NewAttendee::of_type(AttendeeType::LadyPartner),
    );
    assert_eq!(
        result,
        Err(DomainError::MissingRelatedAttendee {
            attendee_type: AttendeeType::LadyPartner
        })
    );
}

#[test]
fn test_new_partner_starts_with_empty_title_and_relationship() {
    let record: AttendeeRecord = AttendeeRecord::create(
        AttendeeId::new("p1"),
        NewAttendee::partner_of(AttendeeType::GuestPartner, AttendeeId::new("g1")),
    )
    .unwrap();

    assert_eq!(record.person.title, "");
    assert_eq!(record.relationship(), Some(""));
    assert_eq!(record.contact.contact_preference, None);
    assert_eq!(record.related_attendee_id(), Some(&AttendeeId::new("g1")));
}

#[test]
fn test_patch_ignores_fields_of_other_variants() {
    let mut guest: AttendeeRecord = create_guest("g1");
    guest.apply_patch(AttendeePatch {
        rank: Some(String::from("GL")),
        relationship: Some(String::from("Friend")),
        first_name: Some(String::from("Paul")),
        ..AttendeePatch::default()
    });

    assert_eq!(guest.person.first_name, "Paul");
    assert_eq!(guest.kind, AttendeeKind::Guest);
    assert_eq!(guest.relationship(), None);
}

#[test]
fn test_patch_routes_ticket_through_selection_rules() {
    let mut mason: AttendeeRecord = create_primary_mason("m1");
    mason.apply_patch(AttendeePatch::ticket(SelectionChange::Package(Some(
        String::from("full"),
    ))));
    mason.apply_patch(AttendeePatch::ticket(SelectionChange::Events(vec![
        String::from("ev1"),
    ])));

    assert_eq!(mason.ticket.ticket_definition_id(), None);
    assert_eq!(mason.ticket.selected_events(), ["ev1"]);
}

#[test]
fn test_attendee_serializes_as_flat_tagged_record() {
    let partner: AttendeeRecord = create_lady_partner("p1", "m1");
    let json: serde_json::Value = serde_json::to_value(&partner).unwrap();

    assert_eq!(json["attendeeId"], "p1");
    assert_eq!(json["attendeeType"], "lady_partner");
    assert_eq!(json["relatedAttendeeId"], "m1");
    assert_eq!(json["relationship"], "Wife");
    assert_eq!(json["firstName"], "Mary");
    assert_eq!(json["contactPreference"], "PrimaryAttendee");
    assert_eq!(json["ticket"]["selectedEvents"], serde_json::json!([]));

    let decoded: AttendeeRecord = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, partner);
}

#[test]
fn test_mason_profile_fields_are_flattened() {
    let mason: AttendeeRecord = create_primary_mason("m1");
    let json: serde_json::Value = serde_json::to_value(&mason).unwrap();
    assert_eq!(json["attendeeType"], "mason");
    assert_eq!(json["rank"], "MM");
    assert_eq!(json["lodgeId"], "lodge-42");
    assert_eq!(json["isPrimary"], true);
}

#[test]
fn test_has_primary_attendee_requires_primary_capable_type() {
    let mason: AttendeeRecord = create_primary_mason("m1");
    let mut guest: AttendeeRecord = create_guest("g1");
    guest.is_primary = true;

    assert!(has_primary_attendee(&[mason]));
    assert!(!has_primary_attendee(&[guest]));
    assert!(!has_primary_attendee(&[]));
}

#[test]
fn test_partner_reference_must_target_non_partner() {
    let attendees: Vec<AttendeeRecord> =
        vec![create_primary_mason("m1"), create_lady_partner("p1", "m1")];

    assert!(validate_partner_reference(&attendees, &AttendeeId::new("m1")).is_ok());
    assert!(validate_partner_reference(&attendees, &AttendeeId::new("p1")).is_err());
    assert!(validate_partner_reference(&attendees, &AttendeeId::new("zz")).is_err());
}

#[test]
fn test_dangling_partner_references_are_reported() {
    let attendees: Vec<AttendeeRecord> = vec![
        create_primary_mason("m1"),
        create_lady_partner("p1", "m1"),
        create_lady_partner("p2", "gone"),
    ];
    assert_eq!(
        dangling_partner_references(&attendees),
        vec![AttendeeId::new("p2")]
    );
}
