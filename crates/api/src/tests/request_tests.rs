// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use proclamation_domain::{AttendeeType, NewAttendee, SelectionChange};

use crate::{AddAttendeeRequest, ApiError, AttendeeFieldsRequest, TicketSelectionRequest};

#[test]
fn test_add_attendee_request_reads_flattened_fields() {
    let request: AddAttendeeRequest = serde_json::from_str(
        r#"{
            "attendeeType": "lady_partner",
            "relatedAttendeeId": "attendee-1",
            "firstName": "Mary",
            "contactPreference": "PrimaryAttendee",
            "ticket": {"selectedEvents": ["ticket-ladies"]}
        }"#,
    )
    .unwrap();

    let new: NewAttendee = request.into_new_attendee().unwrap();
    assert_eq!(new.attendee_type, AttendeeType::LadyPartner);
    assert_eq!(new.details.first_name.as_deref(), Some("Mary"));
    assert_eq!(
        new.details.ticket,
        Some(SelectionChange::Events(vec![String::from("ticket-ladies")]))
    );
}

#[test]
fn test_null_package_clears_selection() {
    let fields: AttendeeFieldsRequest =
        serde_json::from_str(r#"{"ticket": {"ticketDefinitionId": null}}"#).unwrap();

    assert_eq!(
        fields.ticket,
        Some(TicketSelectionRequest {
            ticket_definition_id: Some(None),
            selected_events: None,
        })
    );
    assert_eq!(
        fields.into_patch().unwrap().ticket,
        Some(SelectionChange::Package(None))
    );
}

#[test]
fn test_ticket_in_record_shape_is_accepted() {
    let package: AttendeeFieldsRequest = serde_json::from_str(
        r#"{"ticket": {"ticketDefinitionId": "package-complete", "selectedEvents": []}}"#,
    )
    .unwrap();
    let events: AttendeeFieldsRequest = serde_json::from_str(
        r#"{"ticket": {"ticketDefinitionId": null, "selectedEvents": ["ticket-banquet"]}}"#,
    )
    .unwrap();

    assert_eq!(
        package.into_patch().unwrap().ticket,
        Some(SelectionChange::Package(Some(String::from(
            "package-complete"
        ))))
    );
    assert_eq!(
        events.into_patch().unwrap().ticket,
        Some(SelectionChange::Events(vec![String::from("ticket-banquet")]))
    );
}

#[test]
fn test_ticket_with_package_and_events_is_invalid_input() {
    let fields: AttendeeFieldsRequest = serde_json::from_str(
        r#"{"ticket": {"ticketDefinitionId": "package-complete", "selectedEvents": ["ticket-brunch"]}}"#,
    )
    .unwrap();

    assert!(matches!(
        fields.into_patch(),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "ticket"
    ));
}

#[test]
fn test_ticket_without_known_fields_is_rejected() {
    let unknown: Result<AttendeeFieldsRequest, serde_json::Error> =
        serde_json::from_str(r#"{"ticket": {"package": "package-complete"}}"#);
    let empty: AttendeeFieldsRequest = serde_json::from_str(r#"{"ticket": {}}"#).unwrap();

    assert!(unknown.is_err());
    assert!(matches!(
        empty.into_patch(),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "ticket"
    ));
}

#[test]
fn test_unknown_grand_officer_is_invalid_input() {
    let fields: AttendeeFieldsRequest =
        serde_json::from_str(r#"{"grandOfficer": "Former"}"#).unwrap();

    assert!(matches!(
        fields.into_patch(),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "grandOfficer"
    ));
}
