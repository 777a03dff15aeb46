// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{apply_ok, create_test_registration, select_packages};
use crate::{
    Command, NO_PRIMARY_ATTENDEE, NO_REGISTRATION_TYPE, PAYMENT_REQUIRED, Registration,
    SequentialIdGenerator, available_steps, completed_steps, guard_route, is_step_available,
    is_step_complete, step_requirement_errors,
};
use proclamation_domain::{
    AttendeeId, AttendeePatch, AttendeeType, NewAttendee, RegistrationType, Step,
};

#[test]
fn test_empty_registration_has_no_completed_steps() {
    let registration: Registration = Registration::new();

    assert!(completed_steps(&registration).is_empty());
    assert_eq!(
        step_requirement_errors(&registration, Step::RegistrationType),
        vec![String::from(NO_REGISTRATION_TYPE)]
    );
    assert_eq!(available_steps(&registration), vec![Step::RegistrationType]);
}

#[test]
fn test_complete_attendee_details_complete_step_two() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);

    assert!(is_step_complete(&registration, Step::RegistrationType));
    assert!(is_step_complete(&registration, Step::AttendeeDetails));
    assert!(!is_step_complete(&registration, Step::TicketSelection));
}

#[test]
fn test_step_two_requires_primary_attendee() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let started: Registration = apply_ok(
        &Registration::new(),
        Command::StartNewRegistration {
            registration_type: RegistrationType::Individual,
        },
        &mut ids,
    )
    .new_state;
    let with_terms: Registration =
        apply_ok(&started, Command::SetAgreeToTerms { agree: true }, &mut ids).new_state;

    let errors: Vec<String> = step_requirement_errors(&with_terms, Step::AttendeeDetails);
    assert_eq!(errors, vec![String::from(NO_PRIMARY_ATTENDEE)]);
    assert!(!is_step_complete(&with_terms, Step::AttendeeDetails));
}

#[test]
fn test_step_two_reports_validation_errors() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let broken: Registration = apply_ok(
        &registration,
        Command::UpdateAttendee {
            attendee_id: AttendeeId::new("attendee-1"),
            patch: AttendeePatch {
                primary_email: Some(String::from("not-an-email")),
                ..AttendeePatch::default()
            },
        },
        &mut ids,
    )
    .new_state;

    let errors: Vec<String> = step_requirement_errors(&broken, Step::AttendeeDetails);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("format is invalid"));
}

#[test]
fn test_dangling_partner_blocks_step_two() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let mut registration: Registration = create_test_registration(&mut ids);
    registration.attendees.remove(0);
    let primary: Registration = apply_ok(
        &registration,
        Command::AddAttendee {
            new: NewAttendee {
                is_primary: true,
                details: crate::tests::helpers::create_mason_details(),
                ..NewAttendee::of_type(AttendeeType::Mason)
            },
        },
        &mut ids,
    )
    .new_state;

    let errors: Vec<String> = step_requirement_errors(&primary, Step::AttendeeDetails);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("attendee-2"));
}

#[test]
fn test_step_three_requires_every_ticket() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);

    let errors: Vec<String> = step_requirement_errors(&registration, Step::TicketSelection);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("Mason John Smith"));

    let ticketed: Registration = select_packages(&registration, &mut ids);
    assert!(is_step_complete(&ticketed, Step::TicketSelection));
}

#[test]
fn test_later_steps_complete_by_reaching_them() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = Registration::new();

    let at_payment: Registration =
        apply_ok(&registration, Command::GoToStep { step: 5 }, &mut ids).new_state;
    assert!(is_step_complete(&at_payment, Step::OrderSummary));
    assert!(is_step_complete(&at_payment, Step::Payment));
    assert!(!is_step_complete(&at_payment, Step::Confirmation));

    let confirmed: Registration =
        apply_ok(&at_payment, Command::NextStep, &mut ids).new_state;
    assert!(is_step_complete(&confirmed, Step::Payment));
    assert!(is_step_complete(&confirmed, Step::Confirmation));
}

#[test]
fn test_payment_is_available_from_order_summary() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let ticketed: Registration = select_packages(&create_test_registration(&mut ids), &mut ids);
    let at_summary: Registration = apply_ok(
        &apply_ok(&ticketed, Command::NextStep, &mut ids).new_state,
        Command::NextStep,
        &mut ids,
    )
    .new_state;

    assert_eq!(at_summary.step, Step::OrderSummary);
    assert!(is_step_complete(&at_summary, Step::OrderSummary));
    assert!(is_step_available(&at_summary, Step::Payment));
    assert!(!is_step_available(&at_summary, Step::Confirmation));
    assert_eq!(
        available_steps(&at_summary),
        vec![
            Step::RegistrationType,
            Step::AttendeeDetails,
            Step::TicketSelection,
            Step::OrderSummary,
            Step::Payment,
        ]
    );
}

#[test]
fn test_payment_step_cannot_be_left_by_navigation() {
    let registration: Registration = Registration::new();
    assert_eq!(
        step_requirement_errors(&registration, Step::Payment),
        vec![String::from(PAYMENT_REQUIRED)]
    );
    assert!(step_requirement_errors(&registration, Step::OrderSummary).is_empty());
}

#[test]
fn test_availability_allows_one_step_ahead_when_prior_complete() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);

    assert_eq!(registration.step, Step::AttendeeDetails);
    assert!(is_step_available(&registration, Step::RegistrationType));
    assert!(is_step_available(&registration, Step::AttendeeDetails));
    assert!(is_step_available(&registration, Step::TicketSelection));
    assert!(!is_step_available(&registration, Step::OrderSummary));
    assert!(!is_step_available(&registration, Step::Confirmation));
}

#[test]
fn test_availability_blocks_next_step_when_prior_incomplete() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = create_test_registration(&mut ids);
    let without_terms: Registration = apply_ok(
        &registration,
        Command::SetAgreeToTerms { agree: false },
        &mut ids,
    )
    .new_state;

    assert!(is_step_available(&without_terms, Step::AttendeeDetails));
    assert!(!is_step_available(&without_terms, Step::TicketSelection));
}

#[test]
fn test_availability_includes_current_and_completed_steps() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    let registration: Registration = select_packages(&create_test_registration(&mut ids), &mut ids);

    for step in Step::ALL {
        let at_step: Registration = Registration {
            step,
            ..registration.clone()
        };
        assert!(is_step_available(&at_step, step));
        for completed in completed_steps(&at_step) {
            assert!(is_step_available(&at_step, completed));
        }
    }
}

#[test]
fn test_guard_route_redirects_without_registration_type() {
    let mut ids: SequentialIdGenerator = SequentialIdGenerator::new();
    assert_eq!(
        guard_route(&Registration::new(), Step::Payment),
        Step::RegistrationType
    );

    let registration: Registration = create_test_registration(&mut ids);
    assert_eq!(guard_route(&registration, Step::Payment), Step::Payment);
}
