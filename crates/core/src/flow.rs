// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Step flow controller.
//!
//! Completion is derived from the registration on every call:
//!
//! 1. registration type chosen
//! 2. at least one primary-capable attendee, no dangling partner links, and
//!    no attendee detail errors
//! 3. every attendee holds a ticket or package
//! 4. to 6. reached (`furthest_step` is at or past the step)
//!
//! Leaving the payment step needs a completed payment, which the API layer
//! enforces.

use crate::state::Registration;
use proclamation_domain::{
    AttendeeRecord, Step, attendee_detail_errors, dangling_partner_references,
    has_primary_attendee,
};

/// Reported when leaving step 1 without a registration type.
pub const NO_REGISTRATION_TYPE: &str = "Please select a registration type.";

/// Reported when leaving step 2 without a primary attendee.
pub const NO_PRIMARY_ATTENDEE: &str =
    "At least one Mason or primary contact attendee is required.";

/// Reported when leaving step 5 any way other than a completed payment.
pub const PAYMENT_REQUIRED: &str = "Payment must be completed to continue.";

/// Returns the problems that keep `step` from being complete.
///
/// Steps 4 and 6 have no requirements. Step 5 is only left by completing
/// payment, so leaving it by navigation always reports `PAYMENT_REQUIRED`.
#[must_use]
pub fn step_requirement_errors(registration: &Registration, step: Step) -> Vec<String> {
    match step {
        Step::RegistrationType => {
            if registration.registration_type.is_some() {
                Vec::new()
            } else {
                vec![String::from(NO_REGISTRATION_TYPE)]
            }
        }
        Step::AttendeeDetails => attendee_step_errors(registration),
        Step::TicketSelection => ticket_step_errors(&registration.attendees),
        Step::Payment => vec![String::from(PAYMENT_REQUIRED)],
        Step::OrderSummary | Step::Confirmation => Vec::new(),
    }
}

fn attendee_step_errors(registration: &Registration) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();
    if !has_primary_attendee(&registration.attendees) {
        errors.push(String::from(NO_PRIMARY_ATTENDEE));
    }
    for partner_id in dangling_partner_references(&registration.attendees) {
        errors.push(format!(
            "Attendee {partner_id}: the attendee they accompany is no longer registered."
        ));
    }
    errors.extend(attendee_detail_errors(
        &registration.attendees,
        registration.agree_to_terms,
    ));
    errors
}

fn ticket_step_errors(attendees: &[AttendeeRecord]) -> Vec<String> {
    if attendees.is_empty() {
        return vec![String::from(NO_PRIMARY_ATTENDEE)];
    }
    attendees
        .iter()
        .filter(|a| !a.ticket.has_ticket())
        .map(|a| {
            let name: String = a.full_name();
            let label: &str = a.attendee_type().label();
            if name.is_empty() {
                format!("{label} {}: Please select a ticket or package.", a.attendee_id)
            } else {
                format!("{label} {name}: Please select a ticket or package.")
            }
        })
        .collect()
}

/// Returns whether `step` is complete for this registration.
#[must_use]
pub fn is_step_complete(registration: &Registration, step: Step) -> bool {
    match step {
        Step::RegistrationType | Step::AttendeeDetails | Step::TicketSelection => {
            step_requirement_errors(registration, step).is_empty()
        }
        Step::OrderSummary | Step::Payment | Step::Confirmation => {
            registration.furthest_step >= step
        }
    }
}

/// Returns every completed step in flow order.
#[must_use]
pub fn completed_steps(registration: &Registration) -> Vec<Step> {
    Step::ALL
        .into_iter()
        .filter(|step| is_step_complete(registration, *step))
        .collect()
}

/// Returns whether the UI may navigate directly to `step`.
///
/// A step is available if it is the current step, already complete, or the
/// step immediately after the current one with every earlier step complete.
#[must_use]
pub fn is_step_available(registration: &Registration, step: Step) -> bool {
    if step == registration.step || is_step_complete(registration, step) {
        return true;
    }
    step == registration.step.next()
        && Step::ALL
            .into_iter()
            .take_while(|s| *s < step)
            .all(|s| is_step_complete(registration, s))
}

/// Returns every available step in flow order.
#[must_use]
pub fn available_steps(registration: &Registration) -> Vec<Step> {
    Step::ALL
        .into_iter()
        .filter(|step| is_step_available(registration, *step))
        .collect()
}

/// Returns the step the UI should render when `requested` is loaded.
///
/// Without a registration type every step redirects to step 1.
#[must_use]
pub fn guard_route(registration: &Registration, requested: Step) -> Step {
    if registration.registration_type.is_none() {
        return Step::FIRST;
    }
    requested
}
