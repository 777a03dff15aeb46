// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the registration flow, the catalog and the
//! reservation bypass.
//!
//! Every handler takes the explicit `RegistrationStore` and the current
//! `Instant` so saves stay deterministic under test.

use proclamation::{
    Command, IdGenerator, KeyValueStore, PAYMENT_REQUIRED, RecoveryChoice, Registration,
    RegistrationStore, TransitionOutcome, TypeSelection, available_steps, completed_steps,
    guard_route, is_step_available, step_requirement_errors,
};
use proclamation_domain::{
    AttendeeId, AttendeeRecord, BillingDetails, DomainError, Step, validate_billing_details,
};
use proclamation_persistence::{Event, Package, Persistence, TicketDefinition};
use std::str::FromStr;
use std::time::Instant;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::error::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AddAttendeeRequest, AddAttendeeResponse, AttendeeFieldsRequest, BypassReservationResponse,
    CreateBypassReservationRequest, ListEventsRequest, Navigation, RegistrationView,
    RemoveAttendeeResponse, ResolveRecoveryRequest, SelectRegistrationTypeRequest,
    SetAgreeToTermsRequest, StepChangeResponse,
};

/// Problems blocking the current step, as shown to the user.
///
/// The payment step shows billing problems rather than the blanket
/// payment requirement.
fn current_step_errors(registration: &Registration) -> Vec<String> {
    if registration.step == Step::Payment {
        let billing: BillingDetails = registration.billing_details.clone().unwrap_or_default();
        return validate_billing_details(&billing);
    }
    step_requirement_errors(registration, registration.step)
}

/// Steps the user may jump to. The confirmation is only reached by paying.
fn navigable_steps(registration: &Registration) -> Vec<Step> {
    available_steps(registration)
        .into_iter()
        .filter(|step| *step != Step::Confirmation || registration.step == Step::Confirmation)
        .collect()
}

/// Builds the view of the current registration.
#[must_use]
pub fn get_registration<S: KeyValueStore, G: IdGenerator>(
    store: &RegistrationStore<S, G>,
) -> RegistrationView {
    let registration: &Registration = store.state();
    RegistrationView {
        registration: registration.clone(),
        current_step: registration.step,
        step_slug: registration.step.slug().to_string(),
        render_step: guard_route(registration, registration.step),
        errors: current_step_errors(registration),
        completed_steps: completed_steps(registration),
        available_steps: navigable_steps(registration),
        recovery_pending: store.pending_recovery().is_some(),
    }
}

fn find_attendee<'a>(
    registration: &'a Registration,
    attendee_id: &AttendeeId,
) -> Result<&'a AttendeeRecord, ApiError> {
    registration
        .attendee(attendee_id)
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Attendee"),
            message: format!("Attendee '{attendee_id}' is not part of this registration"),
        })
}

fn dispatch<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    command: Command,
    now: Instant,
) -> Result<TransitionOutcome, ApiError> {
    store.dispatch(command, now).map_err(translate_core_error)
}

/// Chooses a registration type.
///
/// Returns a recovery prompt instead of starting a new draft when a
/// meaningful draft of that type exists.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown registration type.
pub fn select_registration_type<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    request: &SelectRegistrationTypeRequest,
    now: Instant,
) -> Result<TypeSelection, ApiError> {
    let registration_type = request.registration_type()?;
    info!(%registration_type, "Registration type selected");
    store
        .select_registration_type(registration_type, now)
        .map_err(translate_core_error)
}

/// Answers an open recovery prompt.
///
/// # Errors
///
/// Returns `InvalidInput` for an unknown choice, or a rule violation when
/// no prompt is open.
pub fn resolve_recovery<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    request: &ResolveRecoveryRequest,
    now: Instant,
) -> Result<TypeSelection, ApiError> {
    let choice: RecoveryChoice =
        RecoveryChoice::from_str(&request.choice).map_err(|message| ApiError::InvalidInput {
            field: String::from("choice"),
            message,
        })?;
    store
        .resolve_recovery(choice, now)
        .map_err(translate_core_error)
}

/// Resets the registration so the user can start over.
///
/// # Errors
///
/// Returns an error if the reset command fails.
pub fn clear_registration<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    now: Instant,
) -> Result<RegistrationView, ApiError> {
    dispatch(store, Command::ClearRegistration, now)?;
    Ok(get_registration(store))
}

/// Adds an attendee.
///
/// # Errors
///
/// Returns an error if the request is malformed or a partner names an
/// attendee that cannot be accompanied.
pub fn add_attendee<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    request: AddAttendeeRequest,
    now: Instant,
) -> Result<AddAttendeeResponse, ApiError> {
    let new = request.into_new_attendee()?;
    match dispatch(store, Command::AddAttendee { new }, now)? {
        TransitionOutcome::AttendeeAdded { attendee_id } => Ok(AddAttendeeResponse {
            attendee_id,
            view: get_registration(store),
        }),
        other => Err(ApiError::Internal {
            message: format!("Unexpected outcome when adding an attendee: {other:?}"),
        }),
    }
}

/// Adds the primary attendee if the registration has none.
///
/// # Errors
///
/// Returns a rule violation if no registration type has been chosen.
pub fn add_primary_attendee<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    now: Instant,
) -> Result<RegistrationView, ApiError> {
    dispatch(store, Command::AddPrimaryAttendee, now)?;
    Ok(get_registration(store))
}

/// Updates an attendee's fields or ticket.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown attendee, or `InvalidInput`
/// for malformed fields.
pub fn update_attendee<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    attendee_id: &str,
    request: AttendeeFieldsRequest,
    now: Instant,
) -> Result<RegistrationView, ApiError> {
    let attendee_id: AttendeeId = AttendeeId::new(attendee_id);
    find_attendee(store.state(), &attendee_id)?;
    let patch = request.into_patch()?;

    dispatch(store, Command::UpdateAttendee { attendee_id, patch }, now)?;
    Ok(get_registration(store))
}

/// Removes an attendee and every partner accompanying them.
///
/// The primary attendee cannot be removed.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown attendee, or a rule violation
/// for the primary attendee.
pub fn remove_attendee<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    attendee_id: &str,
    now: Instant,
) -> Result<RemoveAttendeeResponse, ApiError> {
    let attendee_id: AttendeeId = AttendeeId::new(attendee_id);
    if find_attendee(store.state(), &attendee_id)?.is_primary {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("primary_attendee_protected"),
            message: String::from("The primary attendee cannot be removed"),
        });
    }

    let removed_attendee_ids: Vec<AttendeeId> =
        match dispatch(store, Command::RemoveAttendee { attendee_id }, now)? {
            TransitionOutcome::AttendeesRemoved { attendee_ids } => attendee_ids,
            _ => Vec::new(),
        };
    Ok(RemoveAttendeeResponse {
        removed_attendee_ids,
        view: get_registration(store),
    })
}

/// Replaces the billing details.
///
/// The details are validated when paying, not here, so a half-filled form
/// can still be saved.
///
/// # Errors
///
/// Returns an error if the update command fails.
pub fn update_billing_details<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    details: BillingDetails,
    now: Instant,
) -> Result<RegistrationView, ApiError> {
    dispatch(store, Command::UpdateBillingDetails { details }, now)?;
    Ok(get_registration(store))
}

/// Sets whether the terms were accepted.
///
/// # Errors
///
/// Returns an error if the update command fails.
pub fn set_agree_to_terms<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    request: SetAgreeToTermsRequest,
    now: Instant,
) -> Result<RegistrationView, ApiError> {
    dispatch(store, Command::SetAgreeToTerms { agree: request.agree }, now)?;
    Ok(get_registration(store))
}

/// Moves through the step flow.
///
/// `Next` is refused while the current step has problems. `GoTo` is
/// refused for steps that are not available, and for the confirmation,
/// which only a completed payment reaches. Once the registration is
/// confirmed the flow is closed. Entering the attendee details step of an
/// empty registration adds the primary attendee.
///
/// # Errors
///
/// Returns `ValidationFailed`, `StepUnavailable`, or `InvalidInput` for a
/// step number outside 1 to 6.
pub fn advance<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    navigation: Navigation,
    now: Instant,
) -> Result<StepChangeResponse, ApiError> {
    let registration: &Registration = store.state();
    let current: Step = registration.step;

    if current == Step::Confirmation {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("registration_complete"),
            message: String::from("This registration is complete. Start a new one instead."),
        });
    }

    let command: Command = match navigation {
        Navigation::Next => {
            let errors: Vec<String> = step_requirement_errors(registration, current);
            if !errors.is_empty() {
                debug!(step = %current, errors = errors.len(), "Refusing to advance");
                return Err(ApiError::ValidationFailed {
                    step: current,
                    errors,
                });
            }
            Command::NextStep
        }
        Navigation::Prev => Command::PrevStep,
        Navigation::GoTo(number) => {
            let step: Step = Step::from_number(number)
                .ok_or_else(|| translate_domain_error(DomainError::InvalidStep(number)))?;
            if !is_step_available(registration, step) {
                return Err(ApiError::StepUnavailable { step });
            }
            if step == Step::Confirmation {
                debug!(step = %current, "Refusing to skip payment");
                return Err(ApiError::ValidationFailed {
                    step: current,
                    errors: vec![String::from(PAYMENT_REQUIRED)],
                });
            }
            Command::GoToStep {
                step: i32::from(number),
            }
        }
    };

    let TransitionOutcome::StepChanged {
        from,
        to,
        scroll_to_top,
    } = dispatch(store, command, now)?
    else {
        return Err(ApiError::Internal {
            message: String::from("Navigation did not change step"),
        });
    };

    if to == Step::AttendeeDetails && store.state().attendees.is_empty() {
        dispatch(store, Command::AddPrimaryAttendee, now)?;
    }

    Ok(StepChangeResponse {
        from,
        to,
        scroll_to_top,
        view: get_registration(store),
    })
}

/// Lists published events.
///
/// # Errors
///
/// Returns an error if the record store query fails.
pub fn list_events(
    persistence: &mut Persistence,
    request: ListEventsRequest,
) -> Result<Vec<Event>, ApiError> {
    persistence
        .list_events(request.limit, request.offset)
        .map_err(translate_persistence_error)
}

/// Lists active packages.
///
/// # Errors
///
/// Returns an error if the record store query fails.
pub fn list_packages(persistence: &mut Persistence) -> Result<Vec<Package>, ApiError> {
    persistence
        .list_packages()
        .map_err(translate_persistence_error)
}

/// Lists active ticket definitions, optionally for one event.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown event.
pub fn list_ticket_definitions(
    persistence: &mut Persistence,
    event_id: Option<&str>,
) -> Result<Vec<TicketDefinition>, ApiError> {
    if let Some(event_id) = event_id {
        persistence
            .get_event(event_id)
            .map_err(translate_persistence_error)?;
    }
    persistence
        .list_ticket_definitions(event_id)
        .map_err(translate_persistence_error)
}

fn bypass_state<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    now: OffsetDateTime,
) -> Result<BypassReservationResponse, ApiError> {
    Ok(BypassReservationResponse {
        reservation: store.bypass_reservation()?,
        redirect_on_expiry: store.should_redirect_on_expiry(now),
    })
}

/// Fabricates a bypass reservation for the given tickets.
///
/// # Errors
///
/// Returns `InvalidInput` when no tickets are named, or an error if the
/// local store cannot be written.
pub fn create_bypass_reservation<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    request: CreateBypassReservationRequest,
    now: OffsetDateTime,
) -> Result<BypassReservationResponse, ApiError> {
    if request.ticket_ids.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("ticketIds"),
            message: String::from("At least one ticket is required"),
        });
    }
    store.create_bypass_reservation(request.ticket_ids, now)?;
    bypass_state(store, now)
}

/// Reads the bypass reservation and whether its expiry should redirect.
///
/// # Errors
///
/// Returns an error if the local store fails.
pub fn get_bypass_reservation<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    now: OffsetDateTime,
) -> Result<BypassReservationResponse, ApiError> {
    bypass_state(store, now)
}

/// Removes the bypass reservation and its flags.
///
/// # Errors
///
/// Returns an error if the local store fails.
pub fn clear_bypass_reservation<S: KeyValueStore, G: IdGenerator>(
    store: &mut RegistrationStore<S, G>,
    now: OffsetDateTime,
) -> Result<BypassReservationResponse, ApiError> {
    store.clear_bypass_reservation()?;
    bypass_state(store, now)
}
