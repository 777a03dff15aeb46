// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::ids::IdGenerator;
use crate::state::{DraftId, Registration, TransitionOutcome, TransitionResult};
use proclamation_domain::{
    AttendeeId, AttendeeRecord, DomainError, NewAttendee, RegistrationType, Step,
    validate_partner_reference,
};
use tracing::{debug, warn};

/// Applies a command to the current registration, producing a new state.
///
/// This function is pure apart from drawing ids from `ids`. It performs no
/// persistence; callers decide whether the outcome warrants a draft save.
///
/// # Arguments
///
/// * `state` - The current registration (immutable)
/// * `command` - The command to apply
/// * `ids` - Source of new draft and attendee ids
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state and what changed
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - A partner references a missing attendee or another partner
/// - A generated attendee id is already in use
/// - A primary attendee is requested before a registration type is chosen
pub fn apply(
    state: &Registration,
    command: Command,
    ids: &mut impl IdGenerator,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::StartNewRegistration { registration_type } => {
            let draft_id: DraftId = ids.draft_id();
            debug!(%draft_id, %registration_type, "Starting new registration");

            let new_state: Registration = Registration {
                draft_id: Some(draft_id.clone()),
                registration_type: Some(registration_type),
                ..Registration::new()
            };
            Ok(TransitionResult {
                new_state,
                outcome: TransitionOutcome::DraftStarted { draft_id },
            })
        }
        Command::SetRegistrationType { registration_type } => {
            let mut new_state: Registration = state.clone();
            new_state.registration_type = Some(registration_type);
            Ok(updated(new_state))
        }
        Command::AddAttendee { new } => add_attendee(state, new, ids),
        Command::AddPrimaryAttendee => {
            if !state.attendees.is_empty() {
                return Ok(unchanged(state));
            }
            let registration_type: RegistrationType = state
                .registration_type
                .ok_or(CoreError::RegistrationTypeNotSelected)?;

            let new: NewAttendee = NewAttendee {
                is_primary: true,
                ..NewAttendee::of_type(registration_type.primary_attendee_type())
            };
            add_attendee(state, new, ids)
        }
        Command::UpdateAttendee { attendee_id, patch } => {
            let mut new_state: Registration = state.clone();
            let Some(attendee) = new_state
                .attendees
                .iter_mut()
                .find(|a| a.attendee_id == attendee_id)
            else {
                warn!(%attendee_id, "Ignoring update for unknown attendee");
                return Ok(unchanged(state));
            };
            attendee.apply_patch(patch);
            Ok(updated(new_state))
        }
        Command::RemoveAttendee { attendee_id } => {
            if state.attendee(&attendee_id).is_none() {
                warn!(%attendee_id, "Ignoring removal of unknown attendee");
                return Ok(unchanged(state));
            }

            let mut new_state: Registration = state.clone();
            let mut removed: Vec<AttendeeId> = vec![attendee_id.clone()];
            new_state.attendees.retain(|a| {
                if a.attendee_id == attendee_id {
                    return false;
                }
                if a.related_attendee_id() == Some(&attendee_id) {
                    removed.push(a.attendee_id.clone());
                    return false;
                }
                true
            });

            Ok(TransitionResult {
                new_state,
                outcome: TransitionOutcome::AttendeesRemoved {
                    attendee_ids: removed,
                },
            })
        }
        Command::UpdateBillingDetails { details } => {
            let mut new_state: Registration = state.clone();
            new_state.billing_details = Some(details);
            Ok(updated(new_state))
        }
        Command::SetAgreeToTerms { agree } => {
            let mut new_state: Registration = state.clone();
            new_state.agree_to_terms = agree;
            Ok(updated(new_state))
        }
        Command::ClearRegistration => Ok(TransitionResult {
            new_state: Registration::new(),
            outcome: TransitionOutcome::Cleared,
        }),
        Command::NextStep => Ok(move_to_step(state, state.step.next())),
        Command::PrevStep => Ok(move_to_step(state, state.step.prev())),
        Command::GoToStep { step } => Ok(move_to_step(state, Step::clamped(step))),
    }
}

fn add_attendee(
    state: &Registration,
    new: NewAttendee,
    ids: &mut impl IdGenerator,
) -> Result<TransitionResult, CoreError> {
    if let Some(related) = &new.related_attendee_id
        && new.attendee_type.is_partner()
    {
        validate_partner_reference(&state.attendees, related)?;
    }

    let attendee_id: AttendeeId = ids.attendee_id();
    if state.attendee(&attendee_id).is_some() {
        return Err(CoreError::DomainViolation(DomainError::DuplicateAttendeeId(
            attendee_id.value().to_string(),
        )));
    }

    let record: AttendeeRecord = AttendeeRecord::create(attendee_id.clone(), new)?;
    debug!(%attendee_id, attendee_type = %record.attendee_type(), "Adding attendee");

    let mut new_state: Registration = state.clone();
    new_state.attendees.push(record);
    Ok(TransitionResult {
        new_state,
        outcome: TransitionOutcome::AttendeeAdded { attendee_id },
    })
}

fn move_to_step(state: &Registration, to: Step) -> TransitionResult {
    let mut new_state: Registration = state.clone();
    new_state.step = to;
    new_state.furthest_step = new_state.furthest_step.max(to);
    TransitionResult {
        new_state,
        outcome: TransitionOutcome::StepChanged {
            from: state.step,
            to,
            scroll_to_top: true,
        },
    }
}

const fn updated(new_state: Registration) -> TransitionResult {
    TransitionResult {
        new_state,
        outcome: TransitionOutcome::Updated,
    }
}

fn unchanged(state: &Registration) -> TransitionResult {
    TransitionResult {
        new_state: state.clone(),
        outcome: TransitionOutcome::Unchanged,
    }
}
