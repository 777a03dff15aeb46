// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply::apply;
use crate::command::Command;
use crate::config::StoreConfig;
use crate::drafts::{DraftSnapshot, DraftStorage, DraftStoreError};
use crate::error::CoreError;
use crate::ids::{IdGenerator, RandomIdGenerator};
use crate::kv::KeyValueStore;
use crate::recovery::{RecoveryChoice, RecoveryPrompt, TypeSelection, is_meaningful_draft};
use crate::reservation::{
    BypassReservation, active_bypass_reservation, clear_bypass_reservation,
    create_bypass_reservation, should_redirect_on_expiry,
};
use crate::save_queue::SaveQueue;
use crate::state::{DraftId, Registration, TransitionOutcome, TransitionResult};
use proclamation_domain::{RegistrationType, Step};
use std::time::Instant;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// The single owner of the in-progress registration.
///
/// Commands go through `dispatch`, which applies them and queues a draft
/// save. Saves are written by `flush_due` once the debounce period has
/// passed, or immediately by `flush`. A pending save is written before the
/// store moves to another draft or clears. Draft storage failures are logged and
/// never returned to the caller.
#[derive(Debug)]
pub struct RegistrationStore<S, G = RandomIdGenerator> {
    state: Registration,
    drafts: DraftStorage<S>,
    queue: SaveQueue,
    ids: G,
    config: StoreConfig,
    pending_recovery: Option<Registration>,
}

impl<S: KeyValueStore> RegistrationStore<S, RandomIdGenerator> {
    /// Creates a store with an empty registration.
    pub const fn new(store: S, config: StoreConfig) -> Self {
        Self::with_id_generator(store, config, RandomIdGenerator)
    }
}

impl<S: KeyValueStore, G: IdGenerator> RegistrationStore<S, G> {
    /// Creates a store that draws ids from `ids`.
    pub const fn with_id_generator(store: S, config: StoreConfig, ids: G) -> Self {
        Self {
            state: Registration::new(),
            drafts: DraftStorage::new(store),
            queue: SaveQueue::new(config.save_debounce),
            ids,
            config,
            pending_recovery: None,
        }
    }

    /// Returns the current registration.
    pub const fn state(&self) -> &Registration {
        &self.state
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the draft storage.
    pub const fn drafts(&self) -> &DraftStorage<S> {
        &self.drafts
    }

    /// Returns the draft storage mutably.
    pub const fn drafts_mut(&mut self) -> &mut DraftStorage<S> {
        &mut self.drafts
    }

    /// Resumes a saved draft, if one can be found.
    ///
    /// A draft of `requested_type` is preferred; otherwise the most recently
    /// saved draft is used. Returns whether a draft was loaded.
    pub fn initialize(&mut self, requested_type: Option<RegistrationType>) -> bool {
        let mut loaded: Option<Registration> = None;

        if let Some(registration_type) = requested_type {
            loaded = self
                .drafts
                .load_for_type(registration_type)
                .unwrap_or_else(|e| {
                    warn!(error = %e, %registration_type, "Could not load draft for type");
                    None
                });
        }
        if loaded.is_none() {
            loaded = self.drafts.load_last().unwrap_or_else(|e| {
                warn!(error = %e, "Could not load last draft");
                None
            });
        }

        match loaded {
            Some(registration) => {
                info!(
                    draft_id = ?registration.draft_id,
                    attendees = registration.attendees.len(),
                    "Resumed draft"
                );
                self.state = registration;
                true
            }
            None => false,
        }
    }

    /// Applies a command and queues a draft save for any mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the command is invalid. The state is unchanged
    /// in that case.
    pub fn dispatch(
        &mut self,
        command: Command,
        now: Instant,
    ) -> Result<TransitionOutcome, CoreError> {
        let result: TransitionResult = apply(&self.state, command, &mut self.ids)?;
        self.state = result.new_state;

        match &result.outcome {
            TransitionOutcome::Cleared => {
                self.flush();
                self.pending_recovery = None;
                if let Err(e) = self.drafts.forget_last() {
                    warn!(error = %e, "Could not clear last draft pointers");
                }
            }
            outcome if outcome.is_mutation() => self.queue_save(now),
            _ => {}
        }

        Ok(result.outcome)
    }

    /// Queues a save of the current state.
    ///
    /// A pending save for a different draft is written first so switching
    /// drafts never drops it.
    fn queue_save(&mut self, now: Instant) {
        if self
            .queue
            .pending_draft_id()
            .is_some_and(|pending| Some(pending) != self.state.draft_id.as_ref())
        {
            debug!("Writing pending save of the previous draft");
            self.flush();
        }
        self.queue.schedule(self.state.clone(), now);
    }

    /// Returns whether a draft save is waiting to be written.
    pub const fn has_pending_save(&self) -> bool {
        self.queue.is_dirty()
    }

    /// Returns when the pending save becomes due.
    pub fn next_save_deadline(&self) -> Option<Instant> {
        self.queue.deadline()
    }

    /// Writes the pending save if its deadline has passed.
    ///
    /// Returns whether a snapshot was written.
    pub fn flush_due(&mut self, now: Instant) -> bool {
        match self.queue.take_due(now) {
            Some(registration) => self.write_snapshot(&registration),
            None => false,
        }
    }

    /// Writes the pending save immediately.
    ///
    /// Returns whether a snapshot was written.
    pub fn flush(&mut self) -> bool {
        match self.queue.take() {
            Some(registration) => self.write_snapshot(&registration),
            None => false,
        }
    }

    fn write_snapshot(&mut self, registration: &Registration) -> bool {
        let result: Result<(), DraftStoreError> =
            DraftSnapshot::from_registration(registration, OffsetDateTime::now_utc())
                .and_then(|snapshot| self.drafts.save(&snapshot));
        match result {
            Ok(()) => true,
            Err(DraftStoreError::NotADraft) => {
                debug!("Skipping save of a registration without a draft");
                false
            }
            Err(e) => {
                warn!(error = %e, "Dropping draft save");
                false
            }
        }
    }

    /// Handles the user choosing a registration type.
    ///
    /// If a meaningful draft of that type exists, in memory or in storage,
    /// it is held aside and a prompt is returned. Otherwise a new draft is
    /// started.
    ///
    /// # Errors
    ///
    /// Returns an error if starting the new draft fails.
    pub fn select_registration_type(
        &mut self,
        registration_type: RegistrationType,
        now: Instant,
    ) -> Result<TypeSelection, CoreError> {
        let candidate: Option<Registration> =
            if self.state.registration_type == Some(registration_type) {
                Some(self.state.clone())
            } else {
                self.drafts
                    .load_for_type(registration_type)
                    .unwrap_or_else(|e| {
                        warn!(error = %e, %registration_type, "Could not look up existing draft");
                        None
                    })
            };

        if let Some(existing) = candidate.filter(is_meaningful_draft)
            && let Some(draft_id) = existing.draft_id.clone()
        {
            debug!(%draft_id, "Offering draft recovery");
            let prompt: RecoveryPrompt =
                RecoveryPrompt::for_draft(&existing, draft_id, registration_type);
            self.pending_recovery = Some(existing);
            return Ok(TypeSelection::RecoveryPrompt(prompt));
        }

        self.start_new(registration_type, now)
    }

    /// Returns the draft awaiting a recovery choice.
    pub const fn pending_recovery(&self) -> Option<&Registration> {
        self.pending_recovery.as_ref()
    }

    /// Applies the user's answer to a recovery prompt.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NoRecoveryPending` if no prompt is open.
    pub fn resolve_recovery(
        &mut self,
        choice: RecoveryChoice,
        now: Instant,
    ) -> Result<TypeSelection, CoreError> {
        let draft: Registration = self
            .pending_recovery
            .take()
            .ok_or(CoreError::NoRecoveryPending)?;
        self.flush();
        let (Some(draft_id), Some(registration_type)) =
            (draft.draft_id.clone(), draft.registration_type)
        else {
            return Err(CoreError::NoRecoveryPending);
        };

        match choice {
            RecoveryChoice::Continue | RecoveryChoice::EditAttendees => {
                let step: Step = if choice == RecoveryChoice::EditAttendees {
                    Step::AttendeeDetails
                } else {
                    draft.step.max(Step::AttendeeDetails)
                };
                info!(%draft_id, %step, choice = choice.as_str(), "Resuming draft");

                self.state = Registration {
                    step,
                    furthest_step: draft.furthest_step.max(step),
                    ..draft
                };
                self.queue_save(now);
                Ok(TypeSelection::Resumed { draft_id, step })
            }
            RecoveryChoice::StartNew => {
                info!(%draft_id, "Discarding draft for a new registration");
                if let Err(e) = self.drafts.delete_draft(registration_type, &draft_id) {
                    warn!(error = %e, %draft_id, "Could not delete discarded draft");
                }
                self.start_new(registration_type, now)
            }
        }
    }

    fn start_new(
        &mut self,
        registration_type: RegistrationType,
        now: Instant,
    ) -> Result<TypeSelection, CoreError> {
        match self.dispatch(Command::StartNewRegistration { registration_type }, now)? {
            TransitionOutcome::DraftStarted { draft_id } => {
                info!(%draft_id, %registration_type, "Started registration");
                Ok(TypeSelection::Started { draft_id })
            }
            _ => Err(CoreError::RegistrationTypeNotSelected),
        }
    }

    /// Removes the current draft from storage and drops any pending save.
    ///
    /// The in-memory registration is kept.
    pub fn delete_current_draft(&mut self) {
        self.queue.cancel();
        let (Some(draft_id), Some(registration_type)) =
            (self.state.draft_id.clone(), self.state.registration_type)
        else {
            return;
        };
        if let Err(e) = self.drafts.delete_draft(registration_type, &draft_id) {
            warn!(error = %e, %draft_id, "Could not delete draft");
        }
    }

    /// Moves to the confirmation step and deletes the draft.
    ///
    /// Called once payment has been approved and the registration recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the step transition fails.
    pub fn complete_registration(&mut self, now: Instant) -> Result<DraftId, CoreError> {
        let draft_id: DraftId = self
            .state
            .draft_id
            .clone()
            .ok_or(CoreError::RegistrationTypeNotSelected)?;
        self.dispatch(
            Command::GoToStep {
                step: i32::from(Step::Confirmation.number()),
            },
            now,
        )?;
        self.delete_current_draft();
        info!(%draft_id, "Registration completed");
        Ok(draft_id)
    }

    /// Fabricates a bypass reservation for the given tickets.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be written.
    pub fn create_bypass_reservation(
        &mut self,
        ticket_ids: Vec<String>,
        now: OffsetDateTime,
    ) -> Result<BypassReservation, DraftStoreError> {
        let expiry: time::Duration = self.config.bypass_expiry;
        create_bypass_reservation(self.drafts.store_mut(), ticket_ids, now, expiry)
    }

    /// Reads the active bypass reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store fails or holds a malformed
    /// reservation.
    pub fn bypass_reservation(&mut self) -> Result<Option<BypassReservation>, DraftStoreError> {
        active_bypass_reservation(self.drafts.store_mut())
    }

    /// Returns whether an expired hold should redirect the UI.
    pub fn should_redirect_on_expiry(&mut self, now: OffsetDateTime) -> bool {
        should_redirect_on_expiry(self.drafts.store_mut(), now)
    }

    /// Removes the bypass reservation and its flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the local store cannot be written.
    pub fn clear_bypass_reservation(&mut self) -> Result<(), DraftStoreError> {
        clear_bypass_reservation(self.drafts.store_mut())
    }
}
