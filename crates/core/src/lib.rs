// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod config;
mod drafts;
mod error;
mod flow;
mod ids;
mod kv;
mod migration;
mod recovery;
mod reservation;
mod save_queue;
mod state;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use config::{DEFAULT_BYPASS_EXPIRY, DEFAULT_SAVE_DEBOUNCE, StoreConfig};
pub use drafts::{
    CURRENT_SCHEMA_VERSION, DRAFT_INDEX_KEY, DRAFT_KEY_PREFIX, DraftIndex, DraftSnapshot,
    DraftStorage, DraftStoreError, LAST_DRAFT_ID_KEY, LAST_TYPE_KEY, draft_key,
};
pub use error::CoreError;
pub use flow::{
    NO_PRIMARY_ATTENDEE, NO_REGISTRATION_TYPE, PAYMENT_REQUIRED, available_steps,
    completed_steps, guard_route, is_step_available, is_step_complete, step_requirement_errors,
};
pub use ids::{IdGenerator, RandomIdGenerator, SequentialIdGenerator};
pub use kv::{InMemoryKeyValueStore, KeyValueStore};
pub use migration::{detect_schema_version, migrate_draft_to_unified_attendees, upgrade_draft};
pub use recovery::{RecoveryChoice, RecoveryPrompt, TypeSelection, is_meaningful_draft};
pub use reservation::{
    BYPASS_ACTIVE_KEY, BYPASS_RESERVATION_KEY, BypassReservation, SUPPRESS_EXPIRY_REDIRECT_KEY,
    active_bypass_reservation, clear_bypass_reservation, create_bypass_reservation,
    should_redirect_on_expiry,
};
pub use save_queue::SaveQueue;
pub use state::{DraftId, Registration, TransitionOutcome, TransitionResult};
pub use store::RegistrationStore;
