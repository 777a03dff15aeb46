// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft snapshots in the local key-value store.
//!
//! ## Key layout
//!
//! - `registration-draft:{type}:{draftId}`: the snapshot envelope
//! - `registration-draft-index`: registration type to draft ids, oldest first
//! - `registration-last-draft-id` and `registration-last-type`: the most
//!   recently saved draft
//!
//! Index entries are appended on save and removed only by `delete_draft`.

use crate::kv::KeyValueStore;
use crate::migration::upgrade_draft;
use crate::state::{DraftId, Registration};
use proclamation_domain::{AttendeeRecord, BillingDetails, RegistrationType, Step};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Prefix of every snapshot key.
pub const DRAFT_KEY_PREFIX: &str = "registration-draft";

/// Key of the draft index.
pub const DRAFT_INDEX_KEY: &str = "registration-draft-index";

/// Key of the most recently saved draft id.
pub const LAST_DRAFT_ID_KEY: &str = "registration-last-draft-id";

/// Key of the most recently saved registration type.
pub const LAST_TYPE_KEY: &str = "registration-last-type";

/// Schema version written by this crate.
pub const CURRENT_SCHEMA_VERSION: u64 = 3;

/// Errors raised while reading or writing drafts.
#[derive(Debug, Error)]
pub enum DraftStoreError {
    #[error("Local store failure: {0}")]
    Store(String),
    #[error("Malformed draft payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Unsupported draft schema version {0}")]
    UnsupportedVersion(u64),
    #[error("Invalid stored value for '{key}': {value}")]
    InvalidValue { key: String, value: String },
    #[error("Registration has no draft id or registration type")]
    NotADraft,
}

fn store_error(err: impl std::error::Error) -> DraftStoreError {
    DraftStoreError::Store(err.to_string())
}

/// Returns the snapshot key for a draft.
#[must_use]
pub fn draft_key(registration_type: RegistrationType, draft_id: &DraftId) -> String {
    format!("{DRAFT_KEY_PREFIX}:{registration_type}:{draft_id}")
}

/// Persisted envelope of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub schema_version: u64,
    pub draft_id: DraftId,
    pub registration_type: RegistrationType,
    #[serde(default)]
    pub attendees: Vec<AttendeeRecord>,
    #[serde(default)]
    pub billing_details: Option<BillingDetails>,
    #[serde(default)]
    pub agree_to_terms: bool,
    #[serde(default)]
    pub step: Step,
    #[serde(default)]
    pub furthest_step: Step,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub saved_at: Option<OffsetDateTime>,
}

impl DraftSnapshot {
    /// Captures a registration for saving.
    ///
    /// # Errors
    ///
    /// Returns `DraftStoreError::NotADraft` if the registration has no draft
    /// id or registration type yet.
    pub fn from_registration(
        registration: &Registration,
        saved_at: OffsetDateTime,
    ) -> Result<Self, DraftStoreError> {
        let (Some(draft_id), Some(registration_type)) =
            (&registration.draft_id, registration.registration_type)
        else {
            return Err(DraftStoreError::NotADraft);
        };

        Ok(Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            draft_id: draft_id.clone(),
            registration_type,
            attendees: registration.attendees.clone(),
            billing_details: registration.billing_details.clone(),
            agree_to_terms: registration.agree_to_terms,
            step: registration.step,
            furthest_step: registration.furthest_step,
            saved_at: Some(saved_at),
        })
    }

    /// Rebuilds the registration held by this snapshot.
    #[must_use]
    pub fn into_registration(self) -> Registration {
        Registration {
            draft_id: Some(self.draft_id),
            registration_type: Some(self.registration_type),
            attendees: self.attendees,
            billing_details: self.billing_details,
            agree_to_terms: self.agree_to_terms,
            step: self.step,
            furthest_step: self.furthest_step.max(self.step),
        }
    }
}

/// Registration type to draft ids, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftIndex(BTreeMap<String, Vec<DraftId>>);

impl DraftIndex {
    /// Returns the draft ids recorded for a type.
    #[must_use]
    pub fn drafts_for(&self, registration_type: RegistrationType) -> &[DraftId] {
        self.0
            .get(registration_type.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends a draft id unless it is already listed.
    ///
    /// Returns whether the index changed.
    pub fn insert(&mut self, registration_type: RegistrationType, draft_id: &DraftId) -> bool {
        let ids: &mut Vec<DraftId> = self
            .0
            .entry(registration_type.as_str().to_string())
            .or_default();
        if ids.contains(draft_id) {
            return false;
        }
        ids.push(draft_id.clone());
        true
    }

    /// Removes a draft id. Returns whether the index changed.
    pub fn remove(&mut self, registration_type: RegistrationType, draft_id: &DraftId) -> bool {
        let Some(ids) = self.0.get_mut(registration_type.as_str()) else {
            return false;
        };
        let before: usize = ids.len();
        ids.retain(|id| id != draft_id);
        before != ids.len()
    }
}

/// Reads and writes draft snapshots through a `KeyValueStore`.
#[derive(Debug)]
pub struct DraftStorage<S> {
    store: S,
}

impl<S: KeyValueStore> DraftStorage<S> {
    /// Wraps a key-value store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the underlying store mutably.
    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Reads the draft index. A missing index is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the index is not valid JSON.
    pub fn read_index(&mut self) -> Result<DraftIndex, DraftStoreError> {
        match self.store.get(DRAFT_INDEX_KEY).map_err(store_error)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(DraftIndex::default()),
        }
    }

    fn write_index(&mut self, index: &DraftIndex) -> Result<(), DraftStoreError> {
        let text: String = serde_json::to_string(index)?;
        self.store
            .set(DRAFT_INDEX_KEY, &text)
            .map_err(store_error)
    }

    /// Writes a snapshot, records it in the index and marks it as the most
    /// recent draft.
    ///
    /// # Errors
    ///
    /// Returns an error if any store write fails.
    pub fn save(&mut self, snapshot: &DraftSnapshot) -> Result<(), DraftStoreError> {
        let key: String = draft_key(snapshot.registration_type, &snapshot.draft_id);
        let text: String = serde_json::to_string(snapshot)?;
        self.store.set(&key, &text).map_err(store_error)?;

        let mut index: DraftIndex = self.read_index()?;
        if index.insert(snapshot.registration_type, &snapshot.draft_id) {
            self.write_index(&index)?;
        }

        self.store
            .set(LAST_DRAFT_ID_KEY, snapshot.draft_id.value())
            .map_err(store_error)?;
        self.store
            .set(LAST_TYPE_KEY, snapshot.registration_type.as_str())
            .map_err(store_error)?;

        debug!(key = %key, attendees = snapshot.attendees.len(), "Saved draft");
        Ok(())
    }

    /// Loads one draft, upgrading older schema versions.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the payload cannot be decoded.
    pub fn load(
        &mut self,
        registration_type: RegistrationType,
        draft_id: &DraftId,
    ) -> Result<Option<Registration>, DraftStoreError> {
        let key: String = draft_key(registration_type, draft_id);
        let Some(text) = self.store.get(&key).map_err(store_error)? else {
            return Ok(None);
        };

        let mut raw: Value = serde_json::from_str(&text)?;
        if let Value::Object(fields) = &mut raw {
            fields
                .entry("draftId")
                .or_insert_with(|| Value::from(draft_id.value()));
            fields
                .entry("registrationType")
                .or_insert_with(|| Value::from(registration_type.as_str()));
        }

        let snapshot: DraftSnapshot = upgrade_draft(raw)?;
        debug!(key = %key, "Loaded draft");
        Ok(Some(snapshot.into_registration()))
    }

    /// Loads the newest readable draft recorded for a type.
    ///
    /// Index entries whose snapshot is missing or unreadable are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the index cannot be read.
    pub fn load_for_type(
        &mut self,
        registration_type: RegistrationType,
    ) -> Result<Option<Registration>, DraftStoreError> {
        let index: DraftIndex = self.read_index()?;
        for draft_id in index.drafts_for(registration_type).iter().rev() {
            match self.load(registration_type, draft_id) {
                Ok(Some(registration)) => return Ok(Some(registration)),
                Ok(None) => debug!(%draft_id, "Skipping indexed draft with no snapshot"),
                Err(e) => warn!(%draft_id, error = %e, "Skipping unreadable draft"),
            }
        }
        Ok(None)
    }

    /// Loads the most recently saved draft of any type.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored values are invalid.
    pub fn load_last(&mut self) -> Result<Option<Registration>, DraftStoreError> {
        let draft_id: Option<String> = self.store.get(LAST_DRAFT_ID_KEY).map_err(store_error)?;
        let registration_type: Option<String> =
            self.store.get(LAST_TYPE_KEY).map_err(store_error)?;
        let (Some(draft_id), Some(registration_type)) = (draft_id, registration_type) else {
            return Ok(None);
        };

        let registration_type: RegistrationType =
            registration_type
                .parse()
                .map_err(|_| DraftStoreError::InvalidValue {
                    key: LAST_TYPE_KEY.to_string(),
                    value: registration_type.clone(),
                })?;
        self.load(registration_type, &DraftId::new(draft_id))
    }

    /// Removes a draft snapshot and its index entry.
    ///
    /// The most-recent pointers are cleared too when they name this draft.
    ///
    /// # Errors
    ///
    /// Returns an error if any store operation fails.
    pub fn delete_draft(
        &mut self,
        registration_type: RegistrationType,
        draft_id: &DraftId,
    ) -> Result<(), DraftStoreError> {
        self.store
            .remove(&draft_key(registration_type, draft_id))
            .map_err(store_error)?;

        let mut index: DraftIndex = self.read_index()?;
        if index.remove(registration_type, draft_id) {
            self.write_index(&index)?;
        }

        let last: Option<String> = self.store.get(LAST_DRAFT_ID_KEY).map_err(store_error)?;
        if last.as_deref() == Some(draft_id.value()) {
            self.forget_last()?;
        }

        debug!(%draft_id, %registration_type, "Deleted draft");
        Ok(())
    }

    /// Clears the most-recent draft pointers.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn forget_last(&mut self) -> Result<(), DraftStoreError> {
        self.store.remove(LAST_DRAFT_ID_KEY).map_err(store_error)?;
        self.store.remove(LAST_TYPE_KEY).map_err(store_error)
    }
}
