// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Development stand-in for ticket holds.
//!
//! A bypass reservation is fabricated locally so the ticket reservation UI
//! can be exercised without a reservation service. No inventory is
//! consulted and nothing is actually held.

use crate::drafts::DraftStoreError;
use crate::kv::KeyValueStore;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

/// Key holding the fabricated reservation.
pub const BYPASS_RESERVATION_KEY: &str = "reservation-bypass-data";

/// Flag set while a bypass reservation is active.
pub const BYPASS_ACTIVE_KEY: &str = "reservation-bypass-active";

/// Flag that suppresses the redirect normally triggered by an expired hold.
pub const SUPPRESS_EXPIRY_REDIRECT_KEY: &str = "reservation-suppress-expiry-redirect";

const FLAG_SET: &str = "true";

/// A fabricated reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BypassReservation {
    pub reservation_id: String,
    pub ticket_ids: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl BypassReservation {
    /// Returns whether the reservation has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now >= self.expires_at
    }
}

fn store_error(err: impl std::error::Error) -> DraftStoreError {
    DraftStoreError::Store(err.to_string())
}

/// Fabricates a reservation for `ticket_ids` and raises the bypass flags.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn create_bypass_reservation<S: KeyValueStore>(
    store: &mut S,
    ticket_ids: Vec<String>,
    now: OffsetDateTime,
    expiry: time::Duration,
) -> Result<BypassReservation, DraftStoreError> {
    let reservation: BypassReservation = BypassReservation {
        reservation_id: format!(
            "bypass_{}_{:08x}",
            now.unix_timestamp(),
            rand::random::<u32>()
        ),
        ticket_ids,
        created_at: now,
        expires_at: now + expiry,
    };

    let text: String = serde_json::to_string(&reservation)?;
    store
        .set(BYPASS_RESERVATION_KEY, &text)
        .map_err(store_error)?;
    store.set(BYPASS_ACTIVE_KEY, FLAG_SET).map_err(store_error)?;
    store
        .set(SUPPRESS_EXPIRY_REDIRECT_KEY, FLAG_SET)
        .map_err(store_error)?;

    warn!(
        reservation_id = %reservation.reservation_id,
        tickets = reservation.ticket_ids.len(),
        "Created bypass reservation; no tickets are actually held"
    );
    Ok(reservation)
}

/// Reads the active bypass reservation, if any.
///
/// # Errors
///
/// Returns an error if the store fails or the stored reservation is
/// malformed.
pub fn active_bypass_reservation<S: KeyValueStore>(
    store: &mut S,
) -> Result<Option<BypassReservation>, DraftStoreError> {
    if store.get(BYPASS_ACTIVE_KEY).map_err(store_error)?.as_deref() != Some(FLAG_SET) {
        return Ok(None);
    }
    match store.get(BYPASS_RESERVATION_KEY).map_err(store_error)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Returns whether the UI should leave the reservation flow because the
/// hold expired.
///
/// Always false while the suppress flag is set. Store failures are logged
/// and treated as "do not redirect".
#[must_use]
pub fn should_redirect_on_expiry<S: KeyValueStore>(store: &mut S, now: OffsetDateTime) -> bool {
    match store.get(SUPPRESS_EXPIRY_REDIRECT_KEY) {
        Ok(Some(flag)) if flag == FLAG_SET => return false,
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "Could not read expiry redirect flag");
            return false;
        }
    }

    match store.get(BYPASS_RESERVATION_KEY) {
        Ok(Some(text)) => serde_json::from_str::<BypassReservation>(&text)
            .map(|reservation| reservation.is_expired(now))
            .unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed bypass reservation");
                false
            }),
        Ok(None) => false,
        Err(e) => {
            warn!(error = %e, "Could not read bypass reservation");
            false
        }
    }
}

/// Removes the reservation and both bypass flags.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn clear_bypass_reservation<S: KeyValueStore>(store: &mut S) -> Result<(), DraftStoreError> {
    store.remove(BYPASS_RESERVATION_KEY).map_err(store_error)?;
    store.remove(BYPASS_ACTIVE_KEY).map_err(store_error)?;
    store
        .remove(SUPPRESS_EXPIRY_REDIRECT_KEY)
        .map_err(store_error)?;
    info!("Cleared bypass reservation");
    Ok(())
}
