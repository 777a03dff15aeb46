// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

/// Default quiet period before a draft save is written.
pub const DEFAULT_SAVE_DEBOUNCE: Duration = Duration::from_millis(250);

/// Default lifetime of a bypass reservation.
pub const DEFAULT_BYPASS_EXPIRY: time::Duration = time::Duration::days(3);

/// Settings for a `RegistrationStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Quiet period before a pending draft save is written.
    pub save_debounce: Duration,
    /// Lifetime of a bypass reservation.
    pub bypass_expiry: time::Duration,
}

impl StoreConfig {
    /// Creates a configuration.
    #[must_use]
    pub const fn new(save_debounce: Duration, bypass_expiry: time::Duration) -> Self {
        Self {
            save_debounce,
            bypass_expiry,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DEBOUNCE, DEFAULT_BYPASS_EXPIRY)
    }
}
