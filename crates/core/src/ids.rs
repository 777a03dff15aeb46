// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::DraftId;
use proclamation_domain::AttendeeId;
use time::OffsetDateTime;

/// Source of new identifiers for drafts and attendees.
pub trait IdGenerator {
    /// Returns a fresh draft id.
    fn draft_id(&mut self) -> DraftId;

    /// Returns a fresh attendee id.
    fn attendee_id(&mut self) -> AttendeeId;
}

/// Generates ids from the current time and a random suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    fn timestamp_millis() -> i128 {
        OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
    }
}

impl IdGenerator for RandomIdGenerator {
    fn draft_id(&mut self) -> DraftId {
        let timestamp: i128 = Self::timestamp_millis();
        DraftId::new(format!("draft_{timestamp}_{:08x}", rand::random::<u32>()))
    }

    fn attendee_id(&mut self) -> AttendeeId {
        let timestamp: i128 = Self::timestamp_millis();
        AttendeeId::new(format!("attendee_{timestamp}_{:016x}", rand::random::<u64>()))
    }
}

/// Generates `draft-1`, `attendee-1`, ... in order.
///
/// Used where ids must be reproducible, such as tests.
#[derive(Debug, Clone, Default)]
pub struct SequentialIdGenerator {
    drafts: u64,
    attendees: u64,
}

impl SequentialIdGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            drafts: 0,
            attendees: 0,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn draft_id(&mut self) -> DraftId {
        self.drafts += 1;
        DraftId::new(format!("draft-{}", self.drafts))
    }

    fn attendee_id(&mut self) -> AttendeeId {
        self.attendees += 1;
        AttendeeId::new(format!("attendee-{}", self.attendees))
    }
}
