// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `catalog`: event, ticket definition and package inserts
//! - `kv`: local store upserts and removals
//! - `registrations`: recording a paid registration

pub mod catalog;
pub mod kv;
pub mod registrations;
