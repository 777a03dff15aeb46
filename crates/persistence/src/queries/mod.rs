// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! - `catalog`: events, ticket definitions and packages
//! - `kv`: local store entries
//! - `registrations`: recorded registrations with attendees and tickets

pub mod catalog;
pub mod kv;
pub mod registrations;
