// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-attendee ticket selection.
//!
//! An attendee either holds one bundled package or a set of individually
//! chosen ticket definitions, never both. `SelectionRecord` keeps its state
//! private so the only values that can exist are produced by the
//! constructors below or by `apply`.
//!
//! ## States
//!
//! - `Empty`: nothing selected
//! - `PackageSelected`: one package id
//! - `IndividualSelected`: a non-empty ordered set of ticket definition ids

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// The observable state of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    Empty,
    PackageSelected,
    IndividualSelected,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Selection {
    #[default]
    Empty,
    Package(String),
    Events(Vec<String>),
}

/// A requested change to an attendee's selection.
///
/// Setting the package (even to `None`) clears the individual events, and
/// setting the events clears the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    /// Select a package, or clear the selection with `None`.
    Package(Option<String>),
    /// Select individual ticket definitions.
    Events(Vec<String>),
}

/// Ticketing choice for one attendee.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SelectionWire", into = "SelectionWire")]
pub struct SelectionRecord {
    inner: Selection,
}

impl SelectionRecord {
    /// An empty selection.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            inner: Selection::Empty,
        }
    }

    /// A package selection. An empty id yields an empty selection.
    #[must_use]
    pub fn package(ticket_definition_id: impl Into<String>) -> Self {
        let id: String = ticket_definition_id.into();
        if id.trim().is_empty() {
            return Self::empty();
        }
        Self {
            inner: Selection::Package(id),
        }
    }

    /// An individual selection.
    ///
    /// Duplicate and blank ids are dropped, keeping the first occurrence.
    /// An empty list yields an empty selection.
    #[must_use]
    pub fn events<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for id in ids {
            let id: String = id.into();
            if !id.trim().is_empty() && !selected.contains(&id) {
                selected.push(id);
            }
        }
        if selected.is_empty() {
            return Self::empty();
        }
        Self {
            inner: Selection::Events(selected),
        }
    }

    /// Builds a selection from two possibly conflicting sources.
    ///
    /// The package wins when both are populated. Used when reading records
    /// that predate the exclusivity rule.
    #[must_use]
    pub fn reconcile(ticket_definition_id: Option<String>, selected_events: Vec<String>) -> Self {
        match ticket_definition_id {
            Some(id) if !id.trim().is_empty() => Self::package(id),
            _ => Self::events(selected_events),
        }
    }

    /// Returns the selection that results from applying `change`.
    #[must_use]
    pub fn apply(&self, change: SelectionChange) -> Self {
        match change {
            SelectionChange::Package(Some(id)) => Self::package(id),
            SelectionChange::Package(None) => Self::empty(),
            SelectionChange::Events(ids) => Self::events(ids),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> SelectionState {
        match &self.inner {
            Selection::Empty => SelectionState::Empty,
            Selection::Package(_) => SelectionState::PackageSelected,
            Selection::Events(_) => SelectionState::IndividualSelected,
        }
    }

    /// Returns whether exactly one kind of selection is present.
    #[must_use]
    pub const fn has_ticket(&self) -> bool {
        !matches!(self.inner, Selection::Empty)
    }

    /// Returns the selected package id, if any.
    #[must_use]
    pub fn ticket_definition_id(&self) -> Option<&str> {
        match &self.inner {
            Selection::Package(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the individually selected ticket definition ids.
    #[must_use]
    pub fn selected_events(&self) -> &[String] {
        match &self.inner {
            Selection::Events(ids) => ids,
            _ => &[],
        }
    }
}

/// Wire shape of a selection: `{ticketDefinitionId, selectedEvents}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionWire {
    #[serde(default)]
    ticket_definition_id: Option<String>,
    #[serde(default)]
    selected_events: Vec<String>,
}

impl TryFrom<SelectionWire> for SelectionRecord {
    type Error = DomainError;

    fn try_from(wire: SelectionWire) -> Result<Self, Self::Error> {
        let has_package: bool = wire
            .ticket_definition_id
            .as_ref()
            .is_some_and(|id| !id.trim().is_empty());
        if has_package && !wire.selected_events.is_empty() {
            return Err(DomainError::ConflictingSelection);
        }
        Ok(Self::reconcile(
            wire.ticket_definition_id,
            wire.selected_events,
        ))
    }
}

impl From<SelectionRecord> for SelectionWire {
    fn from(record: SelectionRecord) -> Self {
        match record.inner {
            Selection::Empty => Self::default(),
            Selection::Package(id) => Self {
                ticket_definition_id: Some(id),
                selected_events: Vec::new(),
            },
            Selection::Events(ids) => Self {
                ticket_definition_id: None,
                selected_events: ids,
            },
        }
    }
}
