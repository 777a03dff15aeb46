// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft schema versions and the upgrade chain between them.
//!
//! ## Versions
//!
//! 1. Separate `masons`, `ladyPartners`, `guests` and `guestPartners`
//!    arrays. Partners point at their Mason or guest by array position
//!    (`masonIndex`, `guestIndex`) or by id (`masonId`, `guestId`).
//! 2. A single `attendees` array of flat records, no version tag.
//! 3. The tagged envelope written by `DraftStorage`, adding
//!    `schemaVersion`, `furthestStep` and `savedAt`.
//!
//! Every upgrade step is total: unknown or missing fields are defaulted and
//! records that cannot be salvaged are dropped with a warning.

use crate::drafts::{CURRENT_SCHEMA_VERSION, DraftSnapshot, DraftStoreError};
use proclamation_domain::{
    AttendeeId, AttendeePatch, AttendeeRecord, AttendeeType, ContactPreference, NewAttendee,
    SelectionChange, Step,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const LEGACY_ARRAYS: [&str; 4] = ["masons", "ladyPartners", "guests", "guestPartners"];

/// Returns the schema version of a raw draft.
///
/// An explicit `schemaVersion` wins. Otherwise a populated `attendees` array
/// whose entries all carry an `attendeeId` marks version 2, and anything
/// else is version 1.
#[must_use]
pub fn detect_schema_version(raw: &Value) -> u64 {
    if let Some(version) = raw.get("schemaVersion").and_then(Value::as_u64) {
        return version;
    }
    if has_unified_attendees(raw) { 2 } else { 1 }
}

fn has_unified_attendees(raw: &Value) -> bool {
    raw.get("attendees")
        .and_then(Value::as_array)
        .is_some_and(|attendees| {
            !attendees.is_empty()
                && attendees
                    .iter()
                    .all(|a| a.get("attendeeId").and_then(Value::as_str).is_some())
        })
}

/// Upgrades a raw draft of any known version to the current envelope.
///
/// # Errors
///
/// Returns an error if the draft declares a version newer than this crate
/// understands, or if the upgraded envelope still cannot be decoded (for
/// example a missing draft id).
pub fn upgrade_draft(raw: Value) -> Result<DraftSnapshot, DraftStoreError> {
    let version: u64 = detect_schema_version(&raw);
    if version == 0 || version > CURRENT_SCHEMA_VERSION {
        return Err(DraftStoreError::UnsupportedVersion(version));
    }

    let mut value: Value = raw;
    if version < 2 {
        value = upgrade_v1_to_v2(value);
    }
    if version < 3 {
        value = upgrade_v2_to_v3(value);
    }
    if version != CURRENT_SCHEMA_VERSION {
        debug!(from = version, to = CURRENT_SCHEMA_VERSION, "Upgraded draft schema");
    }

    Ok(serde_json::from_value(value)?)
}

fn upgrade_v1_to_v2(raw: Value) -> Value {
    let attendees: Vec<AttendeeRecord> = migrate_draft_to_unified_attendees(&raw);
    let mut fields: Map<String, Value> = match raw {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    for key in LEGACY_ARRAYS {
        fields.remove(key);
    }

    let attendees: Value = serde_json::to_value(attendees).unwrap_or_else(|e| {
        warn!(error = %e, "Could not encode migrated attendees");
        Value::Array(Vec::new())
    });
    fields.insert(String::from("attendees"), attendees);
    Value::Object(fields)
}

fn upgrade_v2_to_v3(raw: Value) -> Value {
    let attendees: Vec<AttendeeRecord> = unified_attendees(&raw);
    let mut fields: Map<String, Value> = match raw {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };

    let step: Step = fields
        .get("step")
        .and_then(Value::as_i64)
        .map_or(Step::FIRST, legacy_step);
    fields.insert(String::from("step"), Value::from(step.number()));
    fields
        .entry("furthestStep")
        .or_insert_with(|| Value::from(step.number()));

    let attendees: Value = serde_json::to_value(attendees).unwrap_or_else(|e| {
        warn!(error = %e, "Could not encode upgraded attendees");
        Value::Array(Vec::new())
    });
    fields.insert(String::from("attendees"), attendees);
    fields.insert(
        String::from("schemaVersion"),
        Value::from(CURRENT_SCHEMA_VERSION),
    );
    Value::Object(fields)
}

/// Clamps a stored step number, keeping its sign for out-of-range values.
fn legacy_step(number: i64) -> Step {
    let saturated: i32 =
        i32::try_from(number).unwrap_or(if number < 0 { i32::MIN } else { i32::MAX });
    Step::clamped(saturated)
}

/// Converts a raw draft of any version into unified attendee records.
///
/// A draft that already carries unified attendees yields them unchanged.
/// Otherwise the four legacy arrays are walked in the order masons, lady
/// partners, guests, guest partners, producing one record per entry:
///
/// - legacy ids are reused, otherwise `legacy-{kind}-{index}` is assigned
/// - `dietary`, `lodge`, `phone` and `email` map to their unified names
/// - the first Mason becomes the primary attendee
/// - a partner whose Mason or guest cannot be found becomes a guest
///
/// Never fails; missing fields are left unset.
#[must_use]
pub fn migrate_draft_to_unified_attendees(raw: &Value) -> Vec<AttendeeRecord> {
    if has_unified_attendees(raw) {
        return unified_attendees(raw);
    }

    let mut migration: LegacyMigration = LegacyMigration::default();

    let masons: Vec<AttendeeId> = legacy_entries(raw, "masons")
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let is_primary: bool = entry
                .get("isPrimary")
                .and_then(Value::as_bool)
                .unwrap_or(index == 0);
            migration.push(entry, "mason", index, AttendeeType::Mason, is_primary, None)
        })
        .collect();

    for (index, entry) in legacy_entries(raw, "ladyPartners").iter().enumerate() {
        let related: Option<AttendeeId> = resolve_related(entry, "masonId", "masonIndex", &masons);
        migration.push_partner(entry, "lady-partner", index, AttendeeType::LadyPartner, related);
    }

    let guests: Vec<AttendeeId> = legacy_entries(raw, "guests")
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            migration.push(entry, "guest", index, AttendeeType::Guest, false, None)
        })
        .collect();

    for (index, entry) in legacy_entries(raw, "guestPartners").iter().enumerate() {
        let related: Option<AttendeeId> = resolve_related(entry, "guestId", "guestIndex", &guests);
        migration.push_partner(entry, "guest-partner", index, AttendeeType::GuestPartner, related);
    }

    migration.records
}

/// Decodes a unified `attendees` array, dropping entries that cannot be
/// salvaged.
///
/// Selections holding both a package and events keep the package. Partners
/// whose related attendee is missing become guests.
fn unified_attendees(raw: &Value) -> Vec<AttendeeRecord> {
    let Some(entries) = raw.get("attendees").and_then(Value::as_array) else {
        return Vec::new();
    };

    let known: Vec<(&str, bool)> = entries
        .iter()
        .filter_map(|entry| {
            let id: &str = entry.get("attendeeId")?.as_str()?;
            let partner: bool = entry
                .get("attendeeType")
                .and_then(Value::as_str)
                .and_then(|t| t.parse::<AttendeeType>().ok())
                .is_some_and(|t| t.is_partner());
            Some((id, partner))
        })
        .collect();

    entries
        .iter()
        .filter_map(|entry| {
            let mut entry: Value = entry.clone();
            normalize_ticket(&mut entry);
            demote_orphan_partner(&mut entry, &known);
            match serde_json::from_value::<AttendeeRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Dropping attendee that could not be decoded");
                    None
                }
            }
        })
        .collect()
}

fn normalize_ticket(entry: &mut Value) {
    let Some(ticket) = entry.get_mut("ticket").and_then(Value::as_object_mut) else {
        return;
    };
    let has_package: bool = ticket
        .get("ticketDefinitionId")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.trim().is_empty());
    if has_package {
        ticket.insert(String::from("selectedEvents"), Value::Array(Vec::new()));
    }
}

fn demote_orphan_partner(entry: &mut Value, known: &[(&str, bool)]) {
    let Some(fields) = entry.as_object_mut() else {
        return;
    };
    let is_partner: bool = fields
        .get("attendeeType")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<AttendeeType>().ok())
        .is_some_and(|t| t.is_partner());
    if !is_partner {
        return;
    }

    let related_ok: bool = fields
        .get("relatedAttendeeId")
        .and_then(Value::as_str)
        .is_some_and(|related| known.iter().any(|(id, partner)| *id == related && !partner));
    if related_ok {
        return;
    }

    let attendee_id: &str = fields
        .get("attendeeId")
        .and_then(Value::as_str)
        .unwrap_or_default();
    warn!(
        attendee_id,
        "Partner without a valid related attendee migrated as a guest"
    );
    fields.insert(
        String::from("attendeeType"),
        Value::from(AttendeeType::Guest.as_str()),
    );
    fields.remove("relatedAttendeeId");
    fields.remove("relationship");
}

fn legacy_entries<'a>(raw: &'a Value, key: &str) -> &'a [Value] {
    raw.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn resolve_related(
    entry: &Value,
    id_key: &str,
    index_key: &str,
    candidates: &[AttendeeId],
) -> Option<AttendeeId> {
    if let Some(id) = entry.get(id_key).and_then(Value::as_str)
        && let Some(found) = candidates.iter().find(|c| c.value() == id)
    {
        return Some(found.clone());
    }
    let index: usize = entry
        .get(index_key)
        .and_then(Value::as_u64)
        .and_then(|i| usize::try_from(i).ok())?;
    candidates.get(index).cloned()
}

#[derive(Debug, Default)]
struct LegacyMigration {
    records: Vec<AttendeeRecord>,
}

impl LegacyMigration {
    fn next_id(&self, entry: &Value, kind: &str, index: usize) -> AttendeeId {
        let reusable: Option<&str> = ["attendeeId", "id"]
            .into_iter()
            .find_map(|key| entry.get(key).and_then(Value::as_str))
            .filter(|id| !id.trim().is_empty())
            .filter(|id| !self.records.iter().any(|r| r.attendee_id.value() == *id));

        reusable.map_or_else(
            || AttendeeId::new(format!("legacy-{kind}-{index}")),
            AttendeeId::new,
        )
    }

    fn push(
        &mut self,
        entry: &Value,
        kind: &str,
        index: usize,
        attendee_type: AttendeeType,
        is_primary: bool,
        related_attendee_id: Option<AttendeeId>,
    ) -> Option<AttendeeId> {
        let attendee_id: AttendeeId = self.next_id(entry, kind, index);
        let new: NewAttendee = NewAttendee {
            attendee_type,
            is_primary,
            related_attendee_id,
            details: legacy_patch(entry),
        };

        match AttendeeRecord::create(attendee_id.clone(), new) {
            Ok(record) => {
                self.records.push(record);
                Some(attendee_id)
            }
            Err(e) => {
                warn!(%attendee_id, error = %e, "Skipping legacy attendee");
                None
            }
        }
    }

    fn push_partner(
        &mut self,
        entry: &Value,
        kind: &str,
        index: usize,
        attendee_type: AttendeeType,
        related: Option<AttendeeId>,
    ) {
        if related.is_some() {
            self.push(entry, kind, index, attendee_type, false, related);
            return;
        }
        warn!(kind, index, "Legacy partner without a resolvable attendee migrated as a guest");
        self.push(entry, kind, index, AttendeeType::Guest, false, None);
    }
}

fn text(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match entry.get(*key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn contact_preference(entry: &Value) -> Option<ContactPreference> {
    let value: String = text(entry, &["contactPreference"])?;
    value.split_whitespace().collect::<String>().parse().ok()
}

fn legacy_ticket(entry: &Value) -> Option<SelectionChange> {
    let ticket: &Value = entry.get("ticket")?;
    if let Some(id) = text(ticket, &["ticketDefinitionId", "ticketId"])
        && !id.trim().is_empty()
    {
        return Some(SelectionChange::Package(Some(id)));
    }

    let events: Vec<String> = ["selectedEvents", "events"]
        .into_iter()
        .find_map(|key| ticket.get(key).and_then(Value::as_array))
        .map(|ids| {
            ids.iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    Some(SelectionChange::Events(events))
}

fn legacy_patch(entry: &Value) -> AttendeePatch {
    AttendeePatch {
        title: text(entry, &["title"]),
        first_name: text(entry, &["firstName"]),
        last_name: text(entry, &["lastName"]),
        primary_email: text(entry, &["primaryEmail", "email"]),
        primary_phone: text(entry, &["primaryPhone", "phone"]),
        dietary_requirements: text(entry, &["dietaryRequirements", "dietary"]),
        special_needs: text(entry, &["specialNeeds"]),
        contact_preference: contact_preference(entry),
        contact_confirmed: entry.get("contactConfirmed").and_then(Value::as_bool),
        relationship: text(entry, &["relationship"]),
        rank: text(entry, &["rank"]),
        grand_rank: text(entry, &["grandRank"]),
        grand_officer: text(entry, &["grandOfficer"]).and_then(|v| v.parse().ok()),
        grand_office: text(entry, &["grandOffice"]),
        grand_office_other: text(entry, &["grandOfficeOther"]),
        lodge_id: text(entry, &["lodgeId", "lodge"]),
        lodge_name_number: text(entry, &["lodgeNameNumber"]),
        ticket: legacy_ticket(entry),
    }
}
