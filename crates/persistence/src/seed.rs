// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The default Grand Proclamation catalog.

use time::macros::datetime;

use crate::data_models::{Event, Package, TicketDefinition};

/// Events, ticket definitions and packages inserted together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub events: Vec<Event>,
    pub ticket_definitions: Vec<TicketDefinition>,
    pub packages: Vec<Package>,
}

fn event(event_id: &str, title: &str, location: &str, starts_at: time::OffsetDateTime) -> Event {
    Event {
        event_id: event_id.to_string(),
        slug: event_id.to_string(),
        title: title.to_string(),
        description: None,
        location: Some(location.to_string()),
        starts_at,
        ends_at: None,
        is_published: true,
    }
}

fn ticket(ticket_definition_id: &str, event_id: &str, name: &str, price_cents: i64) -> TicketDefinition {
    TicketDefinition {
        ticket_definition_id: ticket_definition_id.to_string(),
        event_id: Some(event_id.to_string()),
        name: name.to_string(),
        description: None,
        price_cents,
        is_active: true,
    }
}

/// Returns the catalog for the Grand Proclamation weekend.
#[must_use]
pub fn default_catalog() -> Catalog {
    let events: Vec<Event> = vec![
        event(
            "welcome-reception",
            "Welcome Reception",
            "Grand Lodge Foyer",
            datetime!(2027-03-12 18:00 UTC),
        ),
        event(
            "proclamation-ceremony",
            "Grand Proclamation Ceremony",
            "Sydney Masonic Centre",
            datetime!(2027-03-13 10:00 UTC),
        ),
        event(
            "ladies-program",
            "Ladies and Partners Program",
            "Harbour Cruise",
            datetime!(2027-03-13 11:00 UTC),
        ),
        event(
            "proclamation-banquet",
            "Proclamation Banquet",
            "Grand Ballroom",
            datetime!(2027-03-13 19:00 UTC),
        ),
        event(
            "farewell-brunch",
            "Farewell Brunch",
            "Grand Lodge Dining Room",
            datetime!(2027-03-14 10:00 UTC),
        ),
    ];

    let ticket_definitions: Vec<TicketDefinition> = vec![
        ticket("ticket-reception", "welcome-reception", "Welcome Reception", 4_500),
        ticket("ticket-ceremony", "proclamation-ceremony", "Ceremony Admission", 7_500),
        ticket("ticket-ladies", "ladies-program", "Partners Program", 9_500),
        ticket("ticket-banquet", "proclamation-banquet", "Banquet Seat", 15_000),
        ticket("ticket-brunch", "farewell-brunch", "Farewell Brunch", 5_500),
    ];

    let packages: Vec<Package> = vec![
        Package {
            package_id: String::from("package-complete"),
            name: String::from("Complete Weekend"),
            description: Some(String::from("Every event of the Proclamation weekend")),
            price_cents: 32_500,
            included_ticket_ids: ticket_definitions
                .iter()
                .map(|t| t.ticket_definition_id.clone())
                .collect(),
            is_active: true,
        },
        Package {
            package_id: String::from("package-ceremony-banquet"),
            name: String::from("Ceremony and Banquet"),
            description: None,
            price_cents: 20_000,
            included_ticket_ids: vec![
                String::from("ticket-ceremony"),
                String::from("ticket-banquet"),
            ],
            is_active: true,
        },
    ];

    Catalog {
        events,
        ticket_definitions,
        packages,
    }
}
