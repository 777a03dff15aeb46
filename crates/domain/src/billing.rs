// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::validation::is_valid_email;
use serde::{Deserialize, Serialize};

/// Billing address and contact used at the payment step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingDetails {
    #[serde(default)]
    pub billing_name: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Returns every problem with the billing details as a readable message.
///
/// Like `attendee_detail_errors`, this never stops at the first problem.
#[must_use]
pub fn validate_billing_details(details: &BillingDetails) -> Vec<String> {
    let mut errors: Vec<String> = Vec::new();

    let required: [(&str, &str); 6] = [
        ("Billing name", &details.billing_name),
        ("Address", &details.address_line1),
        ("City", &details.city),
        ("Postcode", &details.postcode),
        ("Country", &details.country),
        ("Phone", &details.phone),
    ];
    for (label, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("Billing: {label} is required."));
        }
    }

    if details.email.trim().is_empty() {
        errors.push(String::from("Billing: Email is required."));
    } else if !is_valid_email(&details.email) {
        errors.push(String::from("Billing: Email format is invalid."));
    }

    errors
}
