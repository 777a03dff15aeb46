// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::payment::PaymentError;
use proclamation::{CoreError, DraftStoreError};
use proclamation_domain::{DomainError, Step};
use proclamation_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The step cannot be left until these problems are fixed.
    ValidationFailed {
        /// The step being left.
        step: Step,
        /// Every problem found, in display order.
        errors: Vec<String>,
    },
    /// The requested step cannot be navigated to yet.
    StepUnavailable {
        /// The requested step.
        step: Step,
    },
    /// The payment service declined the charge.
    PaymentDeclined {
        /// The reason given by the payment service.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::ValidationFailed { step, errors } => {
                write!(f, "Step {step} is incomplete: {}", errors.join(" "))
            }
            Self::StepUnavailable { step } => {
                write!(f, "Step {step} is not available yet")
            }
            Self::PaymentDeclined { message } => write!(f, "Payment declined: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::MissingToken => Self::InvalidInput {
                field: String::from("paymentToken"),
                message: err.to_string(),
            },
            PaymentError::InvalidAmount(_) | PaymentError::Unavailable(_) => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<DraftStoreError> for ApiError {
    fn from(err: DraftStoreError) -> Self {
        Self::Internal {
            message: format!("Local store failure: {err}"),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRegistrationType(value) => ApiError::InvalidInput {
            field: String::from("registrationType"),
            message: format!("'{value}' is not a registration type"),
        },
        DomainError::InvalidAttendeeType(value) => ApiError::InvalidInput {
            field: String::from("attendeeType"),
            message: format!("'{value}' is not an attendee type"),
        },
        DomainError::InvalidContactPreference(value) => ApiError::InvalidInput {
            field: String::from("contactPreference"),
            message: format!("'{value}' is not a contact preference"),
        },
        DomainError::InvalidGrandOfficer(value) => ApiError::InvalidInput {
            field: String::from("grandOfficer"),
            message: format!("'{value}' must be 'Current' or 'Past'"),
        },
        DomainError::InvalidStep(step) => ApiError::InvalidInput {
            field: String::from("step"),
            message: format!("Step {step} must be between 1 and 6"),
        },
        DomainError::MissingRelatedAttendee { attendee_type } => ApiError::InvalidInput {
            field: String::from("relatedAttendeeId"),
            message: format!("A {} must name the attendee they accompany", attendee_type.label()),
        },
        DomainError::InvalidRelatedAttendee {
            related_attendee_id,
        } => ApiError::DomainRuleViolation {
            rule: String::from("partner_reference"),
            message: format!(
                "Attendee '{related_attendee_id}' does not exist or is itself a partner"
            ),
        },
        DomainError::DuplicateAttendeeId(id) => ApiError::DomainRuleViolation {
            rule: String::from("unique_attendee_id"),
            message: format!("Attendee id '{id}' is already in use"),
        },
        DomainError::ConflictingSelection => ApiError::InvalidInput {
            field: String::from("ticket"),
            message: String::from("Choose either a package or individual tickets, not both"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::RegistrationTypeNotSelected => ApiError::DomainRuleViolation {
            rule: String::from("registration_type_required"),
            message: String::from("Select a registration type first"),
        },
        CoreError::NoRecoveryPending => ApiError::DomainRuleViolation {
            rule: String::from("recovery_pending"),
            message: String::from("There is no saved registration waiting for a decision"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::EventNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Event"),
            message: format!("Event '{id}' does not exist"),
        },
        PersistenceError::TicketDefinitionNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Ticket definition"),
            message: format!("Ticket '{id}' does not exist"),
        },
        PersistenceError::PackageNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Package"),
            message: format!("Package '{id}' does not exist"),
        },
        PersistenceError::RegistrationNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Registration"),
            message: format!("Registration {id} does not exist"),
        },
        PersistenceError::DuplicateRegistration(draft_id) => ApiError::DomainRuleViolation {
            rule: String::from("single_payment"),
            message: format!("Registration {draft_id} has already been paid for"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
