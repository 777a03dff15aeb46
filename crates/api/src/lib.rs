// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Grand Proclamation registration.
//!
//! Requests are parsed into domain types here, commands are dispatched to
//! the `RegistrationStore`, and core, domain and persistence errors are
//! translated into `ApiError`. Paid registrations are written to the
//! record store through `checkout`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod checkout;
mod error;
mod handlers;
mod payment;
mod request_response;

#[cfg(test)]
mod tests;

pub use checkout::{CURRENCY, order_summary, submit_payment};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    add_attendee, add_primary_attendee, advance, clear_registration, clear_bypass_reservation,
    create_bypass_reservation, get_bypass_reservation, get_registration, list_events,
    list_packages, list_ticket_definitions, remove_attendee, resolve_recovery,
    select_registration_type, set_agree_to_terms, update_attendee, update_billing_details,
};
pub use payment::{
    ChargeRequest, DECLINED_TOKEN_PREFIX, MockPaymentAuthorizer, PaymentAuthorizer, PaymentError,
    PaymentOutcome, UNAVAILABLE_TOKEN_PREFIX,
};
pub use request_response::{
    AddAttendeeRequest, AddAttendeeResponse, AttendeeFieldsRequest, BypassReservationResponse,
    CreateBypassReservationRequest, ListEventsRequest, Navigation, OrderItem, OrderItemKind,
    OrderLine, OrderSummary, PaymentConfirmation, RegistrationView, RemoveAttendeeResponse,
    ResolveRecoveryRequest, SelectRegistrationTypeRequest, SetAgreeToTermsRequest,
    StepChangeResponse, SubmitPaymentRequest, TicketSelectionRequest, UpdateBillingRequest,
};
