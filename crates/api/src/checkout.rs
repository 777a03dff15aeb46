// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order pricing and payment submission.

use proclamation::{
    DraftId, IdGenerator, KeyValueStore, Registration, RegistrationStore, step_requirement_errors,
};
use proclamation_domain::{
    AttendeeRecord, BillingDetails, RegistrationType, Step, validate_billing_details,
};
use proclamation_persistence::{
    CompletedRegistration, Package, Persistence, PurchasedItem, TicketDefinition, TicketPurchase,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::payment::{ChargeRequest, PaymentAuthorizer, PaymentOutcome};
use crate::request_response::{
    OrderItem, OrderItemKind, OrderLine, OrderSummary, PaymentConfirmation, SubmitPaymentRequest,
};

/// Currency of every catalog price.
pub const CURRENCY: &str = "AUD";

fn price_attendee(
    attendee: &AttendeeRecord,
    persistence: &mut Persistence,
) -> Result<OrderLine, ApiError> {
    let mut items: Vec<OrderItem> = Vec::new();

    if let Some(package_id) = attendee.ticket.ticket_definition_id() {
        let package: Package = persistence
            .get_package(package_id)
            .map_err(translate_persistence_error)?;
        items.push(OrderItem {
            kind: OrderItemKind::Package,
            id: package.package_id,
            name: package.name,
            price_cents: package.price_cents,
        });
    }
    for ticket_id in attendee.ticket.selected_events() {
        let ticket: TicketDefinition = persistence
            .get_ticket_definition(ticket_id)
            .map_err(translate_persistence_error)?;
        items.push(OrderItem {
            kind: OrderItemKind::Ticket,
            id: ticket.ticket_definition_id,
            name: ticket.name,
            price_cents: ticket.price_cents,
        });
    }

    Ok(OrderLine {
        attendee_id: attendee.attendee_id.clone(),
        attendee_type: attendee.attendee_type(),
        attendee_name: attendee.full_name(),
        subtotal_cents: items.iter().map(|item| item.price_cents).sum(),
        items,
    })
}

/// Prices every attendee's selection against the catalog.
///
/// # Errors
///
/// Returns `ResourceNotFound` if a selection names a package or ticket the
/// catalog does not have.
pub fn order_summary(
    registration: &Registration,
    persistence: &mut Persistence,
) -> Result<OrderSummary, ApiError> {
    let lines: Vec<OrderLine> = registration
        .attendees
        .iter()
        .map(|attendee| price_attendee(attendee, persistence))
        .collect::<Result<_, _>>()?;
    Ok(OrderSummary {
        total_cents: lines.iter().map(|line| line.subtotal_cents).sum(),
        lines,
        currency: String::from(CURRENCY),
    })
}

fn ticket_purchases(summary: &OrderSummary) -> Vec<TicketPurchase> {
    summary
        .lines
        .iter()
        .flat_map(|line| {
            line.items.iter().map(|item| TicketPurchase {
                attendee_id: line.attendee_id.clone(),
                item: match item.kind {
                    OrderItemKind::Package => PurchasedItem::Package(item.id.clone()),
                    OrderItemKind::Ticket => PurchasedItem::TicketDefinition(item.id.clone()),
                },
                price_cents: item.price_cents,
            })
        })
        .collect()
}

/// Pays for the registration and records it.
///
/// The registration must be on the payment step with complete attendee and
/// ticket steps and valid billing details. A declined charge leaves the
/// draft untouched so the user can retry. An approved charge records the
/// registration, deletes the draft and moves to the confirmation step.
///
/// # Errors
///
/// Returns `ValidationFailed` for an incomplete registration,
/// `PaymentDeclined` for a declined charge, or an error if recording fails.
pub fn submit_payment<S, G, P>(
    store: &mut RegistrationStore<S, G>,
    persistence: &mut Persistence,
    authorizer: &mut P,
    request: &SubmitPaymentRequest,
    now: Instant,
) -> Result<PaymentConfirmation, ApiError>
where
    S: KeyValueStore,
    G: IdGenerator,
    P: PaymentAuthorizer,
{
    let registration: &Registration = store.state();
    let (Some(draft_id), Some(registration_type)) =
        (registration.draft_id.clone(), registration.registration_type)
    else {
        return Err(translate_core_error(
            proclamation::CoreError::RegistrationTypeNotSelected,
        ));
    };

    if registration.step != Step::Payment {
        return Err(ApiError::StepUnavailable {
            step: Step::Payment,
        });
    }
    for step in [
        Step::RegistrationType,
        Step::AttendeeDetails,
        Step::TicketSelection,
    ] {
        let errors: Vec<String> = step_requirement_errors(registration, step);
        if !errors.is_empty() {
            return Err(ApiError::ValidationFailed { step, errors });
        }
    }

    let billing: BillingDetails = registration.billing_details.clone().unwrap_or_default();
    let errors: Vec<String> = validate_billing_details(&billing);
    if !errors.is_empty() {
        return Err(ApiError::ValidationFailed {
            step: Step::Payment,
            errors,
        });
    }

    let registration: Registration = registration.clone();
    let summary: OrderSummary = order_summary(&registration, persistence)?;
    let charge: ChargeRequest = ChargeRequest {
        amount_cents: summary.total_cents,
        currency: summary.currency.clone(),
        payment_token: request.payment_token.clone(),
        description: charge_description(registration_type, &draft_id),
        receipt_email: Some(billing.email.clone()),
    };

    let outcome: PaymentOutcome = authorizer.authorize(&charge)?;
    if !outcome.approved {
        let message: String = outcome
            .error_message
            .unwrap_or_else(|| String::from("The payment was not approved"));
        warn!(%draft_id, %message, "Payment declined");
        return Err(ApiError::PaymentDeclined { message });
    }
    let payment_reference: String = outcome.payment_reference.ok_or_else(|| ApiError::Internal {
        message: String::from("Approved payment has no reference"),
    })?;

    let completed: CompletedRegistration = CompletedRegistration {
        draft_id: draft_id.value().to_string(),
        registration_type,
        tickets: ticket_purchases(&summary),
        attendees: registration.attendees,
        billing_details: Some(billing),
        total_amount_cents: summary.total_cents,
        payment_reference: payment_reference.clone(),
    };
    let registration_id: i64 = persistence
        .persist_registration(&completed)
        .map_err(translate_persistence_error)?;

    let draft_id: DraftId = store
        .complete_registration(now)
        .map_err(translate_core_error)?;
    info!(
        %draft_id,
        registration_id,
        total_cents = summary.total_cents,
        "Payment approved"
    );

    Ok(PaymentConfirmation {
        registration_id,
        draft_id,
        payment_reference,
        total_cents: summary.total_cents,
        currency: summary.currency,
    })
}

fn charge_description(registration_type: RegistrationType, draft_id: &DraftId) -> String {
    format!("Grand Proclamation registration ({registration_type}) {draft_id}")
}
