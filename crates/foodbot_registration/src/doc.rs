// --- File: crates/foodbot_registration/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::credential::CredentialFields;
use crate::handlers::{
    MobileActionRequest, MobileStatusResponse, OutcomeKind, RegisterRequest, RegisterResponse,
    RfidConsumeResponse, RfidScanRequest, RfidScanResponse, UserSummary,
};
use crate::logic::MobileAction;

#[utoipa::path(
    post,
    path = "/register",
    request_body(content = RegisterRequest, example = json!({
        "kiosk_input": "FOODBOT:4711"
    })),
    responses(
        (status = 200, description = "Outcome of the toggle: registered, unregistered, needs_choice, not_found or closed", body = RegisterResponse),
        (status = 400, description = "No credential given, bad date or date in the past")
    ),
    tag = "Registration"
)]
fn doc_register_handler() {}

#[utoipa::path(
    post,
    path = "/register/choice",
    request_body(content = RegisterRequest, example = json!({
        "personal_number": "4711",
        "option": 2
    })),
    responses(
        (status = 200, description = "Registered with the chosen meal, or unchanged if already registered", body = RegisterResponse),
        (status = 400, description = "No credential given, bad date or date in the past")
    ),
    tag = "Registration"
)]
fn doc_register_choice_handler() {}

#[utoipa::path(
    get,
    path = "/m/{token}",
    params(
        ("token" = String, Path, description = "Personal mobile token")
    ),
    responses(
        (status = 200, description = "Today's menu and sign-up state", body = MobileStatusResponse),
        (status = 404, description = "Unknown token")
    ),
    tag = "Registration"
)]
fn doc_mobile_status_handler() {}

#[utoipa::path(
    post,
    path = "/m/{token}",
    request_body(content = MobileActionRequest, example = json!({ "action": "register", "option": 1 })),
    params(
        ("token" = String, Path, description = "Personal mobile token")
    ),
    responses(
        (status = 200, description = "Outcome, including no_menu and closed", body = RegisterResponse),
        (status = 404, description = "Unknown token")
    ),
    tag = "Registration"
)]
fn doc_mobile_action_handler() {}

#[utoipa::path(
    post,
    path = "/rfid/scan",
    request_body = RfidScanRequest,
    responses(
        (status = 202, description = "Scan stored, replacing any unconsumed one", body = RfidScanResponse),
        (status = 400, description = "Card id is not hex")
    ),
    tag = "RFID"
)]
fn doc_rfid_scan_handler() {}

#[utoipa::path(
    post,
    path = "/rfid/consume",
    responses(
        (status = 200, description = "Pending scan taken and toggled; both fields null when nothing was pending", body = RfidConsumeResponse)
    ),
    tag = "RFID"
)]
fn doc_rfid_consume_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_register_handler,
        doc_register_choice_handler,
        doc_mobile_status_handler,
        doc_mobile_action_handler,
        doc_rfid_scan_handler,
        doc_rfid_consume_handler
    ),
    components(schemas(
        RegisterRequest,
        CredentialFields,
        RegisterResponse,
        OutcomeKind,
        UserSummary,
        MobileAction,
        MobileActionRequest,
        MobileStatusResponse,
        RfidScanRequest,
        RfidScanResponse,
        RfidConsumeResponse
    )),
    tags(
        (name = "Registration", description = "Kiosk and mobile meal sign-up"),
        (name = "RFID", description = "Card reader mailbox")
    )
)]
pub struct RegistrationApiDoc;
