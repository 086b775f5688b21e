// --- File: crates/foodbot_registration/src/handlers.rs ---

use crate::credential::{resolve_credential, Credential, CredentialFields};
use crate::logic::{
    Ledger, LedgerState, MobileAction, RegistrationError, RegistrationOutcome, RequestedOption,
};
use crate::rfid::RfidMailbox;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDate;
use foodbot_common::time::CanteenClock;
use foodbot_common::validation::{validate_card_id, validate_date};
use foodbot_common::{FoodbotError, MenuOfDay, MenuOption, User};
use foodbot_config::AppConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct RegistrationState {
    pub config: Arc<AppConfig>,
    pub ledger: Ledger,
    pub clock: CanteenClock,
    pub rfid: Arc<RfidMailbox>,
}

// --- Request Structs ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RegisterRequest {
    #[serde(flatten)]
    pub credentials: CredentialFields,
    /// 1 or 2; other values count as 1. Leave out on two-menu days to get `needs_choice`.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub option: Option<serde_json::Value>,
    /// YYYY-MM-DD, defaults to today.
    #[serde(default)]
    pub date: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone)]
pub struct MobileActionRequest {
    pub action: MobileAction,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub option: Option<serde_json::Value>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone)]
pub struct RfidScanRequest {
    pub card_id: String,
}

// --- Response Structs ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Registered,
    Unregistered,
    NeedsChoice,
    NotFound,
    Closed,
    NoMenu,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub personal_number: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            personal_number: user.personal_number.clone(),
        }
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterResponse {
    pub outcome: OutcomeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub option: Option<MenuOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu1_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu2_name: Option<String>,
}

impl RegisterResponse {
    fn bare(outcome: OutcomeKind, message: String) -> Self {
        Self {
            outcome,
            user: None,
            option: None,
            message: Some(message),
            menu1_name: None,
            menu2_name: None,
        }
    }

    fn for_user(user: &User, outcome: RegistrationOutcome) -> Self {
        let (kind, option, message) = match &outcome {
            RegistrationOutcome::Registered(option) => (
                OutcomeKind::Registered,
                Some(*option),
                format!("{}, you are registered (meal {})", user.name, option.as_i64()),
            ),
            RegistrationOutcome::Unregistered(option) => (
                OutcomeKind::Unregistered,
                *option,
                format!("{}, you are unregistered", user.name),
            ),
            RegistrationOutcome::NeedsChoice { .. } => (
                OutcomeKind::NeedsChoice,
                None,
                "Please choose your meal".to_string(),
            ),
            RegistrationOutcome::Unchanged(LedgerState::Registered(option)) => (
                OutcomeKind::Registered,
                Some(*option),
                format!("{} is already registered", user.name),
            ),
            RegistrationOutcome::Unchanged(LedgerState::Unregistered) => (
                OutcomeKind::Unregistered,
                None,
                format!("{} was not registered", user.name),
            ),
            RegistrationOutcome::Unchanged(LedgerState::AwaitingMenuChoice) => (
                OutcomeKind::NeedsChoice,
                None,
                "Please choose your meal".to_string(),
            ),
        };
        let (menu1_name, menu2_name) = match outcome {
            RegistrationOutcome::NeedsChoice {
                menu1_name,
                menu2_name,
            } => (menu1_name, menu2_name),
            _ => (None, None),
        };

        Self {
            outcome: kind,
            user: Some(UserSummary::from(user)),
            option,
            message: Some(message),
            menu1_name,
            menu2_name,
        }
    }
}

/// Expected refusals become outcomes; everything else stays an error response.
fn outcome_or_error(err: RegistrationError) -> Result<RegisterResponse, FoodbotError> {
    match err {
        RegistrationError::NotFound => Ok(RegisterResponse::bare(
            OutcomeKind::NotFound,
            "User not found".to_string(),
        )),
        closed @ RegistrationError::Closed { .. } => Ok(RegisterResponse::bare(
            OutcomeKind::Closed,
            closed.to_string(),
        )),
        no_menu @ RegistrationError::NoMenu(_) => Ok(RegisterResponse::bare(
            OutcomeKind::NoMenu,
            no_menu.to_string(),
        )),
        other => Err(other.into()),
    }
}

fn requested_date(raw: Option<&str>, clock: &CanteenClock) -> Result<NaiveDate, FoodbotError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => validate_date(raw).ok_or_else(|| {
            RegistrationError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", raw))
                .into()
        }),
        None => Ok(clock.today()),
    }
}

async fn resolve_fields(
    state: &RegistrationState,
    fields: &CredentialFields,
) -> Result<User, RegistrationError> {
    let credential = fields.credential().ok_or_else(|| {
        RegistrationError::Validation(
            "one of personal_number, card_id or kiosk_input is required".to_string(),
        )
    })?;
    resolve_credential(state.ledger.repos(), &credential).await
}

// --- Handlers ---

/// Kiosk toggle: registers when not registered, cancels when registered.
pub async fn register_handler(
    State(state): State<Arc<RegistrationState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, FoodbotError> {
    let date = requested_date(request.date.as_deref(), &state.clock)?;
    let requested = RequestedOption::from_raw(request.option.as_ref());

    let result = match resolve_fields(&state, &request.credentials).await {
        Ok(user) => state
            .ledger
            .toggle_registration(&user, date, requested, state.clock.now())
            .await
            .map(|outcome| RegisterResponse::for_user(&user, outcome)),
        Err(err) => Err(err),
    };
    Ok(Json(result.or_else(outcome_or_error)?))
}

/// Two-menu follow-up: registers with the chosen option, never cancels.
pub async fn register_choice_handler(
    State(state): State<Arc<RegistrationState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, FoodbotError> {
    let date = requested_date(request.date.as_deref(), &state.clock)?;
    let option = MenuOption::coerce_json(request.option.as_ref());

    let result = match resolve_fields(&state, &request.credentials).await {
        Ok(user) => state
            .ledger
            .register_with_option(&user, date, option, state.clock.now())
            .await
            .map(|outcome| RegisterResponse::for_user(&user, outcome)),
        Err(err) => Err(err),
    };
    Ok(Json(result.or_else(outcome_or_error)?))
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MobileStatusResponse {
    pub user: UserSummary,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    /// `None` when no menu is planned today.
    pub menu: Option<MenuOfDay>,
    pub registered: bool,
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub option: Option<MenuOption>,
    pub registration_open: bool,
}

pub async fn mobile_status_handler(
    State(state): State<Arc<RegistrationState>>,
    Path(token): Path<String>,
) -> Result<Json<MobileStatusResponse>, FoodbotError> {
    let user = resolve_credential(state.ledger.repos(), &Credential::MobileToken(token)).await?;
    let status = state.ledger.mobile_status(&user, state.clock.now()).await?;

    Ok(Json(MobileStatusResponse {
        user: UserSummary::from(&status.user),
        date: status.date,
        menu: status.menu,
        registered: status.state.option().is_some(),
        option: status.state.option(),
        registration_open: status.registration_open,
    }))
}

pub async fn mobile_action_handler(
    State(state): State<Arc<RegistrationState>>,
    Path(token): Path<String>,
    Json(request): Json<MobileActionRequest>,
) -> Result<Json<RegisterResponse>, FoodbotError> {
    // Unknown tokens are a plain 404 here, not a `not_found` outcome.
    let user = resolve_credential(state.ledger.repos(), &Credential::MobileToken(token)).await?;
    let requested = RequestedOption::from_raw(request.option.as_ref());

    let result = state
        .ledger
        .mobile_action(&user, request.action, requested, state.clock.now())
        .await
        .map(|outcome| RegisterResponse::for_user(&user, outcome));
    Ok(Json(result.or_else(outcome_or_error)?))
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RfidScanResponse {
    pub card_id: String,
}

/// Called by the reader bridge for every scanned card.
pub async fn rfid_scan_handler(
    State(state): State<Arc<RegistrationState>>,
    Json(request): Json<RfidScanRequest>,
) -> Result<(StatusCode, Json<RfidScanResponse>), FoodbotError> {
    let card_id = validate_card_id(&request.card_id)
        .ok_or_else(|| RegistrationError::Validation("card_id must be hex".to_string()))?;
    state.rfid.deposit(card_id.clone());
    info!("RFID scan deposited");
    Ok((StatusCode::ACCEPTED, Json(RfidScanResponse { card_id })))
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RfidConsumeResponse {
    /// The scan that was taken, if any.
    pub card_id: Option<String>,
    pub result: Option<RegisterResponse>,
}

/// Take the pending scan, if any, and toggle today's sign-up for that card.
pub async fn rfid_consume_handler(
    State(state): State<Arc<RegistrationState>>,
) -> Result<Json<RfidConsumeResponse>, FoodbotError> {
    let Some(card_id) = state.rfid.take() else {
        return Ok(Json(RfidConsumeResponse {
            card_id: None,
            result: None,
        }));
    };

    let now = state.clock.now();
    let result = match resolve_credential(state.ledger.repos(), &Credential::CardId(card_id.clone()))
        .await
    {
        Ok(user) => state
            .ledger
            .toggle_registration(&user, now.date(), RequestedOption::Absent, now)
            .await
            .map(|outcome| RegisterResponse::for_user(&user, outcome)),
        Err(err) => Err(err),
    };

    Ok(Json(RfidConsumeResponse {
        card_id: Some(card_id),
        result: Some(result.or_else(outcome_or_error)?),
    }))
}
