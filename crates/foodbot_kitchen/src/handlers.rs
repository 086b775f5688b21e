// --- File: crates/foodbot_kitchen/src/handlers.rs ---

use crate::logic::{
    add_day, adjust_guests, create_preset, delete_day, delete_preset, get_menu, guests_for_date,
    list_presets, set_guests, upsert_menu, week_overview, week_start, GuestTally, KitchenError,
    WeekOverview,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::NaiveDate;
use foodbot_admin::{record_action, AdminIdentity};
use foodbot_common::time::CanteenClock;
use foodbot_common::validation::validate_date;
use foodbot_common::{FoodbotError, GuestEntry, MenuInput, MenuOfDay, MenuOption, PresetMenu};
use foodbot_config::AppConfig;
use foodbot_db::Repositories;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct KitchenState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub clock: CanteenClock,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Deserialize, Debug, Default)]
pub struct WeekQuery {
    /// Any day of the wanted week (YYYY-MM-DD); defaults to the current week.
    pub start: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone)]
pub struct GuestRequest {
    /// 1 or 2; anything else counts as 1.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<i64>))]
    pub option: Option<serde_json::Value>,
    /// Relative change, e.g. 1 or -1.
    pub delta: Option<i64>,
    /// Absolute count; takes precedence over `delta`.
    pub count: Option<i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Debug, Clone)]
pub struct PresetRequest {
    pub name: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone)]
pub struct PresetListResponse {
    pub presets: Vec<PresetMenu>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone)]
pub struct GuestResponse {
    pub entry: GuestEntry,
    pub tally: GuestTally,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Debug, Clone)]
pub struct DayResponse {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    pub created: bool,
    pub registrations_deleted: u64,
}

fn parse_path_date(raw: &str) -> Result<NaiveDate, FoodbotError> {
    validate_date(raw)
        .ok_or_else(|| KitchenError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", raw)).into())
}

pub async fn get_menu_handler(
    State(state): State<Arc<KitchenState>>,
    Path(date): Path<String>,
) -> Result<Json<MenuOfDay>, FoodbotError> {
    let date = parse_path_date(&date)?;
    let menu = get_menu(&state.repos, date)
        .await?
        .ok_or(KitchenError::NotFound(date))?;
    Ok(Json(menu))
}

pub async fn put_menu_handler(
    State(state): State<Arc<KitchenState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(date): Path<String>,
    Json(input): Json<MenuInput>,
) -> Result<Json<MenuOfDay>, FoodbotError> {
    let date = parse_path_date(&date)?;
    let saved = upsert_menu(
        &state.repos,
        date,
        &input,
        &state.config.canteen.default_deadline,
    )
    .await?;

    record_action(&state.repos, admin.name(), "save_menu", &date.to_string()).await;
    Ok(Json(saved))
}

pub async fn week_handler(
    State(state): State<Arc<KitchenState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<WeekOverview>, FoodbotError> {
    let today = state.clock.today();
    let anchor = match query.start.as_deref() {
        Some(raw) => parse_path_date(raw)?,
        None => today,
    };
    Ok(Json(
        week_overview(&state.repos, week_start(anchor), today).await?,
    ))
}

pub async fn add_day_handler(
    State(state): State<Arc<KitchenState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(date): Path<String>,
) -> Result<(StatusCode, Json<DayResponse>), FoodbotError> {
    let date = parse_path_date(&date)?;
    let created = add_day(&state.repos, date, &state.config.canteen.default_deadline).await?;

    let status = if created {
        record_action(&state.repos, admin.name(), "add_day", &date.to_string()).await;
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DayResponse {
            date,
            created,
            registrations_deleted: 0,
        }),
    ))
}

/// Deletes the day's menu and every registration for it.
pub async fn delete_day_handler(
    State(state): State<Arc<KitchenState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, FoodbotError> {
    let date = parse_path_date(&date)?;
    let deletion = delete_day(&state.repos, date).await?;

    record_action(
        &state.repos,
        admin.name(),
        "delete_day",
        &format!("{} ({} registrations)", date, deletion.registrations_deleted),
    )
    .await;
    Ok(Json(DayResponse {
        date,
        created: false,
        registrations_deleted: deletion.registrations_deleted,
    }))
}

pub async fn update_guests_handler(
    State(state): State<Arc<KitchenState>>,
    Path(date): Path<String>,
    Json(request): Json<GuestRequest>,
) -> Result<Json<GuestResponse>, FoodbotError> {
    let date = parse_path_date(&date)?;
    let option = MenuOption::coerce_json(request.option.as_ref());
    let max = state.config.canteen.max_guests;

    let entry = match (request.count, request.delta) {
        (Some(count), _) => set_guests(&state.repos, date, option, count, max).await?,
        (None, Some(delta)) => adjust_guests(&state.repos, date, option, delta, max).await?,
        (None, None) => {
            return Err(KitchenError::Validation("either delta or count is required".to_string()).into())
        }
    };
    let tally = guests_for_date(&state.repos, date).await?;

    Ok(Json(GuestResponse { entry, tally }))
}

pub async fn get_guests_handler(
    State(state): State<Arc<KitchenState>>,
    Path(date): Path<String>,
) -> Result<Json<GuestTally>, FoodbotError> {
    let date = parse_path_date(&date)?;
    Ok(Json(guests_for_date(&state.repos, date).await?))
}

pub async fn list_presets_handler(
    State(state): State<Arc<KitchenState>>,
) -> Result<Json<PresetListResponse>, FoodbotError> {
    let presets = list_presets(&state.repos).await?;
    Ok(Json(PresetListResponse { presets }))
}

pub async fn create_preset_handler(
    State(state): State<Arc<KitchenState>>,
    Extension(admin): Extension<AdminIdentity>,
    Json(request): Json<PresetRequest>,
) -> Result<(StatusCode, Json<PresetMenu>), FoodbotError> {
    let preset = create_preset(&state.repos, &request.name).await?;
    record_action(&state.repos, admin.name(), "add_preset", &preset.name).await;
    Ok((StatusCode::CREATED, Json(preset)))
}

pub async fn delete_preset_handler(
    State(state): State<Arc<KitchenState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<PresetMenu>, FoodbotError> {
    let removed = delete_preset(&state.repos, id).await?;
    record_action(&state.repos, admin.name(), "delete_preset", &removed.name).await;
    Ok(Json(removed))
}
