// --- File: crates/foodbot_reporting/src/handlers.rs ---

use crate::logic::{
    clamp_days, day_summary, history_overview, menu_day_overview, range_summary, user_detail,
    users_page, DaySummary, HistoryOverview, MenuDayOverview, ReportingError, UserDetail,
    UsersPage,
};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use foodbot_common::time::CanteenClock;
use foodbot_common::validation::validate_date;
use foodbot_common::FoodbotError;
use foodbot_config::AppConfig;
use foodbot_db::Repositories;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReportingState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub clock: CanteenClock,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Deserialize, Debug, Default)]
pub struct StatusQuery {
    /// YYYY-MM-DD, defaults to today.
    pub date: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Deserialize, Debug, Default)]
pub struct StatsQuery {
    /// Number of days ending today; clamped to 1..=90.
    pub days: Option<i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Deserialize, Debug, Default)]
pub struct UsersQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Clamped to 1..=100.
    pub per_page: Option<u32>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatsResponse {
    pub stats: Vec<DaySummary>,
}

pub async fn status_handler(
    State(state): State<Arc<ReportingState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<DaySummary>, FoodbotError> {
    let date = match query.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => validate_date(raw).ok_or_else(|| {
            ReportingError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", raw))
        })?,
        None => state.clock.today(),
    };
    Ok(Json(day_summary(&state.repos, date).await?))
}

pub async fn stats_handler(
    State(state): State<Arc<ReportingState>>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, FoodbotError> {
    let canteen = &state.config.canteen;
    let days = clamp_days(query.days, canteen.stats_default_days, canteen.stats_max_days);
    let stats = range_summary(&state.repos, state.clock.today(), days).await?;
    Ok(Json(StatsResponse { stats }))
}

pub async fn users_handler(
    State(state): State<Arc<ReportingState>>,
    Query(query): Query<UsersQuery>,
) -> Result<Json<UsersPage>, FoodbotError> {
    let canteen = &state.config.canteen;
    let per_page = query
        .per_page
        .unwrap_or(canteen.users_default_per_page)
        .clamp(1, canteen.users_max_per_page.max(1));
    let page = query.page.unwrap_or(1);
    Ok(Json(users_page(&state.repos, page, per_page).await?))
}

pub async fn history_handler(
    State(state): State<Arc<ReportingState>>,
) -> Result<Json<HistoryOverview>, FoodbotError> {
    Ok(Json(history_overview(&state.repos, state.clock.today()).await?))
}

pub async fn user_history_handler(
    State(state): State<Arc<ReportingState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDetail>, FoodbotError> {
    Ok(Json(
        user_detail(&state.repos, user_id, state.clock.today()).await?,
    ))
}

pub async fn menu_days_handler(
    State(state): State<Arc<ReportingState>>,
) -> Result<Json<MenuDayOverview>, FoodbotError> {
    Ok(Json(menu_day_overview(&state.repos, state.clock.today()).await?))
}
