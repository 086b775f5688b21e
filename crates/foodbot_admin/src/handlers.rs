// --- File: crates/foodbot_admin/src/handlers.rs ---

use crate::auth::AdminIdentity;
use crate::logic::{
    create_user, delete_user, ensure_mobile_token, list_admin_log, update_user,
    MobileTokenResponse, UserForm,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use foodbot_common::{AdminLogEntry, FoodbotError, User};
use foodbot_config::AppConfig;
use foodbot_db::Repositories;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Deserialize, Debug, Default)]
pub struct AdminLogQuery {
    pub limit: Option<i64>,
}

pub async fn create_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(admin): Extension<AdminIdentity>,
    Json(form): Json<UserForm>,
) -> Result<Response, FoodbotError> {
    let user = create_user(&state.repos, admin.name(), &form).await?;
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn update_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
    Json(form): Json<UserForm>,
) -> Result<Json<User>, FoodbotError> {
    Ok(Json(update_user(&state.repos, admin.name(), id, &form).await?))
}

pub async fn delete_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> Result<StatusCode, FoodbotError> {
    delete_user(&state.repos, admin.name(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mobile_token_handler(
    State(state): State<Arc<AdminState>>,
    Extension(admin): Extension<AdminIdentity>,
    Path(id): Path<i64>,
) -> Result<Json<MobileTokenResponse>, FoodbotError> {
    Ok(Json(ensure_mobile_token(&state.repos, admin.name(), id).await?))
}

pub async fn admin_log_handler(
    State(state): State<Arc<AdminState>>,
    Query(query): Query<AdminLogQuery>,
) -> Result<Json<Vec<AdminLogEntry>>, FoodbotError> {
    Ok(Json(list_admin_log(&state.repos, query.limit).await?))
}
