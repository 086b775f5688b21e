// --- File: crates/foodbot_admin/src/logic.rs ---

use foodbot_common::validation::{validate_card_id, validate_name, validate_personal_number};
use foodbot_common::{AdminLogEntry, FoodbotError, NewUser, User};
use foodbot_db::{AdminLogRepository, DbError, Repositories, UserRepository};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Upper bound for `GET /admin/log?limit=`.
pub const ADMIN_LOG_MAX: i64 = 500;
pub const ADMIN_LOG_DEFAULT: i64 = 100;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("User not found: {0}")]
    NotFound(i64),
    #[error("{0}")]
    Conflict(String),
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
}

impl From<AdminError> for FoodbotError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::Validation(msg) => FoodbotError::ValidationError(msg),
            AdminError::NotFound(id) => FoodbotError::NotFoundError(format!("user {}", id)),
            AdminError::Conflict(msg) => FoodbotError::ConflictError(msg),
            AdminError::Storage(db) => db.into(),
        }
    }
}

// --- Request Structs ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UserForm {
    pub name: String,
    pub personal_number: String,
    #[serde(default)]
    pub card_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MobileTokenResponse {
    pub user_id: i64,
    pub token: String,
    /// Relative self-service link.
    pub path: String,
}

/// Validate and normalise a user form.
///
/// A blank card id means "no card".
pub fn validate_user_form(form: &UserForm) -> Result<NewUser, AdminError> {
    let name = validate_name(&form.name).ok_or_else(|| {
        AdminError::Validation(
            "name must be 2-100 letters, spaces, dots or hyphens".to_string(),
        )
    })?;
    let personal_number = validate_personal_number(&form.personal_number).ok_or_else(|| {
        AdminError::Validation(
            "personal number must be 1-20 letters, digits or hyphens".to_string(),
        )
    })?;
    let card_id = match form.card_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(validate_card_id(raw).ok_or_else(|| {
            AdminError::Validation("card id must be 1-50 hexadecimal digits".to_string())
        })?),
    };

    Ok(NewUser {
        name,
        personal_number,
        card_id,
    })
}

fn conflict_or_storage(err: DbError, user: &NewUser) -> AdminError {
    if err.is_unique_violation() {
        AdminError::Conflict(format!(
            "personal number {} or card id {} is already assigned",
            user.personal_number,
            user.card_id.as_deref().unwrap_or("-")
        ))
    } else {
        AdminError::Storage(err)
    }
}

/// Append to the admin log without failing the surrounding action.
pub async fn record_action(repos: &Repositories, admin_user: &str, action: &str, details: &str) {
    let details = (!details.is_empty()).then_some(details);
    if let Err(e) = repos.admin_log.append(admin_user, action, details).await {
        error!("Could not record admin action '{}': {}", action, e);
    }
}

pub async fn create_user(
    repos: &Repositories,
    admin_user: &str,
    form: &UserForm,
) -> Result<User, AdminError> {
    let new_user = validate_user_form(form)?;
    let user = repos
        .users
        .create(&new_user)
        .await
        .map_err(|e| conflict_or_storage(e, &new_user))?;

    record_action(
        repos,
        admin_user,
        "create_user",
        &format!("{} ({})", user.name, user.personal_number),
    )
    .await;
    Ok(user)
}

pub async fn update_user(
    repos: &Repositories,
    admin_user: &str,
    id: i64,
    form: &UserForm,
) -> Result<User, AdminError> {
    let new_user = validate_user_form(form)?;
    let user = repos
        .users
        .update(id, &new_user)
        .await
        .map_err(|e| conflict_or_storage(e, &new_user))?
        .ok_or(AdminError::NotFound(id))?;

    record_action(
        repos,
        admin_user,
        "update_user",
        &format!("{} ({})", user.name, user.personal_number),
    )
    .await;
    Ok(user)
}

/// Delete a user and, in the same transaction, all of their registrations.
pub async fn delete_user(repos: &Repositories, admin_user: &str, id: i64) -> Result<(), AdminError> {
    let user = repos
        .users
        .find_by_id(id)
        .await?
        .ok_or(AdminError::NotFound(id))?;

    if !repos.users.delete(id).await? {
        return Err(AdminError::NotFound(id));
    }

    info!("User {} ({}) deleted", user.name, user.personal_number);
    record_action(
        repos,
        admin_user,
        "delete_user",
        &format!("{} ({})", user.name, user.personal_number),
    )
    .await;
    Ok(())
}

/// Return the user's mobile token, generating one on first use.
pub async fn ensure_mobile_token(
    repos: &Repositories,
    admin_user: &str,
    id: i64,
) -> Result<MobileTokenResponse, AdminError> {
    let user = repos
        .users
        .find_by_id(id)
        .await?
        .ok_or(AdminError::NotFound(id))?;

    let token = match user.mobile_token {
        Some(existing) => existing,
        None => {
            let token = uuid::Uuid::new_v4().simple().to_string();
            if repos.users.set_mobile_token(id, &token).await? {
                record_action(repos, admin_user, "generate_token", &user.personal_number).await;
                token
            } else {
                // Someone else stored a token first (or the user vanished).
                repos
                    .users
                    .find_by_id(id)
                    .await?
                    .and_then(|u| u.mobile_token)
                    .ok_or(AdminError::NotFound(id))?
            }
        }
    };

    Ok(MobileTokenResponse {
        user_id: id,
        path: format!("/api/m/{}", token),
        token,
    })
}

pub async fn list_admin_log(
    repos: &Repositories,
    limit: Option<i64>,
) -> Result<Vec<AdminLogEntry>, AdminError> {
    let limit = limit.unwrap_or(ADMIN_LOG_DEFAULT).clamp(1, ADMIN_LOG_MAX);
    Ok(repos.admin_log.recent(limit).await?)
}
