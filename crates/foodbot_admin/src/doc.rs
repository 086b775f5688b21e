// --- File: crates/foodbot_admin/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::AdminLogQuery;
use crate::logic::{MobileTokenResponse, UserForm};
use foodbot_common::{AdminLogEntry, User};

#[utoipa::path(
    post,
    path = "/admin/users",
    request_body(content = UserForm, example = json!({
        "name": "Anna Berg",
        "personal_number": "FW-0042",
        "card_id": "04a2bc19"
    })),
    params(
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid name, personal number or card id"),
        (status = 401, description = "Missing or wrong admin password"),
        (status = 409, description = "Personal number or card id already assigned")
    ),
    tag = "Admin"
)]
fn doc_create_user_handler() {}

#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    request_body = UserForm,
    params(
        ("id" = i64, Path, description = "User id"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "No such user"),
        (status = 409, description = "Personal number or card id already assigned")
    ),
    tag = "Admin"
)]
fn doc_update_user_handler() {}

#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(
        ("id" = i64, Path, description = "User id"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 204, description = "User and all of their registrations deleted"),
        (status = 404, description = "No such user")
    ),
    tag = "Admin"
)]
fn doc_delete_user_handler() {}

#[utoipa::path(
    post,
    path = "/admin/users/{id}/token",
    params(
        ("id" = i64, Path, description = "User id"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Existing or newly generated mobile token", body = MobileTokenResponse),
        (status = 404, description = "No such user")
    ),
    tag = "Admin"
)]
fn doc_mobile_token_handler() {}

#[utoipa::path(
    get,
    path = "/admin/log",
    params(
        AdminLogQuery,
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Admin actions, newest first", body = [AdminLogEntry])
    ),
    tag = "Admin"
)]
fn doc_admin_log_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_user_handler,
        doc_update_user_handler,
        doc_delete_user_handler,
        doc_mobile_token_handler,
        doc_admin_log_handler
    ),
    components(schemas(UserForm, MobileTokenResponse, User, AdminLogEntry)),
    tags((name = "Admin", description = "User management and audit log"))
)]
pub struct AdminApiDoc;
