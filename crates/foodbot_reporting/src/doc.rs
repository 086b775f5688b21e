// --- File: crates/foodbot_reporting/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{StatsQuery, StatsResponse, StatusQuery, UsersQuery};
use crate::logic::{
    DaySummary, HistoryOverview, MenuDayOverview, MonthCount, RegisteredPerson, UserDetail,
    UserListing, UsersPage,
};
use foodbot_common::{Registration, User};

#[utoipa::path(
    get,
    path = "/status",
    params(StatusQuery),
    responses(
        (status = 200, description = "Counts, menu and registered users for the day", body = DaySummary),
        (status = 400, description = "Malformed date")
    ),
    tag = "Reporting"
)]
fn doc_status_handler() {}

#[utoipa::path(
    get,
    path = "/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "One summary per day, newest first", body = StatsResponse)
    ),
    tag = "Reporting"
)]
fn doc_stats_handler() {}

#[utoipa::path(
    get,
    path = "/users",
    params(UsersQuery),
    responses(
        (status = 200, description = "One page of the user directory", body = UsersPage),
        (status = 400, description = "page < 1")
    ),
    tag = "Reporting"
)]
fn doc_users_handler() {}

#[utoipa::path(
    get,
    path = "/history",
    params(
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "7/30/90-day counts for every user and the top eaters", body = HistoryOverview)
    ),
    tag = "Reporting"
)]
fn doc_history_handler() {}

#[utoipa::path(
    get,
    path = "/history/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User id"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Registrations of the last 180 days with monthly counts", body = UserDetail),
        (status = 404, description = "No such user")
    ),
    tag = "Reporting"
)]
fn doc_user_history_handler() {}

#[utoipa::path(
    get,
    path = "/stats/menu-days",
    params(
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Up to 14 recent days with a menu and the average attendance", body = MenuDayOverview)
    ),
    tag = "Reporting"
)]
fn doc_menu_days_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_status_handler,
        doc_stats_handler,
        doc_users_handler,
        doc_history_handler,
        doc_user_history_handler,
        doc_menu_days_handler
    ),
    components(schemas(
        DaySummary,
        RegisteredPerson,
        StatsResponse,
        UsersPage,
        UserListing,
        HistoryOverview,
        UserDetail,
        MonthCount,
        MenuDayOverview,
        User,
        Registration
    )),
    tags((name = "Reporting", description = "Daily status, statistics and attendance history"))
)]
pub struct ReportingApiDoc;
