// --- File: crates/foodbot_kitchen/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::{
    DayResponse, GuestRequest, GuestResponse, PresetListResponse, PresetRequest, WeekQuery,
};
use crate::logic::{GuestTally, PlannedDay, WeekOverview};
use foodbot_common::{GuestEntry, MenuInput, MenuOfDay, PresetMenu};

#[utoipa::path(
    get,
    path = "/kitchen/menu/{date}",
    params(
        ("date" = String, Path, description = "Day in YYYY-MM-DD"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Menu of the day", body = MenuOfDay),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "No menu planned for that day")
    ),
    tag = "Kitchen"
)]
fn doc_get_menu_handler() {}

#[utoipa::path(
    put,
    path = "/kitchen/menu/{date}",
    request_body(content = MenuInput, example = json!({
        "two_menus": true,
        "menu1_name": "Schnitzel",
        "menu2_name": "Gemüsecurry",
        "registration_deadline": "09:30",
        "deadline_enabled": true
    })),
    params(
        ("date" = String, Path, description = "Day in YYYY-MM-DD"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Menu saved; saving again replaces it", body = MenuOfDay),
        (status = 400, description = "Malformed date or deadline"),
        (status = 401, description = "Missing or wrong admin password")
    ),
    tag = "Kitchen"
)]
fn doc_put_menu_handler() {}

#[utoipa::path(
    get,
    path = "/kitchen/week",
    params(
        WeekQuery,
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Monday to Sunday with planned menus", body = WeekOverview)
    ),
    tag = "Kitchen"
)]
fn doc_week_handler() {}

#[utoipa::path(
    post,
    path = "/kitchen/day/{date}",
    params(
        ("date" = String, Path, description = "Day in YYYY-MM-DD"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 201, description = "Empty menu created", body = DayResponse),
        (status = 200, description = "Day already planned, nothing changed", body = DayResponse)
    ),
    tag = "Kitchen"
)]
fn doc_add_day_handler() {}

#[utoipa::path(
    delete,
    path = "/kitchen/day/{date}",
    params(
        ("date" = String, Path, description = "Day in YYYY-MM-DD"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Menu and registrations of the day deleted", body = DayResponse),
        (status = 404, description = "No menu planned for that day")
    ),
    tag = "Kitchen"
)]
fn doc_delete_day_handler() {}

#[utoipa::path(
    post,
    path = "/kitchen/guests/{date}",
    request_body(content = GuestRequest, example = json!({ "option": 2, "delta": 1 })),
    params(
        ("date" = String, Path, description = "Day in YYYY-MM-DD"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Updated counter, clamped to 0..=max_guests", body = GuestResponse),
        (status = 400, description = "Neither delta nor count given")
    ),
    tag = "Kitchen"
)]
fn doc_update_guests_handler() {}

#[utoipa::path(
    get,
    path = "/kitchen/guests/{date}",
    params(
        ("date" = String, Path, description = "Day in YYYY-MM-DD"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "Guest counts per option", body = GuestTally)
    ),
    tag = "Kitchen"
)]
fn doc_get_guests_handler() {}

#[utoipa::path(
    get,
    path = "/kitchen/presets",
    params(("X-Admin-Password" = String, Header, description = "Shared admin secret.")),
    responses(
        (status = 200, description = "Preset dish names in pick-list order", body = PresetListResponse)
    ),
    tag = "Kitchen"
)]
fn doc_list_presets_handler() {}

#[utoipa::path(
    post,
    path = "/kitchen/presets",
    request_body(content = PresetRequest, example = json!({ "name": "Linsensuppe" })),
    params(("X-Admin-Password" = String, Header, description = "Shared admin secret.")),
    responses(
        (status = 201, description = "Preset appended to the list", body = PresetMenu),
        (status = 400, description = "Blank name"),
        (status = 409, description = "A preset with that name exists")
    ),
    tag = "Kitchen"
)]
fn doc_create_preset_handler() {}

#[utoipa::path(
    delete,
    path = "/kitchen/presets/{id}",
    params(
        ("id" = i64, Path, description = "Preset id"),
        ("X-Admin-Password" = String, Header, description = "Shared admin secret.")
    ),
    responses(
        (status = 200, description = "The removed preset", body = PresetMenu),
        (status = 404, description = "No preset with that id")
    ),
    tag = "Kitchen"
)]
fn doc_delete_preset_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_menu_handler,
        doc_put_menu_handler,
        doc_week_handler,
        doc_add_day_handler,
        doc_delete_day_handler,
        doc_update_guests_handler,
        doc_get_guests_handler,
        doc_list_presets_handler,
        doc_create_preset_handler,
        doc_delete_preset_handler
    ),
    components(schemas(
        MenuInput,
        MenuOfDay,
        WeekOverview,
        PlannedDay,
        DayResponse,
        GuestRequest,
        GuestResponse,
        GuestEntry,
        GuestTally,
        PresetRequest,
        PresetListResponse,
        PresetMenu
    )),
    tags((name = "Kitchen", description = "Menu planning, preset dishes and walk-in guests"))
)]
pub struct KitchenApiDoc;
