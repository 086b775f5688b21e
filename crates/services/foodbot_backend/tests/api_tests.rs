
use axum::http::StatusCode;
use fixtures::{config, create_test_app, send};
use serde_json::json;

#[tokio::test]
async fn test_health_reports_database() {
    let (app, _repos) = create_test_app(config(false)).await;
    let (status, body) = send(&app, "GET", "/api/health", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_admin_routes_need_a_password() {
    let (app, _repos) = create_test_app(config(false)).await;
    let (status, _) = send(&app, "GET", "/api/kitchen/week", None, false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (app, _repos) = create_test_app(config(true)).await;
    let (status, _) = send(&app, "GET", "/api/admin/log", None, false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, "GET", "/api/admin/log", None, true).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_day_from_menu_to_status() {
    let (app, _repos) = create_test_app(config(true)).await;

    let (status, user) = send(
        &app,
        "POST",
        "/api/admin/users",
        Some(json!({ "name": "Anna Berg", "personal_number": "4711" })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["name"], "Anna Berg");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/kitchen/menu/2026-03-02",
        Some(json!({
            "two_menus": true,
            "menu1_name": "Schnitzel",
            "menu2_name": "Gemüsecurry"
        })),
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({ "kiosk_input": "4711" })),
        false,
    )
    .await;
    assert_eq!(body["outcome"], "needs_choice");

    let (_, body) = send(
        &app,
        "POST",
        "/api/register/choice",
        Some(json!({ "personal_number": "4711", "option": 2 })),
        false,
    )
    .await;
    assert_eq!(body["outcome"], "registered");

    let (status, body) = send(&app, "GET", "/api/status", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registrations_option2"], 1);
    assert_eq!(body["total"], 1);
    assert_eq!(body["menu"], "Schnitzel / Gemüsecurry");
}

#[tokio::test]
async fn test_register_and_status_are_rate_limited() {
    let (app, _repos) = create_test_app(config(false)).await;

    for _ in 0..10 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/register",
            Some(json!({ "kiosk_input": "0000" })),
            false,
        )
        .await;
        assert_ne!(status, StatusCode::TOO_MANY_REQUESTS);
    }
    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({ "kiosk_input": "0000" })),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], 429);

    // The second step of a two-menu sign-up has no budget of its own.
    let (status, _) = send(
        &app,
        "POST",
        "/api/register/choice",
        Some(json!({ "kiosk_input": "0000", "option": 1 })),
        false,
    )
    .await;
    assert_ne!(status, StatusCode::TOO_MANY_REQUESTS);

    for _ in 0..30 {
        let (status, _) = send(&app, "GET", "/api/status", None, false).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = send(&app, "GET", "/api/status", None, false).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    // Unlimited endpoints keep answering.
    let (status, _) = send(&app, "GET", "/api/health", None, false).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limit_can_be_switched_off() {
    let mut config = config(false);
    config.rate_limit.enabled = false;
    let (app, _repos) = create_test_app(config).await;

    for _ in 0..40 {
        let (status, _) = send(&app, "GET", "/api/status", None, false).await;
        assert_eq!(status, StatusCode::OK);
    }
}
