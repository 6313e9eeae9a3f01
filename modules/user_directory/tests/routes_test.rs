//! REST surface driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use user_directory::api::rest::dto::UserViewDto;
use user_directory::api::rest::error::APPLICATION_PROBLEM_JSON;
use user_directory::api::rest::handlers::UsersApiState;
use user_directory::api::rest::routes::router;
use user_directory::domain::engine::EngineConfig;
use user_directory::infra::seed::server_seed;

fn test_router() -> Router {
    let state = UsersApiState::new(server_seed(), EngineConfig::default(), Duration::ZERO);
    router(Arc::new(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&body)?)
}

#[tokio::test]
async fn health_reports_running() -> Result<()> {
    let response = test_router().oneshot(get("/api/health")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await?;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "API is running");
    assert!(json["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn list_users_returns_full_seed() -> Result<()> {
    let response = test_router().oneshot(get("/api/users")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await?;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 10);

    let first = &json["data"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["name"], "John Doe");
    assert_eq!(first["email"], "john.doe@example.com");
    assert_eq!(first["status"], "active");
    assert_eq!(first["joinDate"], "2023-01-15");
    assert!(json.get("message").is_none());
    Ok(())
}

#[tokio::test]
async fn list_users_waits_for_configured_latency() -> Result<()> {
    let state = UsersApiState::new(
        server_seed(),
        EngineConfig::default(),
        Duration::from_millis(50),
    );
    let started = std::time::Instant::now();
    let response = router(Arc::new(state)).oneshot(get("/api/users")).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(started.elapsed() >= Duration::from_millis(50));
    Ok(())
}

#[tokio::test]
async fn view_filters_sorts_and_pages() -> Result<()> {
    let uri = "/api/users/view?department=Engineering&sort=joinDate&direction=desc&per_page=2&page=2";
    let response = test_router().oneshot(get(uri)).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let view: UserViewDto = serde_json::from_slice(&body)?;

    assert_eq!(view.count, 4);
    assert_eq!(view.page, 2);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.items_per_page, 2);
    let names: Vec<&str> = view.data.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Diana Prince", "John Doe"]);

    // Statistics always describe the whole set.
    assert_eq!(view.statistics.total, 10);
    assert_eq!(view.statistics.active, 8);
    assert_eq!(view.statistics.inactive, 2);
    Ok(())
}

#[tokio::test]
async fn view_defaults_to_name_ascending_first_page() -> Result<()> {
    let response = test_router().oneshot(get("/api/users/view")).await?;
    let json = body_json(response).await?;

    assert_eq!(json["page"], 1);
    assert_eq!(json["itemsPerPage"], 5);
    assert_eq!(json["totalPages"], 2);
    assert_eq!(json["count"], 10);
    assert_eq!(json["data"][0]["name"], "Alice Williams");
    Ok(())
}

#[tokio::test]
async fn view_clamps_page_past_the_end() -> Result<()> {
    let response = test_router()
        .oneshot(get("/api/users/view?status=inactive&page=99"))
        .await?;
    let json = body_json(response).await?;

    assert_eq!(json["count"], 2);
    assert_eq!(json["page"], 1);
    assert_eq!(json["totalPages"], 1);
    Ok(())
}

#[tokio::test]
async fn view_with_no_matches_still_has_one_page() -> Result<()> {
    let response = test_router()
        .oneshot(get("/api/users/view?search=nobody"))
        .await?;
    let json = body_json(response).await?;

    assert_eq!(json["count"], 0);
    assert_eq!(json["totalPages"], 1);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn unknown_sort_field_is_a_problem() -> Result<()> {
    let response = test_router()
        .oneshot(get("/api/users/view?sort=salary"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        APPLICATION_PROBLEM_JSON
    );

    let json = body_json(response).await?;
    assert_eq!(json["status"], 400);
    assert_eq!(json["code"], "USERS_INVALID_SORT");
    assert_eq!(json["instance"], "/api/users/view");
    Ok(())
}

#[tokio::test]
async fn zero_page_size_is_a_problem() -> Result<()> {
    let response = test_router()
        .oneshot(get("/api/users/view?per_page=0"))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await?;
    assert_eq!(json["code"], "USERS_INVALID_PAGE_SIZE");
    Ok(())
}

#[tokio::test]
async fn cors_allows_any_origin() -> Result<()> {
    let request = Request::builder()
        .method("GET")
        .uri("/api/users")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())?;
    let response = test_router().oneshot(request).await?;

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_see_the_same_records() -> Result<()> {
    let app = test_router();
    let (users, view) = tokio::join!(
        app.clone().oneshot(get("/api/users")),
        app.clone().oneshot(get("/api/users/view?per_page=10")),
    );

    let users = body_json(users?).await?;
    let view = body_json(view?).await?;
    assert_eq!(users["count"], 10);
    assert_eq!(view["count"], 10);
    assert_eq!(view["statistics"]["total"], 10);
    Ok(())
}
