mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_full_event_flow_public_access() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;

    // Create a public event
    let event_payload = json!({
        "title": "Board Game Night",
        "date": "2026-10-01",
        "time": "19:00",
        "location": "My place",
        "details": "Bring snacks",
        "punishment": "You do the dishes for a month",
        "access_mode": "PUBLIC",
        "page_visibility": "PUBLIC"
    });

    let event_res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(event_payload.to_string())).unwrap(),
    ).await.unwrap();
    assert_eq!(event_res.status(), StatusCode::CREATED);

    let event = parse_body(event_res).await;
    let event_id = event["id"].as_str().unwrap().to_string();
    assert_eq!(event["status"], "ACTIVE");
    assert_eq!(event["owner_email"], "host@example.com");

    // Anonymous guest can view the page
    let view_res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/events/{}", event_id))
            .body(Body::empty()).unwrap(),
    ).await.unwrap();
    assert_eq!(view_res.status(), StatusCode::OK);

    // Anonymous guest can RSVP
    let rsvp_res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/events/{}/rsvp", event_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Dana",
                "email": "dana@example.com",
                "will_attend": true,
                "message": "Bringing dip"
            }).to_string())).unwrap(),
    ).await.unwrap();
    assert_eq!(rsvp_res.status(), StatusCode::CREATED);

    let saved = parse_body(rsvp_res).await;
    assert_eq!(saved["will_attend"], true);
    assert_eq!(saved["email"], "dana@example.com");

    // Host sees the participant
    let list_res = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/events/{}/participants", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap(),
    ).await.unwrap();
    assert_eq!(list_res.status(), StatusCode::OK);

    let participants = parse_body(list_res).await;
    let list = participants.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Dana");
}

#[tokio::test]
async fn test_event_not_found_returns_404() {
    let app = TestApp::new().await;

    let response = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri("/api/v1/events/no-such-event")
            .body(Body::empty()).unwrap(),
    ).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rsvp_requires_name() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host2@example.com", "hunter2secret").await;

    let event_res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "title": "Potluck",
                "date": "2026-11-05",
                "time": "18:00",
                "location": "Park"
            }).to_string())).unwrap(),
    ).await.unwrap();
    let event = parse_body(event_res).await;
    let event_id = event["id"].as_str().unwrap();

    let rsvp_res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/events/{}/rsvp", event_id))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "   ",
                "will_attend": true
            }).to_string())).unwrap(),
    ).await.unwrap();

    assert_eq!(rsvp_res.status(), StatusCode::BAD_REQUEST);
}
