mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_event(app: &TestApp, auth: &AuthHeaders, extra: Value) -> String {
    let mut payload = json!({
        "title": "Climbing Session",
        "date": "2026-09-20",
        "time": "10:00",
        "location": "The gym"
    });
    payload.as_object_mut().unwrap().extend(extra.as_object().unwrap().clone());

    let res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/v1/events")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap(),
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn submit_rsvp(app: &TestApp, event_id: &str, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/events/{}/rsvp", event_id))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap(),
    ).await.unwrap()
}

#[tokio::test]
async fn test_resubmission_updates_in_place() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;
    let event_id = create_event(&app, &auth, json!({})).await;

    let first = submit_rsvp(&app, &event_id, json!({
        "name": "Sam",
        "email": "Sam@Example.com",
        "will_attend": true
    })).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first_body = parse_body(first).await;

    // Same person changes their mind; casing differs on purpose
    let second = submit_rsvp(&app, &event_id, json!({
        "name": "Sam Smith",
        "email": "sam@example.com",
        "will_attend": false,
        "message": "Can't make it after all"
    })).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second_body = parse_body(second).await;

    assert_eq!(first_body["id"], second_body["id"]);
    assert_eq!(second_body["will_attend"], false);
    assert_eq!(second_body["name"], "Sam Smith");
    assert_eq!(second_body["email"], "sam@example.com");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rsvp_responses WHERE event_id = ?")
        .bind(&event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_anonymous_responses_are_never_merged() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;
    let event_id = create_event(&app, &auth, json!({})).await;

    for name in ["Guest One", "Guest Two"] {
        let res = submit_rsvp(&app, &event_id, json!({
            "name": name,
            "will_attend": true
        })).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rsvp_responses WHERE event_id = ?")
        .bind(&event_id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_token_burns_only_on_successful_submission() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;
    let event_id = create_event(&app, &auth, json!({"access_mode": "PRIVATE"})).await;

    let token_res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/events/{}/tokens", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"email": null}).to_string())).unwrap(),
    ).await.unwrap();
    let token = parse_body(token_res).await["token"].as_str().unwrap().to_string();

    // A failed submission (blank name) must not consume the token
    let bad = submit_rsvp(&app, &event_id, json!({
        "name": "",
        "will_attend": true,
        "token": token
    })).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    // Nor does probing the access endpoint
    let probe = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/events/{}/access?token={}", event_id, token))
            .body(Body::empty()).unwrap(),
    ).await.unwrap();
    assert_eq!(parse_body(probe).await["can_submit_rsvp"], true);

    // The real submission consumes it
    let good = submit_rsvp(&app, &event_id, json!({
        "name": "Holder",
        "will_attend": true,
        "token": token
    })).await;
    assert_eq!(good.status(), StatusCode::CREATED);

    let used_at: Option<String> = sqlx::query_scalar("SELECT used_at FROM rsvp_tokens WHERE token = ?")
        .bind(&token)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(used_at.is_some());

    // And a second use is refused
    let replay = submit_rsvp(&app, &event_id, json!({
        "name": "Freeloader",
        "will_attend": true,
        "token": token
    })).await;
    assert_eq!(replay.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_open_event_ignores_supplied_token() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;
    let event_id = create_event(&app, &auth, json!({"access_mode": "PUBLIC"})).await;

    let token_res = app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/events/{}/tokens", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"email": null}).to_string())).unwrap(),
    ).await.unwrap();
    let token = parse_body(token_res).await["token"].as_str().unwrap().to_string();

    let res = submit_rsvp(&app, &event_id, json!({
        "name": "Open Door",
        "will_attend": true,
        "token": token
    })).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Access was granted by the open mode, so the token survives
    let used_at: Option<String> = sqlx::query_scalar("SELECT used_at FROM rsvp_tokens WHERE token = ?")
        .bind(&token)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(used_at.is_none());
}

#[tokio::test]
async fn test_invitee_status_reflects_latest_response() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;
    let event_id = create_event(&app, &auth, json!({"access_mode": "PRIVATE"})).await;

    app.router.clone().oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/events/{}/invitees", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"email": "carol@example.com"}).to_string())).unwrap(),
    ).await.unwrap();

    let accept = submit_rsvp(&app, &event_id, json!({
        "name": "Carol",
        "email": "carol@example.com",
        "will_attend": true
    })).await;
    assert_eq!(accept.status(), StatusCode::CREATED);

    let status: String = sqlx::query_scalar("SELECT rsvp_status FROM invitees WHERE event_id = ? AND email = ?")
        .bind(&event_id).bind("carol@example.com")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(status, "ATTENDING");

    let decline = submit_rsvp(&app, &event_id, json!({
        "name": "Carol",
        "email": "carol@example.com",
        "will_attend": false
    })).await;
    assert_eq!(decline.status(), StatusCode::CREATED);

    let status: String = sqlx::query_scalar("SELECT rsvp_status FROM invitees WHERE event_id = ? AND email = ?")
        .bind(&event_id).bind("carol@example.com")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(status, "DECLINED");
}

#[tokio::test]
async fn test_participants_are_owner_only_and_ordered() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;
    let other = app.register_and_login("rival@example.com", "hunter2secret").await;
    let event_id = create_event(&app, &auth, json!({})).await;

    for (i, name) in ["First", "Second", "Third"].iter().enumerate() {
        let res = submit_rsvp(&app, &event_id, json!({
            "name": name,
            "email": format!("guest{}@example.com", i),
            "will_attend": true
        })).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let denied = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/events/{}/participants", event_id))
            .header(header::COOKIE, format!("access_token={}", other.access_token))
            .body(Body::empty()).unwrap(),
    ).await.unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let allowed = app.router.clone().oneshot(
        Request::builder()
            .method("GET")
            .uri(format!("/api/v1/events/{}/participants", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap(),
    ).await.unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);

    let list = parse_body(allowed).await;
    let names: Vec<&str> = list.as_array().unwrap().iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_rsvp_rejected_on_cancelled_event() {
    let app = TestApp::new().await;
    let auth = app.register_and_login("host@example.com", "hunter2secret").await;
    let event_id = create_event(&app, &auth, json!({})).await;

    let cancel_res = app.router.clone().oneshot(
        Request::builder()
            .method("PUT")
            .uri(format!("/api/v1/events/{}/status", event_id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"status": "CANCELLED"}).to_string())).unwrap(),
    ).await.unwrap();
    assert_eq!(cancel_res.status(), StatusCode::OK);

    let res = submit_rsvp(&app, &event_id, json!({
        "name": "Too Late",
        "will_attend": true
    })).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
