mod common;

use axum::http::{header, Method, StatusCode};
use common::*;
use serde_json::json;
use serial_test::serial;
use uuid::Uuid;

const IMAGE_PATH: &str = "/api/profile/image";

#[tokio::test]
#[serial]
async fn test_update_own_profile_image() {
    let Some(app) = test_app(&[]) else {
        return;
    };
    let (_, token) = signup(&app, "cook").await;

    let response = send(
        &app,
        Method::PUT,
        IMAGE_PATH,
        Some(&token),
        Some(json!({"image_url": "/static/uploads/me.png"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"message": "Profile image updated"}));

    let me = send(&app, Method::GET, "/api/profile/me", Some(&token), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["profile_image_url"], "/static/uploads/me.png");
}

#[tokio::test]
#[serial]
async fn test_missing_or_non_string_url() {
    let Some(app) = test_app(&[]) else {
        return;
    };
    let (_, token) = signup(&app, "cook").await;

    for body in [json!({}), json!({"image_url": ""}), json!({"image_url": 42})] {
        let response = send(&app, Method::PUT, IMAGE_PATH, Some(&token), Some(body)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({"error": "Invalid image url"}));
    }
}

#[tokio::test]
#[serial]
async fn test_unsafe_urls_rejected() {
    let Some(app) = test_app(&[]) else {
        return;
    };
    let (_, token) = signup(&app, "cook").await;

    for url in [
        "javascript:alert(1)",
        "data:text/html,<script>x</script>",
        "/static/../../../etc/passwd",
        "https://evil.example/x.png",
        "/static/uploads/../../etc/passwd.png",
        "/static/uploads/a.png\" onerror=\"alert(1)",
        "/static/uploads/a/b/c/d.png",
        "/static/uploads/shell.php",
    ] {
        let response = send(
            &app,
            Method::PUT,
            IMAGE_PATH,
            Some(&token),
            Some(json!({"image_url": url})),
        )
        .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{url}");
        let error = response.body["error"].as_str().unwrap();
        assert!(
            error.starts_with("Invalid or unsafe image URL: "),
            "{url}: {error}"
        );
    }
}

#[tokio::test]
#[serial]
async fn test_other_users_profile_is_forbidden() {
    let Some(app) = test_app(&[]) else {
        return;
    };
    let (_, token) = signup(&app, "cook").await;
    let (other, _) = signup(&app, "baker").await;

    for target in [other, Uuid::new_v4()] {
        let response = send(
            &app,
            Method::PUT,
            IMAGE_PATH,
            Some(&token),
            Some(json!({"image_url": "/static/uploads/me.png", "user_id": target})),
        )
        .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert_eq!(response.body, json!({"error": "Unauthorized"}));
    }
}

#[tokio::test]
#[serial]
async fn test_ownership_checked_before_url() {
    let Some(app) = test_app(&[]) else {
        return;
    };
    let (_, token) = signup(&app, "cook").await;
    let (other, _) = signup(&app, "baker").await;

    let response = send(
        &app,
        Method::PUT,
        IMAGE_PATH,
        Some(&token),
        Some(json!({"image_url": "javascript:alert(1)", "user_id": other})),
    )
    .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn test_requires_authentication() {
    let Some(app) = test_app(&[]) else {
        return;
    };

    let response = send(
        &app,
        Method::PUT,
        IMAGE_PATH,
        None,
        Some(json!({"image_url": "/static/uploads/me.png"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Method::PUT,
        IMAGE_PATH,
        Some("not-a-real-token"),
        Some(json!({"image_url": "/static/uploads/me.png"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn test_rate_limited_per_user() {
    let Some(app) = test_app(&[("RECIPEZ_PROFILE_RATE_LIMIT", "2")]) else {
        return;
    };
    let (_, token) = signup(&app, "cook").await;
    let (_, other_token) = signup(&app, "baker").await;
    let body = json!({"image_url": "/static/img/default_user.png"});

    for _ in 0..2 {
        let response = send(&app, Method::PUT, IMAGE_PATH, Some(&token), Some(body.clone())).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = send(&app, Method::PUT, IMAGE_PATH, Some(&token), Some(body.clone())).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers[header::RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);

    // Each user has their own budget
    let response = send(&app, Method::PUT, IMAGE_PATH, Some(&other_token), Some(body)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
#[serial]
async fn test_security_headers_on_api_responses() {
    let Some(app) = test_app(&[]) else {
        return;
    };

    let response = send(&app, Method::PUT, IMAGE_PATH, None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert!(response.headers.contains_key("content-security-policy"));
    assert!(!response.headers.contains_key("strict-transport-security"));

    let response = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(response.headers["x-frame-options"], "DENY");
}

#[tokio::test]
#[serial]
async fn test_hsts_when_cookies_are_secure() {
    let Some(app) = test_app(&[("SESSION_COOKIE_SECURE", "true")]) else {
        return;
    };

    let response = send(&app, Method::GET, "/health", None, None).await;
    assert!(response.headers.contains_key("strict-transport-security"));
}
