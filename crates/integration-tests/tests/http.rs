//! The admin router end to end, with in-memory stores and sessions.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;

use garuda_admin::middleware::SESSION_COOKIE_NAME;
use garuda_integration_tests::{
    Harness, PASSWORD, body_json, empty_request, json_request, session_cookie,
};

const EMAIL: &str = "office@garudadhruvam.org";

/// Log in through the JSON endpoint and return the session cookie.
async fn login(harness: &Harness, app: &axum::Router) -> String {
    harness.admin(EMAIL).await;
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": EMAIL, "password": PASSWORD }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

fn multipart(content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "garuda-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"upload.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

// =============================================================================
// Unauthenticated
// =============================================================================

#[tokio::test]
async fn test_api_without_session_is_unauthorized() {
    let harness = Harness::new();
    let app = harness.router();

    for (method, uri) in [
        ("GET", "/api/content"),
        ("GET", "/api/donations"),
        ("GET", "/api/dashboard/stats"),
        ("DELETE", "/api/programs/7c9e6679-7425-40de-944b-e07fc1f90ae7?confirm=true"),
    ] {
        let response = app
            .clone()
            .oneshot(empty_request(method, uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/content/hero",
            None,
            &json!({ "title": "Hijacked" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(harness.sections.write_count(), 0);
}

#[tokio::test]
async fn test_dashboard_page_redirects_to_login() {
    let harness = Harness::new();

    let response = harness
        .router()
        .oneshot(empty_request("GET", "/", None))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/auth/login"
    );
}

#[tokio::test]
async fn test_login_page_renders() {
    let harness = Harness::new();

    let response = harness
        .router()
        .oneshot(empty_request("GET", "/auth/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-frame-options"));
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let harness = Harness::new();
    harness.admin(EMAIL).await;

    let response = harness
        .router()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({ "email": EMAIL, "password": "definitely-not-it" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Authenticated
// =============================================================================

#[tokio::test]
async fn test_session_cookie_is_issued_on_login() {
    let harness = Harness::new();
    let app = harness.router();

    let cookie = login(&harness, &app).await;
    assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=")));

    let response = app
        .oneshot(empty_request("GET", "/api/auth/session", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["email"], EMAIL);
}

#[tokio::test]
async fn test_content_write_then_read() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;
    let payload = json!({ "title": "Seva Begins at Home", "cta_primary": "Volunteer" });

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/content/hero", Some(&cookie), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/content/hero", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["content"], payload);

    let response = app
        .oneshot(empty_request("GET", "/api/content/mission", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_content_is_bad_request() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/api/content/stats",
            Some(&cookie),
            &json!({ "villages": -3 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
    assert_eq!(harness.sections.write_count(), 0);
}

#[tokio::test]
async fn test_duplicate_volunteer_email_is_conflict() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;

    let register = |email: &str| {
        json_request(
            "POST",
            "/api/volunteers",
            Some(&cookie),
            &json!({ "full_name": "Kavya", "email": email }),
        )
    };

    let response = app.clone().oneshot(register("kavya@example.in")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(register("KAVYA@example.in")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_json(response).await["error"].as_str().unwrap().contains("already exists"));

    let response = app
        .oneshot(empty_request("GET", "/api/volunteers", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_donation_crud_with_confirmed_delete() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/donations",
            Some(&cookie),
            &json!({ "donor_name": "Meera", "amount": "0" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.donations.write_count(), 0);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/donations",
            Some(&cookie),
            &json!({ "donor_name": "Meera", "amount": "1500", "purpose": "temple_restoration" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let uri = format!("/api/donations/{}", created["id"].as_str().unwrap());

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("{uri}?confirm=true"), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", &uri, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_entity_body_is_bad_request() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/events",
            Some(&cookie),
            &json!({ "title": "Ugadi", "event_date": "next tuesday" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.events.write_count(), 0);
}

#[tokio::test]
async fn test_dashboard_stats_after_login() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;

    let response = app
        .oneshot(empty_request("GET", "/api/dashboard/stats", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let stats = body_json(response).await;
    assert_eq!(stats["programs"], 0);
    assert_eq!(stats["donation_totals"], json!([]));
}

#[tokio::test]
async fn test_non_image_upload_is_unsupported_media_type() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;
    let (content_type, body) = multipart("text/plain", b"not an image");

    let request = Request::builder()
        .method("POST")
        .uri("/api/uploads/gallery-images")
        .header(header::CONTENT_TYPE, content_type)
        .header(header::COOKIE, &cookie)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(harness.objects.put_count(), 0);
}

#[tokio::test]
async fn test_image_upload_is_created() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;
    let (content_type, body) = multipart("image/png", b"\x89PNG\r\n\x1a\n");

    let request = Request::builder()
        .method("POST")
        .uri("/api/uploads/event-images")
        .header(header::CONTENT_TYPE, content_type)
        .header(header::COOKIE, &cookie)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["bucket"], "event-images");
    assert_eq!(harness.objects.put_count(), 1);
}

#[tokio::test]
async fn test_svg_upload_is_refused() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;
    let (content_type, body) = multipart(
        "image/svg+xml",
        b"<svg xmlns='http://www.w3.org/2000/svg'><script>fetch('/api/auth/session')</script></svg>",
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/uploads/gallery-images")
        .header(header::CONTENT_TYPE, content_type)
        .header(header::COOKIE, &cookie)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(harness.objects.put_count(), 0);
}

#[tokio::test]
async fn test_uploaded_files_are_sandboxed() {
    let root = std::env::temp_dir().join(format!(
        "gd-served-uploads-{}-{}",
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    std::fs::create_dir_all(root.join("gallery-images")).unwrap();
    std::fs::write(root.join("gallery-images/1-abc.png"), b"\x89PNG\r\n\x1a\n").unwrap();
    let app = axum::Router::new().nest_service(
        "/uploads",
        garuda_admin::routes::uploaded_files(&root),
    );

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/uploads/gallery-images/1-abc.png", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[header::CONTENT_SECURITY_POLICY],
        "default-src 'none'; sandbox"
    );
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");

    let missing = app
        .oneshot(empty_request("GET", "/uploads/gallery-images/none.png", None))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&root).unwrap();
}

#[tokio::test]
async fn test_logout_ends_session() {
    let harness = Harness::new();
    let app = harness.router();
    let cookie = login(&harness, &app).await;

    let response = app
        .clone()
        .oneshot(empty_request("POST", "/auth/logout", Some(&cookie)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let response = app
        .oneshot(empty_request("GET", "/api/auth/session", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
