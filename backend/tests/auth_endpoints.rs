//! End-to-end coverage for registration and login.

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, test};
use serde_json::json;

use nutrifix_backend::server::configure_api;
use nutrifix_backend::test_support::test_backend;

macro_rules! init_app {
    ($backend:expr) => {
        test::init_service(App::new().configure(|cfg| configure_api(cfg, &$backend.services))).await
    };
}

#[actix_web::test]
async fn register_returns_session_and_hides_credential() {
    let backend = test_backend();
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": "Ada",
            "email": "Ada@Example.com",
            "password": "hunter2"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "ada@example.com");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    // The credential must never appear in any serialized form.
    let raw = body.to_string();
    assert!(!raw.contains("hunter2"));
    assert!(!raw.contains("password"));
}

#[actix_web::test]
async fn register_with_missing_fields_is_rejected() {
    let backend = test_backend();
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required fields: name, email, password");
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn duplicate_email_is_rejected_case_insensitively() {
    let backend = test_backend();
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "hunter2" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Imposter", "email": " ADA@Example.COM ", "password": "other" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Email already exists");
    assert_eq!(body["code"], "conflict");
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let backend = test_backend();
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "hunter2" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let wrong_password = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com", "password": "not-hunter2" }))
        .to_request();
    let res = test::call_service(&app, wrong_password).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let first: serde_json::Value = test::read_body_json(res).await;

    let unknown_email = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "nobody@example.com", "password": "hunter2" }))
        .to_request();
    let res = test::call_service(&app, unknown_email).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let second: serde_json::Value = test::read_body_json(res).await;

    assert_eq!(first["error"], "Invalid credentials");
    assert_eq!(first["error"], second["error"]);
    assert_eq!(first["code"], second["code"]);
}

#[actix_web::test]
async fn login_accepts_email_variants_and_token_grants_access() {
    let backend = test_backend();
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "hunter2" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "  ADA@EXAMPLE.COM ", "password": "hunter2" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    let token = body["data"]["token"].as_str().expect("token").to_owned();

    let req = test::TestRequest::get()
        .uri("/api/users/profile")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let profile: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(profile["data"]["email"], "ada@example.com");
}

#[actix_web::test]
async fn login_with_missing_fields_is_rejected() {
    let backend = test_backend();
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Email and password are required");
}
