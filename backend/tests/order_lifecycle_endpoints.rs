//! End-to-end coverage for the order lifecycle.

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, test};
use serde_json::json;
use uuid::Uuid;

use nutrifix_backend::server::configure_api;
use nutrifix_backend::test_support::{sample_meal, test_backend};

macro_rules! init_app {
    ($backend:expr) => {
        test::init_service(App::new().configure(|cfg| configure_api(cfg, &$backend.services))).await
    };
}

macro_rules! register {
    ($app:expr, $email:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": "Ada", "email": $email, "password": "hunter2" }))
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: serde_json::Value = test::read_body_json(res).await;
        body["data"]["token"].as_str().expect("token").to_owned()
    }};
}

#[actix_web::test]
async fn create_order_snapshots_price_and_vendor() {
    let backend = test_backend();
    let meal = sample_meal("Grilled Chicken Bowl", 45.0, 50.0, 12.0, 250.0);
    let vendor_id = meal.vendor_id;
    let meal_id = backend.meals.insert(meal);
    let app = init_app!(backend);
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(json!({
            "mealId": meal_id,
            "quantity": 3,
            "deliveryAddress": "12 Baker Street"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Order created successfully");
    assert_eq!(body["data"]["totalPrice"], 750.0);
    assert_eq!(body["data"]["vendorId"], vendor_id.to_string());
    assert_eq!(body["data"]["status"], "pending");
    let order_id = body["data"]["id"].as_str().expect("id").to_owned();

    // Later price changes must not touch the stored snapshot.
    backend.meals.set_price(meal_id, 999.0);
    let req = test::TestRequest::get()
        .uri(&format!("/api/orders/{order_id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["order"]["totalPrice"], 750.0);
}

#[actix_web::test]
async fn create_order_requires_authentication() {
    let backend = test_backend();
    let meal_id = backend
        .meals
        .insert(sample_meal("Grilled Chicken Bowl", 45.0, 50.0, 12.0, 250.0));
    let app = init_app!(backend);

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(json!({
            "mealId": meal_id,
            "quantity": 1,
            "deliveryAddress": "12 Baker Street"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_order_with_missing_fields_is_rejected() {
    let backend = test_backend();
    let app = init_app!(backend);
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(json!({ "quantity": 1 }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(
        body["error"],
        "Missing required fields: mealId, quantity, deliveryAddress"
    );
}

#[actix_web::test]
async fn create_order_for_unknown_meal_is_not_found() {
    let backend = test_backend();
    let app = init_app!(backend);
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(json!({
            "mealId": Uuid::new_v4(),
            "quantity": 1,
            "deliveryAddress": "12 Baker Street"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Meal not found");
}

#[actix_web::test]
async fn listing_is_scoped_to_the_caller() {
    let backend = test_backend();
    let meal_id = backend
        .meals
        .insert(sample_meal("Grilled Chicken Bowl", 45.0, 50.0, 12.0, 250.0));
    let app = init_app!(backend);
    let ada = register!(app, "ada@example.com");
    let bob = register!(app, "bob@example.com");

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header((header::AUTHORIZATION, format!("Bearer {ada}")))
        .set_json(json!({
            "mealId": meal_id,
            "quantity": 1,
            "deliveryAddress": "12 Baker Street"
        }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CREATED
    );

    let req = test::TestRequest::get()
        .uri("/api/orders")
        .insert_header((header::AUTHORIZATION, format!("Bearer {bob}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["orders"].as_array().expect("array").len(), 0);
}

#[actix_web::test]
async fn foreign_orders_read_as_not_found() {
    let backend = test_backend();
    let meal_id = backend
        .meals
        .insert(sample_meal("Grilled Chicken Bowl", 45.0, 50.0, 12.0, 250.0));
    let app = init_app!(backend);
    let ada = register!(app, "ada@example.com");
    let bob = register!(app, "bob@example.com");

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header((header::AUTHORIZATION, format!("Bearer {ada}")))
        .set_json(json!({
            "mealId": meal_id,
            "quantity": 1,
            "deliveryAddress": "12 Baker Street"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(res).await;
    let order_id = body["data"]["id"].as_str().expect("id").to_owned();

    for method in ["get", "delete"] {
        let req = if method == "get" {
            test::TestRequest::get()
        } else {
            test::TestRequest::delete()
        }
        .uri(&format!("/api/orders/{order_id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {bob}")))
        .to_request();
        let res = test::call_service(&app, req).await;
        // Indistinguishable from a genuinely unknown order.
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["error"], "Order not found");
    }
}

#[actix_web::test]
async fn cancel_succeeds_once_then_conflicts() {
    let backend = test_backend();
    let meal_id = backend
        .meals
        .insert(sample_meal("Grilled Chicken Bowl", 45.0, 50.0, 12.0, 250.0));
    let app = init_app!(backend);
    let token = register!(app, "ada@example.com");

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .set_json(json!({
            "mealId": meal_id,
            "quantity": 1,
            "deliveryAddress": "12 Baker Street"
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(res).await;
    let order_id = body["data"]["id"].as_str().expect("id").to_owned();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/orders/{order_id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "Order cancelled successfully");
    assert_eq!(body["order"]["status"], "cancelled");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/orders/{order_id}"))
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Cannot cancel order with status: cancelled");
}
