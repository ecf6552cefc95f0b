//! Order lifecycle handlers. Every route requires a bearer token and is
//! scoped to the authenticated user.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::{DomainError, OrderService};
use crate::middleware::AuthenticatedUser;

/// Order creation payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    /// Meal to order.
    pub meal_id: Option<Uuid>,
    /// Number of portions.
    pub quantity: Option<i32>,
    /// Where to deliver.
    pub delivery_address: Option<String>,
}

/// Order as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    /// Order identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Ordered meal.
    pub meal_id: Uuid,
    /// Fulfilling vendor, copied from the meal at creation time.
    pub vendor_id: Uuid,
    /// Number of portions.
    pub quantity: i32,
    /// Delivery address.
    pub delivery_address: String,
    /// Price snapshot taken at creation time.
    pub total_price: f64,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub ordered_at: DateTime<Utc>,
}

impl From<Order> for OrderDto {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            meal_id: order.meal_id,
            vendor_id: order.vendor_id,
            quantity: order.quantity,
            delivery_address: order.delivery_address,
            total_price: order.total_price,
            status: order.status,
            ordered_at: order.ordered_at,
        }
    }
}

/// Envelope for order creation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCreatedEnvelope {
    /// Always `true` on success.
    pub success: bool,
    /// Confirmation message.
    pub message: String,
    /// The created order.
    pub data: OrderDto,
}

/// Envelope for the order listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListEnvelope {
    /// The caller's orders, newest first.
    pub orders: Vec<OrderDto>,
}

/// Envelope for a single order.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderEnvelope {
    /// The requested order.
    pub order: OrderDto,
}

/// Envelope for cancellation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCancelledEnvelope {
    /// Confirmation message.
    pub message: String,
    /// The cancelled order.
    pub order: OrderDto,
}

/// Place an order for the authenticated user.
#[utoipa::path(
    post,
    path = "/api/orders",
    tags = ["orders"],
    request_body = CreateOrderBody,
    responses(
        (status = 201, description = "Order created", body = OrderCreatedEnvelope),
        (status = 400, description = "Missing fields or invalid quantity"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Unknown meal")
    )
)]
#[post("/api/orders")]
pub async fn create_order(
    user: AuthenticatedUser,
    service: web::Data<OrderService>,
    body: web::Json<CreateOrderBody>,
) -> ApiResult<HttpResponse> {
    let body = body.into_inner();
    let (Some(meal_id), Some(quantity), Some(delivery_address)) =
        (body.meal_id, body.quantity, body.delivery_address)
    else {
        return Err(DomainError::invalid_request(
            "Missing required fields: mealId, quantity, deliveryAddress",
        )
        .into());
    };

    let order = service
        .create(user.user_id, meal_id, quantity, &delivery_address)
        .await?;
    Ok(HttpResponse::Created().json(OrderCreatedEnvelope {
        success: true,
        message: "Order created successfully".to_owned(),
        data: order.into(),
    }))
}

/// List the authenticated user's orders, newest first.
#[utoipa::path(
    get,
    path = "/api/orders",
    tags = ["orders"],
    responses(
        (status = 200, description = "Order listing", body = OrderListEnvelope),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[get("/api/orders")]
pub async fn list_orders(
    user: AuthenticatedUser,
    service: web::Data<OrderService>,
) -> ApiResult<HttpResponse> {
    let orders = service.get_all(user.user_id).await?;
    Ok(HttpResponse::Ok().json(OrderListEnvelope {
        orders: orders.into_iter().map(OrderDto::from).collect(),
    }))
}

/// Fetch one of the authenticated user's orders.
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tags = ["orders"],
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "The order", body = OrderEnvelope),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Unknown or foreign order")
    )
)]
#[get("/api/orders/{id}")]
pub async fn get_order(
    user: AuthenticatedUser,
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let order = service.get_one(path.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(OrderEnvelope {
        order: order.into(),
    }))
}

/// Cancel one of the authenticated user's orders.
///
/// Only pending and confirmed orders can be cancelled; anything further
/// along the lifecycle is rejected.
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tags = ["orders"],
    params(("id" = Uuid, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Order cancelled", body = OrderCancelledEnvelope),
        (status = 400, description = "Order is past the cancellable states"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Unknown or foreign order")
    )
)]
#[delete("/api/orders/{id}")]
pub async fn cancel_order(
    user: AuthenticatedUser,
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let order = service.cancel(path.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(OrderCancelledEnvelope {
        message: "Order cancelled successfully".to_owned(),
        order: order.into(),
    }))
}
