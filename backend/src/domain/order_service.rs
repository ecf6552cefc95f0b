//! Order lifecycle: creation, user-scoped reads, and cancellation.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::{MealRepository, OrderRepository};

/// Order lifecycle manager.
///
/// The identity passed to every operation must come from a verified bearer
/// token, never from the request body.
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    meals: Arc<dyn MealRepository>,
}

impl OrderService {
    /// Create an order service from its repositories.
    pub fn new(orders: Arc<dyn OrderRepository>, meals: Arc<dyn MealRepository>) -> Self {
        Self { orders, meals }
    }

    /// Place an order for the authenticated user.
    ///
    /// The total price is `meal.price × quantity` snapshotted now; later
    /// meal price changes never touch existing orders. The vendor id is
    /// copied from the meal.
    pub async fn create(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        quantity: i32,
        delivery_address: &str,
    ) -> Result<Order, DomainError> {
        if quantity <= 0 {
            return Err(DomainError::invalid_request(
                "Quantity must be a positive integer",
            ));
        }
        let delivery_address = delivery_address.trim();
        if delivery_address.is_empty() {
            return Err(DomainError::invalid_request(
                "Delivery address must not be empty",
            ));
        }

        let meal = self
            .meals
            .find_by_id(meal_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Meal not found"))?
            .meal;

        let order = Order {
            id: Uuid::new_v4(),
            user_id,
            meal_id,
            vendor_id: meal.vendor_id,
            quantity,
            delivery_address: delivery_address.to_owned(),
            total_price: meal.price * f64::from(quantity),
            status: OrderStatus::Pending,
            ordered_at: Utc::now(),
        };
        self.orders.create(&order).await?;
        info!(order_id = %order.id, user_id = %user_id, "order created");
        Ok(order)
    }

    /// Fetch one of the user's orders. Missing and not-owned orders are
    /// indistinguishable to avoid leaking other users' order ids.
    pub async fn get_one(&self, order_id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        self.orders
            .find_for_user(order_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order not found"))
    }

    /// All of the user's orders, newest first.
    pub async fn get_all(&self, user_id: Uuid) -> Result<Vec<Order>, DomainError> {
        Ok(self.orders.list_for_user(user_id).await?)
    }

    /// Cancel one of the user's orders.
    ///
    /// Only pending and confirmed orders may be cancelled. The check and the
    /// update are two statements without a lock: two concurrent cancels can
    /// both observe a cancellable state and both succeed, which is a benign
    /// idempotent outcome and intentionally preserved.
    pub async fn cancel(&self, order_id: Uuid, user_id: Uuid) -> Result<Order, DomainError> {
        let order = self
            .orders
            .find_for_user(order_id, user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order not found"))?;

        if !order.status.is_cancellable() {
            return Err(DomainError::conflict(format!(
                "Cannot cancel order with status: {}",
                order.status
            )));
        }

        let cancelled = self
            .orders
            .update_status(order_id, OrderStatus::Cancelled)
            .await?;
        info!(order_id = %order_id, user_id = %user_id, "order cancelled");
        Ok(cancelled)
    }
}
