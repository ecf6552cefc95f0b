//! Order aggregate and its status state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle states of an order.
///
/// Transitions are monotonic along `pending -> confirmed -> delivered`, with
/// `pending`/`confirmed -> cancelled` as the user-initiated branch. The
/// confirmed and delivered transitions are driven by a vendor/admin surface
/// outside this core; only cancellation is implemented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Newly created, awaiting vendor confirmation.
    Pending,
    /// Accepted by the vendor.
    Confirmed,
    /// Terminal: handed over to the customer.
    Delivered,
    /// Terminal: cancelled before delivery.
    Cancelled,
}

/// Error returned when decoding an unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status: {0}")]
pub struct UnknownOrderStatus(pub String);

impl OrderStatus {
    /// Wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// True for states with no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// True when a user-initiated cancel is allowed from this state.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownOrderStatus(other.to_owned())),
        }
    }
}

/// A placed order.
///
/// ## Invariants
/// - `vendor_id` is copied from the referenced meal at creation and never
///   edited independently.
/// - `total_price` is the meal price at creation times `quantity`; later
///   meal price changes must not affect it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    /// Primary identifier.
    pub id: Uuid,
    /// Ordering user.
    pub user_id: Uuid,
    /// Ordered meal.
    pub meal_id: Uuid,
    /// Vendor owning the meal at creation time.
    pub vendor_id: Uuid,
    /// Number of portions; always positive.
    pub quantity: i32,
    /// Delivery address supplied by the user.
    pub delivery_address: String,
    /// Price snapshot: meal price at creation × quantity.
    pub total_price: f64,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Creation timestamp.
    pub ordered_at: DateTime<Utc>,
}
