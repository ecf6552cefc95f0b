//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the PostgreSQL repositories and the completion-service client). Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::meal::{MacroWindows, MealWithVendor};
use super::order::{Order, OrderStatus};
use super::user::{ProfileChanges, User};

/// Persistence errors raised by repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Repository connection could not be established or checked out.
    #[error("repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure description.
        message: String,
    },
    /// A uniqueness constraint was violated.
    #[error("repository conflict: {message}")]
    Conflict {
        /// Adapter-level failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("repository query failed: {message}")]
    Query {
        /// Adapter-level failure description.
        message: String,
    },
}

impl RepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for uniqueness violations.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<RepositoryError> for super::DomainError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Connection { message } => Self::service_unavailable(message),
            RepositoryError::Conflict { message } => Self::conflict(message),
            RepositoryError::Query { message } => Self::internal(message),
        }
    }
}

/// Persistence port for user aggregates.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a freshly registered user.
    async fn create(&self, user: &User) -> Result<(), RepositoryError>;

    /// Look up a user by normalized e-mail address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Look up a user by identifier.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Apply a partial profile update, returning the updated record when the
    /// user exists.
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, RepositoryError>;
}

/// Persistence port for the meal catalogue.
#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Full catalogue joined with vendor summaries, newest first.
    async fn list_with_vendor(&self) -> Result<Vec<MealWithVendor>, RepositoryError>;

    /// Single meal joined with its vendor summary.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<MealWithVendor>, RepositoryError>;

    /// Available meals whose macros fall inside every window. Bounds are
    /// inclusive on both ends of each axis.
    async fn find_available_within(
        &self,
        windows: &MacroWindows,
    ) -> Result<Vec<MealWithVendor>, RepositoryError>;
}

/// Persistence port for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist a new order.
    async fn create(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Fetch an order only when it belongs to the given user.
    async fn find_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, RepositoryError>;

    /// All orders for a user, ordered by `ordered_at` descending.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, RepositoryError>;

    /// Set an order's status with a single UPDATE, returning the updated
    /// record. Deliberately unconditional: the caller performs the
    /// state-machine check, and concurrent double-cancel stays benign.
    async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError>;
}

/// Errors surfaced by the completion-service client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The HTTP request failed to complete.
    #[error("completion transport failed: {message}")]
    Transport {
        /// Client-level failure description.
        message: String,
    },
    /// The service answered with a non-success status.
    #[error("completion service returned status {status}")]
    Status {
        /// HTTP status code from the upstream service.
        status: u16,
    },
    /// The reply body did not contain a usable message.
    #[error("completion reply was malformed: {message}")]
    MalformedReply {
        /// Client-level failure description.
        message: String,
    },
}

impl CompletionError {
    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Helper for malformed replies.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedReply {
            message: message.into(),
        }
    }
}

/// One chat-completion exchange: a system prompt, a user prompt, and a flag
/// requesting a strict-JSON reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System role content.
    pub system: String,
    /// User role content.
    pub user: String,
    /// Request `response_format: json_object` from the service.
    pub json_object: bool,
}

/// Port for the external chat-completion service.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send one exchange and return the assistant's text content.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
