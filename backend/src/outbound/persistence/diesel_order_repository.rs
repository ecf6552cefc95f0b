//! PostgreSQL-backed `OrderRepository` implementation using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::{OrderRepository, RepositoryError};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::OrderRow;
use super::pool::DbPool;
use super::schema::orders;

/// Diesel-backed implementation of the `OrderRepository` port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_domain(row: OrderRow) -> Result<Order, RepositoryError> {
    row.try_into_domain()
        .map_err(|err| RepositoryError::query(err.to_string()))
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(orders::table)
            .values(OrderRow::from_domain(order))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<OrderRow> = orders::table
            .filter(orders::id.eq(order_id))
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_domain).transpose()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<OrderRow> = orders::table
            .filter(orders::user_id.eq(user_id))
            .select(OrderRow::as_select())
            .order(orders::ordered_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_domain).collect()
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: OrderRow = diesel::update(orders::table.find(order_id))
            .set(orders::status.eq(status.as_str()))
            .returning(OrderRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_domain(row)
    }
}
