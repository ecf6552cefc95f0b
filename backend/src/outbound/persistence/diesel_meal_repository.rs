//! PostgreSQL-backed `MealRepository` implementation using Diesel.
//!
//! Listings join the vendor table so handlers can render vendor names
//! without a second query. The macro-window filter is pushed into SQL;
//! both bounds are inclusive, matching the domain arithmetic.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::meal::{MacroWindows, MealWithVendor};
use crate::domain::ports::{MealRepository, RepositoryError};

use super::diesel_error::{map_diesel_error, map_pool_error};
use super::models::MealRow;
use super::pool::DbPool;
use super::schema::{meals, vendors};

/// Diesel-backed implementation of the `MealRepository` port.
#[derive(Clone)]
pub struct DieselMealRepository {
    pool: DbPool,
}

impl DieselMealRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_to_domain(rows: Vec<(MealRow, String, String)>) -> Vec<MealWithVendor> {
    rows.into_iter()
        .map(|(meal, vendor_name, vendor_address)| meal.with_vendor(vendor_name, vendor_address))
        .collect()
}

#[async_trait]
impl MealRepository for DieselMealRepository {
    async fn list_with_vendor(&self) -> Result<Vec<MealWithVendor>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(MealRow, String, String)> = meals::table
            .inner_join(vendors::table)
            .select((MealRow::as_select(), vendors::name, vendors::address))
            .order(meals::created_at.desc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows_to_domain(rows))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MealWithVendor>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(MealRow, String, String)> = meals::table
            .inner_join(vendors::table)
            .filter(meals::id.eq(id))
            .select((MealRow::as_select(), vendors::name, vendors::address))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|(meal, name, address)| meal.with_vendor(name, address)))
    }

    async fn find_available_within(
        &self,
        windows: &MacroWindows,
    ) -> Result<Vec<MealWithVendor>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(MealRow, String, String)> = meals::table
            .inner_join(vendors::table)
            .filter(meals::is_available.eq(true))
            .filter(meals::protein.ge(windows.protein.min))
            .filter(meals::protein.le(windows.protein.max))
            .filter(meals::carbs.ge(windows.carbs.min))
            .filter(meals::carbs.le(windows.carbs.max))
            .filter(meals::fats.ge(windows.fats.min))
            .filter(meals::fats.le(windows.fats.max))
            .select((MealRow::as_select(), vendors::name, vendors::address))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows_to_domain(rows))
    }
}
