//! Row structs bridging Diesel and the domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::meal::{Meal, MealWithVendor, VendorSummary};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::user::{ProfileChanges, User};

use super::schema::{meals, orders, users};

/// Full user row as stored in `users`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
    pub target_protein: Option<f64>,
    pub target_carbs: Option<f64>,
    pub target_fats: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            age: user.age,
            weight: user.weight,
            height: user.height,
            activity_level: user.activity_level.clone(),
            goal: user.goal.clone(),
            target_protein: user.target_protein,
            target_carbs: user.target_carbs,
            target_fats: user.target_fats,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    pub fn into_domain(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            age: self.age,
            weight: self.weight,
            height: self.height,
            activity_level: self.activity_level,
            goal: self.goal,
            target_protein: self.target_protein,
            target_carbs: self.target_carbs,
            target_fats: self.target_fats,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial profile update; `None` fields are left untouched by
/// `AsChangeset`, while `updated_at` is always bumped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserChanges<'a> {
    pub name: Option<&'a str>,
    pub age: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<&'a str>,
    pub goal: Option<&'a str>,
    pub target_protein: Option<f64>,
    pub target_carbs: Option<f64>,
    pub target_fats: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> UserChanges<'a> {
    pub fn from_domain(changes: &'a ProfileChanges, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: changes.name.as_deref(),
            age: changes.age,
            weight: changes.weight,
            height: changes.height,
            activity_level: changes.activity_level.as_deref(),
            goal: changes.goal.as_deref(),
            target_protein: changes.target_protein,
            target_carbs: changes.target_carbs,
            target_fats: changes.target_fats,
            updated_at,
        }
    }
}

/// Meal row as stored in `meals`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = meals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MealRow {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub description: String,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub calories: f64,
    pub price: f64,
    pub cuisine_type: String,
    pub preparation_time: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

impl MealRow {
    pub fn into_domain(self) -> Meal {
        Meal {
            id: self.id,
            vendor_id: self.vendor_id,
            name: self.name,
            description: self.description,
            protein: self.protein,
            carbs: self.carbs,
            fats: self.fats,
            calories: self.calories,
            price: self.price,
            cuisine_type: self.cuisine_type,
            preparation_time: self.preparation_time,
            is_available: self.is_available,
            created_at: self.created_at,
        }
    }

    /// Join result: a meal row plus the vendor's name and address.
    pub fn with_vendor(self, vendor_name: String, vendor_address: String) -> MealWithVendor {
        MealWithVendor {
            meal: self.into_domain(),
            vendor: VendorSummary {
                name: vendor_name,
                address: vendor_address,
            },
        }
    }
}

/// Order row as stored in `orders`, with the status still in its wire form.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_id: Uuid,
    pub vendor_id: Uuid,
    pub quantity: i32,
    pub delivery_address: String,
    pub total_price: f64,
    pub status: String,
    pub ordered_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn from_domain(order: &Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            meal_id: order.meal_id,
            vendor_id: order.vendor_id,
            quantity: order.quantity,
            delivery_address: order.delivery_address.clone(),
            total_price: order.total_price,
            status: order.status.as_str().to_owned(),
            ordered_at: order.ordered_at,
        }
    }

    /// Convert to the domain order, failing on an unrecognized status value.
    pub fn try_into_domain(self) -> Result<Order, crate::domain::order::UnknownOrderStatus> {
        let status: OrderStatus = self.status.parse()?;
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            meal_id: self.meal_id,
            vendor_id: self.vendor_id,
            quantity: self.quantity,
            delivery_address: self.delivery_address,
            total_price: self.total_price,
            status,
            ordered_at: self.ordered_at,
        })
    }
}
