//! In-memory fakes and a wired test backend for integration tests.
//!
//! The fakes honour the same contracts as the Diesel adapters: e-mail
//! uniqueness surfaces as a conflict, listings come back newest first, and
//! the macro-window filter is inclusive on both bounds.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::meal::{MacroWindows, Meal, MealWithVendor, VendorSummary};
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::{
    ChatCompletion, CompletionError, CompletionRequest, MealRepository, OrderRepository,
    RepositoryError, UserRepository,
};
use crate::domain::user::{ProfileChanges, User};
use crate::domain::{PasswordHasher, TokenSigner};
use crate::server::AppServices;

/// Low bcrypt cost so test registration stays fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Signing secret shared by every test backend.
pub const TEST_JWT_SECRET: &str = "test-secret";

/// In-memory `UserRepository` with e-mail uniqueness.
#[derive(Default)]
pub struct InMemoryUsers {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        if rows.iter().any(|row| row.email == user.email) {
            return Err(RepositoryError::conflict("duplicate email"));
        }
        rows.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows.iter().find(|row| row.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows.iter().find(|row| row.id == id).cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<User>, RepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let Some(row) = rows.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        if let Some(age) = changes.age {
            row.age = Some(age);
        }
        if let Some(weight) = changes.weight {
            row.weight = Some(weight);
        }
        if let Some(height) = changes.height {
            row.height = Some(height);
        }
        if let Some(activity_level) = &changes.activity_level {
            row.activity_level = Some(activity_level.clone());
        }
        if let Some(goal) = &changes.goal {
            row.goal = Some(goal.clone());
        }
        if let Some(target_protein) = changes.target_protein {
            row.target_protein = Some(target_protein);
        }
        if let Some(target_carbs) = changes.target_carbs {
            row.target_carbs = Some(target_carbs);
        }
        if let Some(target_fats) = changes.target_fats {
            row.target_fats = Some(target_fats);
        }
        row.updated_at = chrono::Utc::now();
        Ok(Some(row.clone()))
    }
}

/// In-memory `MealRepository` over a fixed catalogue.
#[derive(Default)]
pub struct InMemoryMeals {
    rows: Mutex<Vec<MealWithVendor>>,
}

impl InMemoryMeals {
    /// Add a meal with a stock vendor summary, returning its id.
    pub fn insert(&self, meal: Meal) -> Uuid {
        self.insert_with_vendor(
            meal,
            VendorSummary {
                name: "FitMeals".to_owned(),
                address: "Anna Nagar".to_owned(),
            },
        )
    }

    /// Add a meal with an explicit vendor summary, returning its id.
    pub fn insert_with_vendor(&self, meal: Meal, vendor: VendorSummary) -> Uuid {
        let id = meal.id;
        self.rows
            .lock()
            .expect("rows lock")
            .push(MealWithVendor { meal, vendor });
        id
    }

    /// Change a meal's price in place; used to prove order snapshots.
    pub fn set_price(&self, meal_id: Uuid, price: f64) {
        let mut rows = self.rows.lock().expect("rows lock");
        if let Some(row) = rows.iter_mut().find(|row| row.meal.id == meal_id) {
            row.meal.price = price;
        }
    }
}

#[async_trait]
impl MealRepository for InMemoryMeals {
    async fn list_with_vendor(&self) -> Result<Vec<MealWithVendor>, RepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        let mut listing = rows.clone();
        listing.sort_by(|a, b| b.meal.created_at.cmp(&a.meal.created_at));
        Ok(listing)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MealWithVendor>, RepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows.iter().find(|row| row.meal.id == id).cloned())
    }

    async fn find_available_within(
        &self,
        windows: &MacroWindows,
    ) -> Result<Vec<MealWithVendor>, RepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows
            .iter()
            .filter(|row| row.meal.is_available && windows.contains(row.meal.macros()))
            .cloned()
            .collect())
    }
}

/// In-memory `OrderRepository`.
#[derive(Default)]
pub struct InMemoryOrders {
    rows: Mutex<Vec<Order>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrders {
    async fn create(&self, order: &Order) -> Result<(), RepositoryError> {
        self.rows.lock().expect("rows lock").push(order.clone());
        Ok(())
    }

    async fn find_for_user(
        &self,
        order_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Order>, RepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows
            .iter()
            .find(|row| row.id == order_id && row.user_id == user_id)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>, RepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        let mut mine: Vec<Order> = rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        Ok(mine)
    }

    async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let row = rows
            .iter_mut()
            .find(|row| row.id == order_id)
            .ok_or_else(|| RepositoryError::query("order vanished"))?;
        row.status = status;
        Ok(row.clone())
    }
}

/// Scripted `ChatCompletion` returning canned replies in order and
/// recording every request it sees.
#[derive(Default)]
pub struct StubCompletion {
    replies: Mutex<VecDeque<Result<String, CompletionError>>>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    /// Queue a successful reply.
    pub fn push_reply(&self, content: &str) {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Ok(content.to_owned()));
    }

    /// Queue a failure.
    pub fn push_failure(&self, error: CompletionError) {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(Err(error));
    }

    /// Requests observed so far.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl ChatCompletion for StubCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.seen.lock().expect("seen lock").push(request.clone());
        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::transport("no scripted reply")))
    }
}

/// A wired backend over in-memory fakes, with handles kept for seeding
/// and assertions.
pub struct TestBackend {
    /// User store handle.
    pub users: Arc<InMemoryUsers>,
    /// Catalogue handle.
    pub meals: Arc<InMemoryMeals>,
    /// Order store handle.
    pub orders: Arc<InMemoryOrders>,
    /// Completion stub handle.
    pub completion: Arc<StubCompletion>,
    /// The wired service graph to pass to `configure_api`.
    pub services: AppServices,
}

/// Build a backend over fresh fakes.
pub fn test_backend() -> TestBackend {
    let users = Arc::new(InMemoryUsers::default());
    let meals = Arc::new(InMemoryMeals::default());
    let orders = Arc::new(InMemoryOrders::default());
    let completion = Arc::new(StubCompletion::default());
    let services = AppServices::from_parts(
        users.clone(),
        meals.clone(),
        orders.clone(),
        completion.clone(),
        PasswordHasher::new(TEST_BCRYPT_COST),
        TokenSigner::new(TEST_JWT_SECRET),
    );
    TestBackend {
        users,
        meals,
        orders,
        completion,
        services,
    }
}

/// A plausible catalogue meal for seeding tests.
pub fn sample_meal(name: &str, protein: f64, carbs: f64, fats: f64, price: f64) -> Meal {
    Meal {
        id: Uuid::new_v4(),
        vendor_id: Uuid::new_v4(),
        name: name.to_owned(),
        description: "High protein".to_owned(),
        protein,
        carbs,
        fats,
        calories: protein * 4.0 + carbs * 4.0 + fats * 9.0,
        price,
        cuisine_type: "Continental".to_owned(),
        preparation_time: 25,
        is_available: true,
        created_at: chrono::Utc::now(),
    }
}
