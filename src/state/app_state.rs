//! Main application state management

use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{CartLine, CartState, Catalog, CountdownSession, Product, ProductDetail, UserProfile};
use crate::{
    error::{AuthError, StoreError},
    services::{AuthSession, Credentials, IdentityProvider, SignUpForm},
    tasks::CheckoutController,
};

/// Main application state shared by every handler
pub struct AppState {
    pub catalog: Catalog,
    pub cart: Mutex<CartState>,
    pub favorites: Mutex<HashSet<String>>,
    /// Confirmation countdown for the current cart
    pub checkout: CheckoutController,
    pub identity: Arc<dyn IdentityProvider>,
    pub current_user: Mutex<Option<AuthSession>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create a new AppState with an empty cart and no signed-in user
    pub fn new(
        port: u16,
        host: String,
        countdown_seconds: u64,
        delivery_fee_cents: u64,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            catalog: Catalog::new(),
            cart: Mutex::new(CartState::new(delivery_fee_cents)),
            favorites: Mutex::new(HashSet::new()),
            checkout: CheckoutController::with_duration(countdown_seconds),
            identity,
            current_user: Mutex::new(None),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    fn lock_cart(&self) -> MutexGuard<'_, CartState> {
        lock(&self.cart)
    }

    fn lock_favorites(&self) -> MutexGuard<'_, HashSet<String>> {
        lock(&self.favorites)
    }

    fn lock_user(&self) -> MutexGuard<'_, Option<AuthSession>> {
        lock(&self.current_user)
    }

    /// Record the last state-changing action
    fn record_action(&self, action: &str) {
        *lock(&self.last_action) = Some(action.to_string());
        *lock(&self.last_action_time) = Some(Utc::now());
    }

    fn require_product(&self, product_id: &str) -> Result<&Product, StoreError> {
        self.catalog
            .product(product_id)
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))
    }

    // Catalog and favorites

    pub fn product_detail(&self, product_id: &str) -> Result<ProductDetail, StoreError> {
        self.catalog
            .detail(product_id)
            .ok_or_else(|| StoreError::ProductNotFound(product_id.to_string()))
    }

    /// Flip a product's favorite flag, returning the new value
    pub fn toggle_favorite(&self, product_id: &str) -> Result<bool, StoreError> {
        self.require_product(product_id)?;

        let mut favorites = self.lock_favorites();
        let favorite = if favorites.remove(product_id) {
            false
        } else {
            favorites.insert(product_id.to_string());
            true
        };
        drop(favorites);

        self.record_action(if favorite { "favorite" } else { "unfavorite" });
        Ok(favorite)
    }

    /// Favorite products in catalog order
    pub fn favorites(&self) -> Vec<Product> {
        let favorites = self.lock_favorites();
        self.catalog
            .products(None)
            .into_iter()
            .filter(|p| favorites.contains(&p.id))
            .collect()
    }

    // Cart

    pub fn cart_snapshot(&self) -> CartState {
        self.lock_cart().clone()
    }

    pub fn add_to_cart(&self, product_id: &str, quantity: u32) -> Result<CartLine, StoreError> {
        let product = self.require_product(product_id)?;
        let line = self.lock_cart().add(product, quantity)?.clone();

        info!("Cart: {} x{} (line quantity {})", product_id, quantity, line.quantity);
        self.record_action("cart-add");
        Ok(line)
    }

    pub fn increment_item(&self, product_id: &str) -> Result<u32, StoreError> {
        let quantity = self.lock_cart().increment(product_id)?;
        self.record_action("cart-increment");
        Ok(quantity)
    }

    pub fn decrement_item(&self, product_id: &str) -> Result<u32, StoreError> {
        let quantity = self.lock_cart().decrement(product_id)?;
        if quantity == 0 {
            info!("Cart: removed {} after decrement", product_id);
        }
        self.record_action("cart-decrement");
        Ok(quantity)
    }

    pub fn remove_item(&self, product_id: &str) -> Result<CartLine, StoreError> {
        let line = self.lock_cart().remove(product_id)?;
        info!("Cart: removed {}", product_id);
        self.record_action("cart-remove");
        Ok(line)
    }

    // Checkout countdown

    /// Open the confirmation window for a non-empty cart
    pub fn start_checkout(&self) -> Result<CountdownSession, StoreError> {
        if self.lock_cart().is_empty() {
            return Err(StoreError::EmptyCart);
        }
        if !self.checkout.start_checkout() {
            return Err(StoreError::InvalidTransition {
                action: "start",
                phase: self.checkout.phase(),
            });
        }

        self.record_action("checkout");
        Ok(self.checkout.snapshot())
    }

    /// Close the confirmation window; a no-op outside of it
    pub fn cancel_checkout(&self) -> CountdownSession {
        if self.checkout.cancel() {
            self.record_action("checkout-cancel");
        }
        self.checkout.snapshot()
    }

    pub fn acknowledge_order(&self) -> Result<CountdownSession, StoreError> {
        if !self.checkout.acknowledge() {
            return Err(StoreError::InvalidTransition {
                action: "acknowledge",
                phase: self.checkout.phase(),
            });
        }

        self.record_action("checkout-acknowledge");
        Ok(self.checkout.snapshot())
    }

    // Identity

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, StoreError> {
        let credentials = Credentials::new(email, password)?;
        let session = self
            .identity
            .sign_in(&credentials)
            .await
            .inspect_err(|e| log_auth_failure("sign-in", e))?;

        *self.lock_user() = Some(session.clone());
        self.record_action("sign-in");
        Ok(session)
    }

    pub async fn sign_up(&self, form: &SignUpForm) -> Result<AuthSession, StoreError> {
        let (credentials, display_name) = form.validate()?;
        let session = self
            .identity
            .sign_up(&credentials, display_name.as_deref())
            .await
            .inspect_err(|e| log_auth_failure("sign-up", e))?;

        *self.lock_user() = Some(session.clone());
        self.record_action("sign-up");
        Ok(session)
    }

    /// Clear the current session; returns whether one existed
    pub fn sign_out(&self) -> bool {
        let signed_in = self.lock_user().take().is_some();
        if signed_in {
            self.record_action("sign-out");
        }
        signed_in
    }

    pub fn profile(&self) -> Result<UserProfile, StoreError> {
        self.lock_user()
            .as_ref()
            .map(UserProfile::from)
            .ok_or(StoreError::NotSignedIn)
    }

    pub fn is_signed_in(&self) -> bool {
        self.lock_user().is_some()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = lock(&self.last_action).clone();
        let last_action_time = *lock(&self.last_action_time);
        (last_action, last_action_time)
    }
}

/// Every field holds plain data that is valid after any panic, so a poisoned
/// lock is recovered rather than failing every later request
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn log_auth_failure(operation: &str, err: &AuthError) {
    match err {
        AuthError::Unknown(detail) => warn!("{} failed: {}", operation, detail),
        other => info!("{} rejected: {}", operation, other.code()),
    }
}
