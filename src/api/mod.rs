//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/sign-in", post(sign_in_handler))
        .route("/auth/sign-up", post(sign_up_handler))
        .route("/auth/sign-out", post(sign_out_handler))
        .route("/profile", get(profile_handler))
        .route("/categories", get(categories_handler))
        .route("/products", get(products_handler))
        .route("/products/:id", get(product_detail_handler))
        .route("/favorites", get(favorites_handler))
        .route("/favorites/:id", post(toggle_favorite_handler))
        .route("/cart", get(cart_handler))
        .route("/cart/items", post(add_item_handler))
        .route("/cart/items/:id", delete(remove_item_handler))
        .route("/cart/items/:id/increment", post(increment_item_handler))
        .route("/cart/items/:id/decrement", post(decrement_item_handler))
        .route("/checkout", get(checkout_status_handler).post(start_checkout_handler))
        .route("/checkout/cancel", post(cancel_checkout_handler))
        .route("/checkout/acknowledge", post(acknowledge_checkout_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
