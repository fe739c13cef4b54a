//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::StoreError,
    services::SignUpForm,
    state::{AppState, Product, ProductDetail, UserProfile},
};
use super::responses::{
    ApiResponse, AuthResponse, CartResponse, CheckoutResponse, FavoriteResponse, HealthResponse,
    QuantityResponse, StatusResponse,
};

type ApiResult<T> = Result<Json<T>, StoreError>;

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Handle POST /auth/sign-in
pub async fn sign_in_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignInRequest>,
) -> ApiResult<AuthResponse> {
    let session = state.sign_in(&request.email, &request.password).await?;
    info!("Sign-in endpoint called - {} signed in", session.uid);
    Ok(Json(session.into()))
}

/// Handle POST /auth/sign-up
pub async fn sign_up_handler(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SignUpForm>,
) -> ApiResult<AuthResponse> {
    let session = state.sign_up(&form).await?;
    info!("Sign-up endpoint called - {} created", session.uid);
    Ok(Json(session.into()))
}

/// Handle POST /auth/sign-out
pub async fn sign_out_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let message = if state.sign_out() {
        "Signed out"
    } else {
        "No active session"
    };
    Json(ApiResponse::ok(message))
}

/// Handle GET /profile
pub async fn profile_handler(State(state): State<Arc<AppState>>) -> ApiResult<UserProfile> {
    Ok(Json(state.profile()?))
}

/// Handle GET /categories
pub async fn categories_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

/// Handle GET /products?category=
pub async fn products_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    Json(state.catalog.products(query.category.as_deref()))
}

/// Handle GET /products/:id
pub async fn product_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> ApiResult<ProductDetail> {
    Ok(Json(state.product_detail(&product_id)?))
}

/// Handle POST /favorites/:id - toggle
pub async fn toggle_favorite_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> ApiResult<FavoriteResponse> {
    let favorite = state.toggle_favorite(&product_id)?;
    Ok(Json(FavoriteResponse { product_id, favorite }))
}

/// Handle GET /favorites
pub async fn favorites_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.favorites())
}

/// Handle GET /cart
pub async fn cart_handler(State(state): State<Arc<AppState>>) -> Json<CartResponse> {
    Json(state.cart_snapshot().into())
}

/// Handle POST /cart/items
pub async fn add_item_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<CartResponse> {
    state.add_to_cart(&request.product_id, request.quantity)?;
    Ok(Json(state.cart_snapshot().into()))
}

/// Handle POST /cart/items/:id/increment
pub async fn increment_item_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> ApiResult<QuantityResponse> {
    let quantity = state.increment_item(&product_id)?;
    Ok(quantity_response(&state, product_id, quantity))
}

/// Handle POST /cart/items/:id/decrement
pub async fn decrement_item_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> ApiResult<QuantityResponse> {
    let quantity = state.decrement_item(&product_id)?;
    Ok(quantity_response(&state, product_id, quantity))
}

/// Handle DELETE /cart/items/:id
pub async fn remove_item_handler(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> ApiResult<CartResponse> {
    state.remove_item(&product_id)?;
    Ok(Json(state.cart_snapshot().into()))
}

fn quantity_response(state: &AppState, product_id: String, quantity: u32) -> Json<QuantityResponse> {
    Json(QuantityResponse {
        product_id,
        quantity,
        summary: state.cart_snapshot().summary(),
    })
}

/// Handle GET /checkout
pub async fn checkout_status_handler(State(state): State<Arc<AppState>>) -> Json<CheckoutResponse> {
    Json(state.checkout.snapshot().into())
}

/// Handle POST /checkout - open the confirmation window
pub async fn start_checkout_handler(State(state): State<Arc<AppState>>) -> ApiResult<CheckoutResponse> {
    let session = state.start_checkout()?;
    info!("Checkout endpoint called - {}s to cancel", session.remaining_seconds);
    Ok(Json(session.into()))
}

/// Handle POST /checkout/cancel
pub async fn cancel_checkout_handler(State(state): State<Arc<AppState>>) -> Json<CheckoutResponse> {
    Json(state.cancel_checkout().into())
}

/// Handle POST /checkout/acknowledge
pub async fn acknowledge_checkout_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<CheckoutResponse> {
    Ok(Json(state.acknowledge_order()?.into()))
}

/// Handle GET /status - Return current service status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let cart = state.cart_snapshot().summary();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        checkout: state.checkout.snapshot().into(),
        cart,
        signed_in: state.is_signed_in(),
        identity_provider: state.identity.name().to_string(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
