//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::AuthSession,
    state::{CartLine, CartState, CheckoutPhase, CountdownSession, OrderSummary},
};

/// Generic acknowledgement for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiResponse {
    pub fn new(status: &str, message: impl Into<String>) -> Self {
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new("ok", message)
    }
}

/// Body of every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: String) -> Self {
        Self {
            status: "error".to_string(),
            code: code.to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Countdown session as seen by the cart screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub phase: CheckoutPhase,
    pub remaining_seconds: u64,
    pub overlay_visible: bool,
    pub order_placed: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<CountdownSession> for CheckoutResponse {
    fn from(session: CountdownSession) -> Self {
        Self {
            phase: session.phase(),
            remaining_seconds: session.remaining_seconds,
            overlay_visible: session.overlay_visible,
            order_placed: session.order_placed,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub summary: OrderSummary,
}

impl From<CartState> for CartResponse {
    fn from(cart: CartState) -> Self {
        Self {
            summary: cart.summary(),
            lines: cart.lines().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuantityResponse {
    pub product_id: String,
    pub quantity: u32,
    pub summary: OrderSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub product_id: String,
    pub favorite: bool,
}

/// Successful sign-in or sign-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub status: String,
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub id_token: String,
    pub expires_in_seconds: u64,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            status: "signed_in".to_string(),
            uid: session.uid,
            email: session.email,
            display_name: session.display_name,
            id_token: session.id_token,
            expires_in_seconds: session.expires_in_seconds,
        }
    }
}

/// Service status with countdown and cart information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub checkout: CheckoutResponse,
    pub cart: OrderSummary,
    pub signed_in: bool,
    pub identity_provider: String,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
