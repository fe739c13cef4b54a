//! Error types and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::{
    api::responses::ErrorResponse,
    state::{cart_state::MAX_LINE_QUANTITY, CheckoutPhase},
};

/// Classified identity failures, displayed verbatim to the user
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account temporarily disabled due to too many failed attempts")]
    TooManyRequests,

    #[error("An account with this email already exists")]
    EmailInUse,

    #[error("Password should be at least 6 characters")]
    WeakPassword,

    /// Anything the provider reports that is not in the set above; the detail is for logs only
    #[error("Login failed. Please try again.")]
    Unknown(String),
}

impl AuthError {
    /// Classify a provider error code.
    ///
    /// Accepts both SDK codes (`auth/wrong-password`) and REST messages
    /// (`WEAK_PASSWORD : Password should be at least 6 characters`).
    pub fn from_code(raw: &str) -> Self {
        let code = raw
            .split(" : ")
            .next()
            .unwrap_or(raw)
            .trim()
            .trim_start_matches("auth/");

        match code {
            "invalid-email" | "INVALID_EMAIL" => AuthError::InvalidEmail,
            "user-not-found"
            | "wrong-password"
            | "invalid-credential"
            | "EMAIL_NOT_FOUND"
            | "INVALID_PASSWORD"
            | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
            "too-many-requests" | "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyRequests,
            "email-already-in-use" | "EMAIL_EXISTS" => AuthError::EmailInUse,
            "weak-password" | "WEAK_PASSWORD" => AuthError::WeakPassword,
            "missing-email" | "missing-password" | "MISSING_EMAIL" | "MISSING_PASSWORD" => {
                AuthError::MissingFields
            }
            other => AuthError::Unknown(other.to_string()),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingFields => "missing-fields",
            AuthError::PasswordMismatch => "password-mismatch",
            AuthError::InvalidEmail => "invalid-email",
            AuthError::InvalidCredentials => "invalid-credentials",
            AuthError::TooManyRequests => "too-many-requests",
            AuthError::EmailInUse => "email-in-use",
            AuthError::WeakPassword => "weak-password",
            AuthError::Unknown(_) => "unknown",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingFields
            | AuthError::PasswordMismatch
            | AuthError::InvalidEmail
            | AuthError::WeakPassword => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::EmailInUse => StatusCode::CONFLICT,
            AuthError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Unknown(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}

/// Storefront state errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    #[error("Quantity must be between 1 and {}", MAX_LINE_QUANTITY)]
    InvalidQuantity,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cannot {action} checkout while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: CheckoutPhase,
    },

    #[error("Not signed in")]
    NotSignedIn,

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::ProductNotFound(_) => "product-not-found",
            StoreError::CartItemNotFound(_) => "cart-item-not-found",
            StoreError::InvalidQuantity => "invalid-quantity",
            StoreError::EmptyCart => "empty-cart",
            StoreError::InvalidTransition { .. } => "invalid-transition",
            StoreError::NotSignedIn => "not-signed-in",
            StoreError::Auth(e) => e.code(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            StoreError::ProductNotFound(_) | StoreError::CartItemNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            StoreError::InvalidQuantity => StatusCode::BAD_REQUEST,
            StoreError::EmptyCart | StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
            StoreError::NotSignedIn => StatusCode::UNAUTHORIZED,
            StoreError::Auth(e) => e.status_code(),
        }
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        match &self {
            StoreError::Auth(AuthError::Unknown(detail)) => {
                tracing::warn!("Identity provider failure: {}", detail)
            }
            _ => tracing::debug!("Request rejected: {}", self),
        }

        let status = self.status_code();
        let body = ErrorResponse::new(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}
