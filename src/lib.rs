//! Grocery Checkout - storefront state service
//!
//! This library holds the state behind a grocery storefront: the product
//! catalog, favorites, the cart and its order summary, the checkout
//! confirmation countdown, and sign-in against an external identity provider.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{AuthError, StoreError};
pub use state::AppState;
pub use tasks::CheckoutController;
pub use utils::signals::shutdown_signal;
