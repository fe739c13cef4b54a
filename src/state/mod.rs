//! State management module
//! 
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod cart_state;
pub mod catalog;
pub mod countdown;
pub mod profile;

// Re-export main types
pub use app_state::AppState;
pub use cart_state::{CartLine, CartState, OrderSummary};
pub use catalog::{Catalog, Category, Product, ProductDetail};
pub use countdown::{CheckoutPhase, CountdownSession, TickOutcome};
pub use profile::UserProfile;
