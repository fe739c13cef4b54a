//! Background tasks module
//! 
//! This module contains tasks that run alongside the HTTP server.

pub mod checkout_timer;

// Re-export main types
pub use checkout_timer::CheckoutController;
