//! Configuration and CLI argument handling

use clap::Parser;

use crate::services::DEFAULT_IDENTITY_URL;
use crate::state::cart_state::DEFAULT_DELIVERY_FEE_CENTS;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "grocery-checkout")]
#[command(about = "Storefront state service: catalog, cart, checkout countdown and identity")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Checkout confirmation window in seconds
    #[arg(short, long, default_value = "120", value_parser = clap::value_parser!(u64).range(1..=120))]
    pub countdown_seconds: u64,

    /// Flat delivery fee in cents
    #[arg(long, default_value_t = DEFAULT_DELIVERY_FEE_CENTS)]
    pub delivery_fee_cents: u64,

    /// Firebase web API key; without it an in-memory identity store is used
    #[arg(long, env = "FIREBASE_API_KEY", hide_env_values = true)]
    pub firebase_api_key: Option<String>,

    /// Identity Toolkit base URL (point at the auth emulator for local runs)
    #[arg(long, default_value = DEFAULT_IDENTITY_URL)]
    pub identity_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["grocery-checkout"]).unwrap();
        assert_eq!(config.countdown_seconds, 120);
        assert_eq!(config.delivery_fee_cents, 299);
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn countdown_outside_window_rejected() {
        assert!(Config::try_parse_from(["grocery-checkout", "--countdown-seconds", "121"]).is_err());
        assert!(Config::try_parse_from(["grocery-checkout", "-c", "0"]).is_err());
        let config = Config::try_parse_from(["grocery-checkout", "-c", "30", "-v"]).unwrap();
        assert_eq!(config.countdown_seconds, 30);
        assert_eq!(config.log_level(), "debug");
    }
}
