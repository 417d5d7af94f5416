use std::env;

use thiserror::Error;

const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_CURRENCY: &str = "jpy";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
}

/// Settings of the shop itself. Authentication settings live in
/// `CommonServerConfig`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    /// ISO currency code sent with every line item, lowercase.
    pub currency: String,
    /// Externally reachable base URL used for payment redirects.
    pub public_url: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let stripe_secret_key = env::var("STRIPE_SECRET_KEY")
            .map_err(|_| ConfigError::Missing("STRIPE_SECRET_KEY"))?;

        Ok(Self {
            stripe_secret_key,
            stripe_api_base: env::var("STRIPE_API_BASE")
                .unwrap_or(DEFAULT_STRIPE_API_BASE.to_string()),
            currency: env::var("STORE_CURRENCY")
                .map(|currency| currency.to_lowercase())
                .unwrap_or(DEFAULT_CURRENCY.to_string()),
            public_url: env::var("PUBLIC_URL").unwrap_or(DEFAULT_PUBLIC_URL.to_string()),
        })
    }

    /// Absolute URL for a path on this shop.
    pub fn absolute_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.public_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_joins_without_duplicate_slashes() {
        let config = StoreConfig {
            stripe_secret_key: "sk_test".to_string(),
            stripe_api_base: DEFAULT_STRIPE_API_BASE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            public_url: "https://shop.example.com/".to_string(),
        };

        assert_eq!(
            config.absolute_url("/payment/success"),
            "https://shop.example.com/payment/success"
        );
    }
}
