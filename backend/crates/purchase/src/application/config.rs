//! Application Configuration
//!
//! Configuration for the purchase application layer.

use std::fmt;
use std::time::Duration;

use crate::domain::value_objects::AMOUNT_TOLERANCE;

/// Purchase application configuration
#[derive(Clone)]
pub struct PurchaseConfig {
    /// ISO currency sent to the gateway
    pub currency: String,
    /// Allowed difference between claimed and computed totals
    pub amount_tolerance: f64,
    /// Upper bound on chapters in one order
    pub max_bulk_chapters: usize,
    /// Gateway key id (public, returned to the client for checkout)
    pub gateway_key_id: String,
    /// Gateway key secret (basic auth and signature HMAC key)
    pub gateway_key_secret: String,
    /// Gateway API base URL
    pub gateway_base_url: String,
    /// Gateway request timeout
    pub gateway_timeout: Duration,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            amount_tolerance: AMOUNT_TOLERANCE,
            max_bulk_chapters: 100,
            gateway_key_id: String::new(),
            gateway_key_secret: String::new(),
            gateway_base_url: "https://api.razorpay.com".to_string(),
            gateway_timeout: Duration::from_secs(15),
        }
    }
}

impl PurchaseConfig {
    /// Create config for development (test-mode gateway keys)
    pub fn development() -> Self {
        Self {
            gateway_key_id: "rzp_test_local".to_string(),
            gateway_key_secret: "rzp_test_secret".to_string(),
            ..Default::default()
        }
    }
}

impl fmt::Debug for PurchaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurchaseConfig")
            .field("currency", &self.currency)
            .field("amount_tolerance", &self.amount_tolerance)
            .field("max_bulk_chapters", &self.max_bulk_chapters)
            .field("gateway_key_id", &self.gateway_key_id)
            .field("gateway_key_secret", &"[REDACTED]")
            .field("gateway_base_url", &self.gateway_base_url)
            .field("gateway_timeout", &self.gateway_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PurchaseConfig::default();
        assert_eq!(config.currency, "INR");
        assert_eq!(config.max_bulk_chapters, 100);
        assert_eq!(config.gateway_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", PurchaseConfig::development());
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("rzp_test_secret"));
    }
}
