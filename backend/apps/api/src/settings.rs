//! Startup settings read from the environment

use anyhow::{Context, bail};
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Everything `main` needs before the first request
pub struct Settings {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: Vec<u8>,
    pub gateway_key_id: String,
    pub gateway_key_secret: String,
    pub gateway_base_url: Option<String>,
    pub gateway_timeout: Option<Duration>,
    pub currency: Option<String>,
    pub password_pepper: Option<Vec<u8>>,
    pub bind_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value),
                _ => bail!("{key} must be set in environment"),
            }
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_max_connections = match optional("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let gateway_timeout = optional("PAYMENT_GATEWAY_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("PAYMENT_GATEWAY_TIMEOUT_SECS is not a number: {raw}"))
            })
            .transpose()?;

        let bind_raw = optional("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("BIND_ADDR is not a socket address: {bind_raw}"))?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            jwt_secret: required("AUTH_JWT_SECRET")?.into_bytes(),
            gateway_key_id: required("PAYMENT_GATEWAY_KEY_ID")?,
            gateway_key_secret: required("PAYMENT_GATEWAY_KEY_SECRET")?,
            gateway_base_url: optional("PAYMENT_GATEWAY_BASE_URL"),
            gateway_timeout,
            currency: optional("PAYMENT_CURRENCY"),
            password_pepper: optional("PASSWORD_PEPPER").map(String::into_bytes),
            bind_addr,
        })
    }

    pub fn purchase_config(&self) -> purchase::PurchaseConfig {
        let defaults = purchase::PurchaseConfig::default();
        purchase::PurchaseConfig {
            currency: self.currency.clone().unwrap_or(defaults.currency),
            gateway_key_id: self.gateway_key_id.clone(),
            gateway_key_secret: self.gateway_key_secret.clone(),
            gateway_base_url: self
                .gateway_base_url
                .clone()
                .unwrap_or(defaults.gateway_base_url),
            gateway_timeout: self.gateway_timeout.unwrap_or(defaults.gateway_timeout),
            ..defaults
        }
    }

    pub fn account_config(&self) -> account::AccountConfig {
        account::AccountConfig {
            password_pepper: self.password_pepper.clone(),
        }
    }
}
