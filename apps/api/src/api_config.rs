use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use santiye_application::LedgerPolicy;
use santiye_core::AppError;
use santiye_domain::AlertTierPolicy;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub ledger_policy: LedgerPolicy,
    pub alert_tier_policy: AlertTierPolicy,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let database_max_connections = match optional_env("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse_max_connections(&value)?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let ledger_policy = LedgerPolicy {
            enforce_non_negative_on_usage: match optional_env(
                "LEDGER_ENFORCE_NON_NEGATIVE_ON_USAGE",
            ) {
                Some(value) => parse_flag("LEDGER_ENFORCE_NON_NEGATIVE_ON_USAGE", &value)?,
                None => false,
            },
        };
        let alert_tier_policy = match optional_env("BUDGET_ALERT_TIERS") {
            Some(value) => AlertTierPolicy::from_str(&value).map_err(|error| {
                AppError::Validation(format!("invalid BUDGET_ALERT_TIERS: {error}"))
            })?,
            None => AlertTierPolicy::default(),
        };

        Ok(Self {
            migrate_only,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
            ledger_policy,
            alert_tier_policy,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_flag(name: &str, value: &str) -> Result<bool, AppError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AppError::Validation(format!(
            "{name} must be a boolean flag, got '{value}'"
        ))),
    }
}

fn parse_max_connections(value: &str) -> Result<u32, AppError> {
    match value.parse::<u32>() {
        Ok(0) | Err(_) => Err(AppError::Validation(format!(
            "DATABASE_MAX_CONNECTIONS must be a positive integer, got '{value}'"
        ))),
        Ok(connections) => Ok(connections),
    }
}
