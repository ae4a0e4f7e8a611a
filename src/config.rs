use std::{env, str::FromStr, time::Duration};

use anyhow::Context;

const DEFAULT_COINMARKETCAP_URL: &str = "https://api.coinmarketcap.com";
const DEFAULT_GDAX_URL: &str = "https://api.gdax.com";
const DEFAULT_CRYPTOWATCH_URL: &str = "https://api.cryptowat.ch";

/// Settings for the HTTP mail relay used by the contact form
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_url: String,
    pub port: u16,
    pub log_level: String,
    pub cors_origin: Option<String>,
    pub coinmarketcap_url: String,
    pub gdax_url: String,
    pub cryptowatch_url: String,
    pub http_timeout: Duration,
    pub spot_cache_ttl: Duration,
    pub spot_record_interval: Duration,
    pub seed_path: Option<String>,
    pub mail: MailConfig,
}

impl Config {
    /// Builds the config from the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn init() -> anyhow::Result<Config> {
        let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Config {
            db_url,
            port: env_parse("PORT", 8080)?,
            log_level: env_or("LOG_LEVEL", "info"),
            cors_origin: env_opt("CORS_ORIGIN"),
            coinmarketcap_url: env_or("COINMARKETCAP_URL", DEFAULT_COINMARKETCAP_URL),
            gdax_url: env_or("GDAX_URL", DEFAULT_GDAX_URL),
            cryptowatch_url: env_or("CRYPTOWATCH_URL", DEFAULT_CRYPTOWATCH_URL),
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 10)?),
            spot_cache_ttl: Duration::from_secs(env_parse("SPOT_CACHE_TTL_SECS", 60)?),
            spot_record_interval: Duration::from_secs(env_parse("SPOT_RECORD_INTERVAL_SECS", 300)?),
            seed_path: env_opt("SEED_PATH"),
            mail: MailConfig {
                api_url: env_opt("MAIL_API_URL"),
                api_key: env_opt("MAIL_API_KEY"),
                from: env_or("MAIL_FROM", "noreply@icostats.local"),
                to: env_or("MAIL_TO", "hello@icostats.local"),
            },
        })
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env_opt(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw}")),
        None => Ok(default),
    }
}
