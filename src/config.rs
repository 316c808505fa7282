use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

/// What the aggregator does when a single vacancy detail cannot be fetched or decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// One bad item fails the whole fetch.
    #[default]
    Abort,
    /// Bad items are logged and dropped; the rest keep their order.
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("expected `abort` or `skip`, got `{}`", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub public_rps: u32,
    pub session_ttl_hours: i64,
    pub hh_api_base_url: String,
    pub hh_user_agent: String,
    pub hh_request_timeout_secs: u64,
    pub vacancy_fetch_timeout_secs: u64,
    pub vacancy_detail_concurrency: usize,
    pub vacancy_failure_policy: FailurePolicy,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub const DEFAULT_HH_API_BASE_URL: &'static str = "https://api.hh.ru";
    pub const DEFAULT_HH_USER_AGENT: &'static str = "qa-vacancies/0.1 (vacancies@example.com)";

    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            public_rps: get_env_parse("PUBLIC_RPS")?,
            session_ttl_hours: get_env_parse_or("SESSION_TTL_HOURS", 24)?,
            hh_api_base_url: env::var("HH_API_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_HH_API_BASE_URL.to_string()),
            hh_user_agent: env::var("HH_USER_AGENT")
                .unwrap_or_else(|_| Self::DEFAULT_HH_USER_AGENT.to_string()),
            hh_request_timeout_secs: get_env_parse_or("HH_REQUEST_TIMEOUT_SECS", 10)?,
            vacancy_fetch_timeout_secs: get_env_parse_or("VACANCY_FETCH_TIMEOUT_SECS", 30)?,
            vacancy_detail_concurrency: get_env_parse_or("VACANCY_DETAIL_CONCURRENCY", 4)?,
            vacancy_failure_policy: get_env_parse_or(
                "VACANCY_FAILURE_POLICY",
                FailurePolicy::Abort,
            )?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    parse_value(name, &raw)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => parse_value(name, &raw),
        _ => Ok(default),
    }
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
