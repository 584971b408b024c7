use crate::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
pub const DEFAULT_ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Upper bound on concurrent outbound requests: one per dataset.
pub const MAX_CONCURRENT_FETCHES: usize = 7;

/// Which provider serves the company profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Fmp,
    AlphaVantage,
}

impl FromStr for ProfileSource {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fmp" => Ok(ProfileSource::Fmp),
            "alpha_vantage" | "alphavantage" | "av" => Ok(ProfileSource::AlphaVantage),
            other => Err(DashboardError::Config(format!(
                "FINDASH_PROFILE_SOURCE must be 'fmp' or 'alpha_vantage', got '{}'",
                other
            ))),
        }
    }
}

/// Serializes without the API keys; `Debug` redacts them.
#[derive(Clone, Serialize)]
pub struct DashboardConfig {
    // Provider credentials
    #[serde(skip_serializing)]
    pub fmp_api_key: String,
    #[serde(skip_serializing)]
    pub alpha_vantage_api_key: String,

    // Provider endpoints
    pub fmp_base_url: String,
    pub alpha_vantage_base_url: String,
    pub profile_source: ProfileSource,

    // Fetch shape
    pub statement_limit: u32,   // periods per statement request
    pub price_window: usize,    // monthly observations kept (60 = 5 years)
    pub http_timeout_secs: u64,
    pub max_concurrent: usize,  // clamped to 1..=7

    // Per-symbol cache
    pub cache_ttl_secs: i64,    // 30 days
}

impl DashboardConfig {
    pub fn new(fmp_api_key: impl Into<String>, alpha_vantage_api_key: impl Into<String>) -> Self {
        Self {
            fmp_api_key: fmp_api_key.into(),
            alpha_vantage_api_key: alpha_vantage_api_key.into(),
            fmp_base_url: DEFAULT_FMP_BASE_URL.to_string(),
            alpha_vantage_base_url: DEFAULT_ALPHA_VANTAGE_BASE_URL.to_string(),
            profile_source: ProfileSource::Fmp,
            statement_limit: 5,
            price_window: 60,
            http_timeout_secs: 30,
            max_concurrent: MAX_CONCURRENT_FETCHES,
            cache_ttl_secs: 60 * 60 * 24 * 30,
        }
    }

    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DashboardError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| DashboardError::Config(format!("{} must be set", key)))
        };

        let config = Self {
            fmp_api_key: required("FMP_API_KEY")?,
            alpha_vantage_api_key: required("ALPHA_VANTAGE_API_KEY")?,
            fmp_base_url: lookup("FMP_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FMP_BASE_URL.to_string()),
            alpha_vantage_base_url: lookup("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ALPHA_VANTAGE_BASE_URL.to_string()),
            profile_source: lookup("FINDASH_PROFILE_SOURCE")
                .unwrap_or_else(|| "fmp".to_string())
                .parse()?,
            statement_limit: parse_var(&lookup, "FINDASH_STATEMENT_LIMIT", "5")?,
            price_window: parse_var(&lookup, "FINDASH_PRICE_WINDOW", "60")?,
            http_timeout_secs: parse_var(&lookup, "FINDASH_HTTP_TIMEOUT_SECS", "30")?,
            max_concurrent: parse_var::<usize, _>(&lookup, "FINDASH_MAX_CONCURRENT", "7")?
                .clamp(1, MAX_CONCURRENT_FETCHES),
            cache_ttl_secs: parse_var(&lookup, "FINDASH_CACHE_TTL_SECS", "2592000")?,
        };

        if config.price_window == 0 {
            return Err(DashboardError::Config("FINDASH_PRICE_WINDOW must be positive".to_string()));
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, DashboardError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| DashboardError::Config(format!("{}='{}': {}", key, raw, e)))
}

impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("fmp_api_key", &"[REDACTED]")
            .field("alpha_vantage_api_key", &"[REDACTED]")
            .field("fmp_base_url", &self.fmp_base_url)
            .field("alpha_vantage_base_url", &self.alpha_vantage_base_url)
            .field("profile_source", &self.profile_source)
            .field("statement_limit", &self.statement_limit)
            .field("price_window", &self.price_window)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("max_concurrent", &self.max_concurrent)
            .field("cache_ttl_secs", &self.cache_ttl_secs)
            .finish()
    }
}
