#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_domain_list, validate_non_empty_string, validate_positive_number, validate_url,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_CACHE_TABLE: &str = "email-verifications";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_BLOCKLIST_URL: &str = "https://raw.githubusercontent.com/disposable-email-domains/disposable-email-domains/master/disposable_email_blocklist.conf";
pub const DEFAULT_BLOCKLIST_REFRESH_SECS: u64 = 24 * 60 * 60;

/// Known disposable providers used whenever the remote list is unavailable.
pub const DEFAULT_FALLBACK_DOMAINS: &[&str] = &[
    "tempmail.com",
    "throwawaymail.com",
    "10minutemail.com",
    "guerrillamail.com",
    "mailinator.com",
    "tempmail.net",
    "temp-mail.org",
    "yopmail.com",
    "disposablemail.com",
    "sharklasers.com",
    "spam4.me",
    "dispostable.com",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub cache_table: String,
    pub cache_ttl_secs: u64,
    pub blocklist_url: String,
    pub blocklist_refresh_secs: u64,
    pub fallback_domains: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_table: DEFAULT_CACHE_TABLE.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            blocklist_url: DEFAULT_BLOCKLIST_URL.to_string(),
            blocklist_refresh_secs: DEFAULT_BLOCKLIST_REFRESH_SECS,
            fallback_domains: DEFAULT_FALLBACK_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl ConfigProvider for Settings {
    fn cache_table(&self) -> &str {
        &self.cache_table
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    fn blocklist_url(&self) -> &str {
        &self.blocklist_url
    }

    fn blocklist_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.blocklist_refresh_secs)
    }

    fn fallback_domains(&self) -> &[String] {
        &self.fallback_domains
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("cache_table", &self.cache_table)?;
        validate_positive_number("cache_ttl", self.cache_ttl_secs, 1)?;
        validate_url("blocklist_url", &self.blocklist_url)?;
        validate_positive_number("blocklist_refresh_secs", self.blocklist_refresh_secs, 1)?;
        validate_domain_list("fallback_domains", &self.fallback_domains)?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

/// Splits a comma-separated domain list, trimming and lower-casing entries.
pub fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}
