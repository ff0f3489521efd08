use crate::domain::model::{CacheEntry, MxRecord, VerificationOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Persistent key-value store holding cached verdicts, keyed by email.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>>;
    async fn put(&self, item: CacheEntry) -> Result<()>;
}

#[async_trait]
pub trait MailExchangeResolver: Send + Sync {
    async fn resolve_mail_exchange(&self, domain: &str) -> Result<Vec<MxRecord>>;
}

/// Outbound mailbox-verification capability. `Ok(())` means the provider
/// accepted the address.
#[async_trait]
pub trait MailboxVerifier: Send + Sync {
    async fn attempt(&self, email: &str) -> Result<()>;
}

#[async_trait]
pub trait BlocklistSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn cache_table(&self) -> &str;
    fn cache_ttl(&self) -> Duration;
    fn blocklist_url(&self) -> &str;
    fn blocklist_refresh_interval(&self) -> Duration;
    fn fallback_domains(&self) -> &[String];
}

#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, email: &str) -> Result<VerificationOutcome>;
}
