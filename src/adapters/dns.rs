use crate::core::{MailExchangeResolver, MxRecord};
use crate::utils::error::{Result, VerifierError};
use async_trait::async_trait;
use trust_dns_resolver::TokioAsyncResolver;

/// MX lookups through the system resolver configuration (`/etc/resolv.conf`).
pub struct SystemMxResolver {
    resolver: TokioAsyncResolver,
}

impl SystemMxResolver {
    pub fn from_system_conf() -> Result<Self> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().map_err(|e| {
            VerifierError::ConfigError {
                message: format!("resolver initialization failed: {}", e),
            }
        })?;
        Ok(Self { resolver })
    }
}

#[async_trait]
impl MailExchangeResolver for SystemMxResolver {
    async fn resolve_mail_exchange(&self, domain: &str) -> Result<Vec<MxRecord>> {
        let lookup = self
            .resolver
            .mx_lookup(domain)
            .await
            .map_err(|e| VerifierError::DnsError {
                message: e.to_string(),
            })?;

        let mut records: Vec<MxRecord> = lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(&mx.exchange().to_utf8())))
            .collect();
        records.sort();
        records.dedup();
        Ok(records)
    }
}

pub(crate) fn normalize_exchange(exchange: &str) -> String {
    exchange.trim_end_matches('.').to_ascii_lowercase()
}
