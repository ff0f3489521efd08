use crate::core::MailExchangeResolver;
use std::sync::Arc;

/// Turns an MX lookup into a yes/no answer. Resolution errors (NXDOMAIN,
/// timeouts, ...) are logged and reported as `false`.
pub struct MxResolver {
    resolver: Arc<dyn MailExchangeResolver>,
}

impl MxResolver {
    pub fn new(resolver: Arc<dyn MailExchangeResolver>) -> Self {
        Self { resolver }
    }

    pub async fn has_valid_mx(&self, domain: &str) -> bool {
        match self.resolver.resolve_mail_exchange(domain).await {
            // preference 為 u16，任何一筆紀錄都符合「非負優先權」
            Ok(records) => {
                tracing::debug!("MX records for {}: {:?}", domain, records);
                !records.is_empty()
            }
            Err(e) => {
                tracing::info!("MX lookup failed for {}: {}", domain, e);
                false
            }
        }
    }
}
