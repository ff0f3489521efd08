use crate::core::BlocklistSource;
use crate::utils::error::{Result, VerifierError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpBlocklistSource {
    client: Client,
}

impl HttpBlocklistSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlocklistSource for HttpBlocklistSource {
    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::debug!("Making blocklist request to: {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        tracing::debug!("Blocklist response status: {}", status);

        if !status.is_success() {
            return Err(VerifierError::BlocklistError {
                message: format!(
                    "Failed to fetch blocklist: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("")
                ),
            });
        }

        Ok(response.text().await?)
    }
}
