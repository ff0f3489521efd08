use crate::core::MailboxVerifier;
use std::sync::Arc;

pub struct MailboxProbe {
    verifier: Arc<dyn MailboxVerifier>,
}

impl MailboxProbe {
    pub fn new(verifier: Arc<dyn MailboxVerifier>) -> Self {
        Self { verifier }
    }

    /// Provider rejections (policy, throttling, invalid address) are all
    /// reported as `false`.
    pub async fn probe(&self, email: &str) -> bool {
        match self.verifier.attempt(email).await {
            Ok(()) => true,
            Err(e) => {
                tracing::info!("SMTP verification failed for {}: {}", email, e);
                false
            }
        }
    }
}
