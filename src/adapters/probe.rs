use crate::core::MailboxVerifier;
use crate::utils::error::{Result, VerifierError};
use async_trait::async_trait;

/// Stand-in for environments without a mailbox-verification provider.
/// Every attempt fails, so `smtp` and `verified` stay false.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProbe;

#[async_trait]
impl MailboxVerifier for DisabledProbe {
    async fn attempt(&self, _email: &str) -> Result<()> {
        Err(VerifierError::MailboxError {
            message: "no mailbox verification provider configured".to_string(),
        })
    }
}
