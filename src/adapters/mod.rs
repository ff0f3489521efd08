// Adapters layer: concrete implementations for external systems (storage, http, dns, mailbox).
// AWS-backed adapters live in config::lambda next to the Lambda configuration.

pub mod dns;
pub mod http;
pub mod probe;
pub mod storage;
