pub mod blocklist;
pub mod cache;
pub mod handler;
pub mod matcher;
pub mod mx;
pub mod pipeline;
pub mod probe;

pub use crate::domain::model::{
    BlocklistSnapshot, CacheEntry, HttpResponse, MxRecord, SnapshotSource, Verification,
    VerificationOutcome,
};
pub use crate::domain::ports::{
    BlocklistSource, ConfigProvider, KeyValueStore, MailExchangeResolver, MailboxVerifier,
    Verifier,
};
pub use crate::utils::error::Result;
