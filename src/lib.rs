pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::{DynamoDbStore, LambdaConfig, SesMailboxProbe};

pub use config::Settings;
pub use core::{
    blocklist::BlocklistStore, cache::ResultCache, handler::RequestHandler,
    matcher::DomainMatcher, mx::MxResolver, pipeline::VerificationPipeline, probe::MailboxProbe,
};
pub use domain::model::{
    BlocklistSnapshot, CacheEntry, HttpResponse, MxRecord, SnapshotSource, Verification,
    VerificationOutcome,
};
pub use domain::ports::{
    BlocklistSource, ConfigProvider, KeyValueStore, MailExchangeResolver, MailboxVerifier,
    Verifier,
};
pub use utils::error::{Result, VerifierError};
