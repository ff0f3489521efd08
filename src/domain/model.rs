use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Verdict for a single address.
///
/// Built with every check false and advanced one stage at a time through
/// the `with_*` methods, each returning a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub email: String,
    #[serde(rename = "syntax")]
    pub syntax_valid: bool,
    pub disposable: bool,
    #[serde(rename = "mxRecord")]
    pub has_mx_record: bool,
    #[serde(rename = "smtp")]
    pub mailbox_verified: bool,
    pub verified: bool,
}

impl Verification {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            syntax_valid: false,
            disposable: false,
            has_mx_record: false,
            mailbox_verified: false,
            verified: false,
        }
    }

    pub fn with_syntax(self, syntax_valid: bool) -> Self {
        Self {
            syntax_valid,
            ..self
        }
    }

    pub fn with_disposable(self, disposable: bool) -> Self {
        Self { disposable, ..self }
    }

    pub fn with_mx_record(self, has_mx_record: bool) -> Self {
        Self {
            has_mx_record,
            ..self
        }
    }

    /// 信箱探測是最後一關，通過即代表整體驗證通過
    pub fn with_mailbox(self, mailbox_verified: bool) -> Self {
        Self {
            mailbox_verified,
            verified: mailbox_verified,
            ..self
        }
    }
}

/// A stored verdict. `expires_at` is epoch seconds and is persisted as `ttl`
/// so stores with native TTL support can expire it on their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub email: String,
    pub verification: Verification,
    #[serde(rename = "ttl")]
    pub expires_at: i64,
}

impl CacheEntry {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.expires_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Remote,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct BlocklistSnapshot {
    pub domains: HashSet<String>,
    pub fetched_at: DateTime<Utc>,
    pub source: SnapshotSource,
}

impl BlocklistSnapshot {
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// What the pipeline hands back to the request boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub verification: Verification,
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}
