use crate::core::{BlocklistSnapshot, BlocklistSource, ConfigProvider, SnapshotSource};
use crate::utils::error::{Result, VerifierError};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// Process-wide set of disposable domains.
///
/// The active snapshot is swapped as a whole, so readers only ever see a
/// complete set. Two callers may both decide a refresh is due and both
/// fetch; the last one to finish wins.
pub struct BlocklistStore {
    source: Arc<dyn BlocklistSource>,
    url: String,
    refresh_interval: Duration,
    fallback: HashSet<String>,
    snapshot: RwLock<Option<Arc<BlocklistSnapshot>>>,
}

impl BlocklistStore {
    pub fn new(
        source: Arc<dyn BlocklistSource>,
        url: impl Into<String>,
        refresh_interval: Duration,
        fallback_domains: &[String],
    ) -> Self {
        Self {
            source,
            url: url.into(),
            refresh_interval,
            fallback: fallback_domains
                .iter()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            snapshot: RwLock::new(None),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(
        source: Arc<dyn BlocklistSource>,
        config: &C,
    ) -> Self {
        Self::new(
            source,
            config.blocklist_url(),
            config.blocklist_refresh_interval(),
            config.fallback_domains(),
        )
    }

    pub fn snapshot(&self) -> Option<Arc<BlocklistSnapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.snapshot()
            .is_some_and(|snapshot| snapshot.contains(domain))
    }

    /// Refreshes the snapshot if it is missing or older than the refresh
    /// interval, and returns whichever snapshot is active afterwards.
    ///
    /// A failed fetch still installs a (fallback-only) snapshot stamped now,
    /// so the next attempt waits a full interval.
    pub async fn ensure_fresh(&self) -> Arc<BlocklistSnapshot> {
        if let Some(current) = self.snapshot() {
            if !self.is_stale(&current) {
                return current;
            }
        }

        let next = match self.fetch_domains().await {
            Ok(fetched) => {
                let mut domains = fetched;
                domains.extend(self.fallback.iter().cloned());

                let sample: Vec<&str> = domains.iter().take(5).map(String::as_str).collect();
                tracing::info!("✅ Updated blocklist with {} domains", domains.len());
                tracing::debug!("Sample blocked domains: {:?}", sample);

                BlocklistSnapshot {
                    domains,
                    fetched_at: Utc::now(),
                    source: SnapshotSource::Remote,
                }
            }
            Err(e) => {
                tracing::warn!("❌ Failed to update blocklist: {}", e);
                tracing::info!(
                    "Using fallback blocklist ({} domains)",
                    self.fallback.len()
                );
                self.fallback_snapshot()
            }
        };

        let next = Arc::new(next);
        self.replace(Arc::clone(&next));
        next
    }

    fn is_stale(&self, snapshot: &BlocklistSnapshot) -> bool {
        // 時鐘倒退時視為仍然新鮮
        match Utc::now().signed_duration_since(snapshot.fetched_at).to_std() {
            Ok(age) => age >= self.refresh_interval,
            Err(_) => false,
        }
    }

    async fn fetch_domains(&self) -> Result<HashSet<String>> {
        tracing::info!("Fetching disposable email blocklist from {}", self.url);
        let body = self.source.fetch(&self.url).await?;

        let domains = parse_blocklist(&body);
        if domains.is_empty() {
            return Err(VerifierError::BlocklistError {
                message: "response body contained no domains".to_string(),
            });
        }
        Ok(domains)
    }

    fn fallback_snapshot(&self) -> BlocklistSnapshot {
        BlocklistSnapshot {
            domains: self.fallback.clone(),
            fetched_at: Utc::now(),
            source: SnapshotSource::Fallback,
        }
    }

    fn replace(&self, next: Arc<BlocklistSnapshot>) {
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(next);
    }
}

/// One domain per line; blank lines and `#` comments are skipped.
pub fn parse_blocklist(body: &str) -> HashSet<String> {
    body.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}
