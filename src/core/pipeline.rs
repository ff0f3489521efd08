use crate::core::blocklist::BlocklistStore;
use crate::core::cache::ResultCache;
use crate::core::matcher::DomainMatcher;
use crate::core::mx::MxResolver;
use crate::core::probe::MailboxProbe;
use crate::core::{
    BlocklistSnapshot, BlocklistSource, ConfigProvider, KeyValueStore, MailExchangeResolver,
    MailboxVerifier, Verification, VerificationOutcome, Verifier,
};
use crate::utils::error::{Result, VerifierError};
use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape pattern is valid")
});

/// Where a verification currently is. Every check either advances to the
/// next stage or jumps to `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    CacheLookup,
    BlocklistRefresh,
    SyntaxCheck,
    DisposableCheck { domain: String },
    MxCheck { domain: String },
    MailboxCheck,
    /// Verdict is final and still has to be written to the cache.
    Completed,
    Returned { cached: bool },
}

pub struct VerificationPipeline {
    cache: ResultCache,
    blocklist: Arc<BlocklistStore>,
    mx: MxResolver,
    probe: MailboxProbe,
}

impl VerificationPipeline {
    pub fn new(
        cache: ResultCache,
        blocklist: Arc<BlocklistStore>,
        mx: MxResolver,
        probe: MailboxProbe,
    ) -> Self {
        Self {
            cache,
            blocklist,
            mx,
            probe,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(
        config: &C,
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn BlocklistSource>,
        resolver: Arc<dyn MailExchangeResolver>,
        verifier: Arc<dyn MailboxVerifier>,
    ) -> Self {
        Self::new(
            ResultCache::new(store, config.cache_ttl()),
            Arc::new(BlocklistStore::from_config(source, config)),
            MxResolver::new(resolver),
            MailboxProbe::new(verifier),
        )
    }

    pub fn blocklist(&self) -> &BlocklistStore {
        &self.blocklist
    }

    async fn run(&self, email: &str) -> Result<VerificationOutcome> {
        let mut verdict = Verification::new(email);
        let mut blocklist: Option<Arc<BlocklistSnapshot>> = None;
        let mut stage = Stage::CacheLookup;

        loop {
            tracing::debug!("{} -> {:?}", email, stage);

            stage = match stage {
                Stage::CacheLookup => match self.cache.get(email).await {
                    Some(cached) => {
                        verdict = cached;
                        Stage::Returned { cached: true }
                    }
                    None => Stage::BlocklistRefresh,
                },

                Stage::BlocklistRefresh => {
                    blocklist = Some(self.blocklist.ensure_fresh().await);
                    Stage::SyntaxCheck
                }

                Stage::SyntaxCheck => {
                    verdict = verdict.with_syntax(is_valid_shape(email));
                    if verdict.syntax_valid {
                        let domain =
                            extract_domain(email).ok_or_else(|| VerifierError::InternalError {
                                message: format!("no domain part in {}", email),
                            })?;
                        Stage::DisposableCheck { domain }
                    } else {
                        Stage::Completed
                    }
                }

                Stage::DisposableCheck { domain } => {
                    let snapshot =
                        blocklist
                            .as_deref()
                            .ok_or_else(|| VerifierError::InternalError {
                                message: "blocklist was not refreshed before matching".to_string(),
                            })?;
                    let matched = DomainMatcher::new(snapshot).matched_suffix(&domain);
                    if let Some(suffix) = matched {
                        tracing::info!("{} is disposable (matched {})", domain, suffix);
                    }
                    verdict = verdict.with_disposable(matched.is_some());
                    if verdict.disposable {
                        Stage::Completed
                    } else {
                        Stage::MxCheck { domain }
                    }
                }

                Stage::MxCheck { domain } => {
                    verdict = verdict.with_mx_record(self.mx.has_valid_mx(&domain).await);
                    if verdict.has_mx_record {
                        Stage::MailboxCheck
                    } else {
                        Stage::Completed
                    }
                }

                Stage::MailboxCheck => {
                    verdict = verdict.with_mailbox(self.probe.probe(email).await);
                    Stage::Completed
                }

                Stage::Completed => {
                    self.cache.put(email, &verdict).await;
                    Stage::Returned { cached: false }
                }

                Stage::Returned { cached } => {
                    return Ok(VerificationOutcome {
                        verification: verdict,
                        cached,
                    });
                }
            };
        }
    }
}

#[async_trait]
impl Verifier for VerificationPipeline {
    async fn verify(&self, email: &str) -> Result<VerificationOutcome> {
        let outcome = self.run(email).await?;
        let v = &outcome.verification;
        tracing::info!(
            "📧 {} cached={} syntax={} disposable={} mx={} smtp={} verified={}",
            v.email,
            outcome.cached,
            v.syntax_valid,
            v.disposable,
            v.has_mx_record,
            v.mailbox_verified,
            v.verified
        );
        Ok(outcome)
    }
}

/// Minimal `local@domain.tld` shape check, not the RFC 5321 grammar.
pub fn is_valid_shape(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// Everything after the first `@`, lower-cased.
pub fn extract_domain(email: &str) -> Option<String> {
    email
        .split_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .filter(|domain| !domain.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryStore;
    use crate::core::{CacheEntry, MxRecord};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticSource(std::result::Result<&'static str, &'static str>);

    #[async_trait]
    impl BlocklistSource for StaticSource {
        async fn fetch(&self, _url: &str) -> Result<String> {
            self.0
                .map(str::to_string)
                .map_err(|e| VerifierError::BlocklistError {
                    message: e.to_string(),
                })
        }
    }

    #[derive(Default)]
    struct CountingResolver {
        calls: AtomicUsize,
        has_records: bool,
    }

    #[async_trait]
    impl MailExchangeResolver for CountingResolver {
        async fn resolve_mail_exchange(&self, domain: &str) -> Result<Vec<MxRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.has_records {
                Ok(vec![MxRecord::new(10, format!("mx.{}", domain))])
            } else {
                Err(VerifierError::DnsError {
                    message: "no record found".to_string(),
                })
            }
        }
    }

    #[derive(Default)]
    struct CountingVerifier {
        calls: AtomicUsize,
        accept: bool,
    }

    #[async_trait]
    impl MailboxVerifier for CountingVerifier {
        async fn attempt(&self, _email: &str) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.accept {
                Ok(())
            } else {
                Err(VerifierError::MailboxError {
                    message: "address rejected".to_string(),
                })
            }
        }
    }

    struct Harness {
        pipeline: VerificationPipeline,
        store: Arc<InMemoryStore>,
        resolver: Arc<CountingResolver>,
        verifier: Arc<CountingVerifier>,
    }

    fn harness(has_records: bool, accept: bool) -> Harness {
        let store = Arc::new(InMemoryStore::new());
        let resolver = Arc::new(CountingResolver {
            has_records,
            ..Default::default()
        });
        let verifier = Arc::new(CountingVerifier {
            accept,
            ..Default::default()
        });
        let blocklist = Arc::new(BlocklistStore::new(
            Arc::new(StaticSource(Ok("tempmail.com\nsharklasers.com\n"))),
            "https://lists.test/blocklist.conf",
            Duration::from_secs(3600),
            &["mailinator.com".to_string()],
        ));

        let pipeline = VerificationPipeline::new(
            ResultCache::new(store.clone(), Duration::from_secs(3600)),
            blocklist,
            MxResolver::new(resolver.clone()),
            MailboxProbe::new(verifier.clone()),
        );

        Harness {
            pipeline,
            store,
            resolver,
            verifier,
        }
    }

    #[test]
    fn test_is_valid_shape() {
        assert!(is_valid_shape("user@example.com"));
        assert!(is_valid_shape("first.last+tag@sub.example.co.uk"));
        assert!(!is_valid_shape("not-an-email"));
        assert!(!is_valid_shape("user@localhost"));
        assert!(!is_valid_shape("user @example.com"));
        assert!(!is_valid_shape("a@b@example.com"));
        assert!(!is_valid_shape("@example.com"));
    }

    #[test]
    fn test_extract_domain_lowercases() {
        assert_eq!(
            extract_domain("User@Mail.Example.COM"),
            Some("mail.example.com".to_string())
        );
        assert_eq!(extract_domain("no-at-sign"), None);
    }

    #[tokio::test]
    async fn test_malformed_email_stops_after_syntax() {
        let h = harness(true, true);

        let outcome = h.pipeline.verify("not-an-email").await.unwrap();

        assert!(!outcome.cached);
        assert_eq!(outcome.verification, Verification::new("not-an-email"));
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 0);

        let stored = h.store.get("not-an-email").await.unwrap().unwrap();
        assert_eq!(stored.verification, outcome.verification);
    }

    #[tokio::test]
    async fn test_disposable_domain_skips_network_checks() {
        let h = harness(true, true);

        let outcome = h.pipeline.verify("a@mailinator.com").await.unwrap();

        let v = outcome.verification;
        assert!(v.syntax_valid);
        assert!(v.disposable);
        assert!(!v.has_mx_record);
        assert!(!v.mailbox_verified);
        assert!(!v.verified);
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disposable_sub_label_matches() {
        let h = harness(true, true);

        let outcome = h.pipeline.verify("x@Mail.TempMail.com").await.unwrap();

        assert!(outcome.verification.disposable);
    }

    #[tokio::test]
    async fn test_missing_mx_stops_before_mailbox() {
        let h = harness(false, true);

        let outcome = h.pipeline.verify("someone@example.org").await.unwrap();

        let v = outcome.verification;
        assert!(v.syntax_valid);
        assert!(!v.disposable);
        assert!(!v.has_mx_record);
        assert!(!v.mailbox_verified);
        assert!(!v.verified);
        assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_stages_pass() {
        let h = harness(true, true);

        let outcome = h.pipeline.verify("someone@example.org").await.unwrap();

        let v = outcome.verification;
        assert!(v.syntax_valid && v.has_mx_record && v.mailbox_verified && v.verified);
        assert!(!v.disposable);
    }

    #[tokio::test]
    async fn test_mailbox_rejection_clears_verified() {
        let h = harness(true, false);

        let outcome = h.pipeline.verify("someone@example.org").await.unwrap();

        let v = outcome.verification;
        assert!(v.has_mx_record);
        assert!(!v.mailbox_verified);
        assert!(!v.verified);
        assert!(h.store.get("someone@example.org").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_second_call_is_served_from_cache() {
        let h = harness(true, true);

        let first = h.pipeline.verify("someone@example.org").await.unwrap();
        let second = h.pipeline.verify("someone@example.org").await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.verification, second.verification);
        assert_eq!(h.resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_verdict_is_returned_verbatim() {
        let h = harness(true, true);
        // 快取中的結論即使與目前封鎖名單不一致也原樣回傳
        let stale = Verification::new("x@tempmail.com")
            .with_syntax(true)
            .with_mx_record(true)
            .with_mailbox(true);
        h.store
            .put(CacheEntry {
                email: "x@tempmail.com".to_string(),
                verification: stale.clone(),
                expires_at: Utc::now().timestamp() + 60,
            })
            .await
            .unwrap();

        let outcome = h.pipeline.verify("x@tempmail.com").await.unwrap();

        assert!(outcome.cached);
        assert_eq!(outcome.verification, stale);
        assert!(h.pipeline.blocklist().snapshot().is_none());
    }

    #[tokio::test]
    async fn test_cache_miss_refreshes_blocklist() {
        let h = harness(true, true);

        h.pipeline.verify("not-an-email").await.unwrap();

        assert!(h.pipeline.blocklist().contains("tempmail.com"));
        assert!(h.pipeline.blocklist().contains("mailinator.com"));
    }
}
