use crate::config::{
    parse_domain_list, DEFAULT_BLOCKLIST_REFRESH_SECS, DEFAULT_BLOCKLIST_URL,
    DEFAULT_CACHE_TTL_SECS, DEFAULT_FALLBACK_DOMAINS,
};
use crate::core::{CacheEntry, ConfigProvider, KeyValueStore, MailboxVerifier, Verification};
use crate::utils::error::{Result, VerifierError};
use crate::utils::validation::{
    validate_domain_list, validate_non_empty_string, validate_positive_number, validate_url,
    Validate,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_ses::Client as SesClient;
use std::collections::HashMap;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub dynamodb_table: String,
    pub cache_ttl_secs: u64,
    pub blocklist_url: String,
    pub blocklist_refresh_secs: u64,
    pub fallback_domains: Vec<String>,
    pub region: Option<String>,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dynamodb_table =
            lookup("DYNAMODB_TABLE").ok_or_else(|| VerifierError::MissingConfigError {
                field: "DYNAMODB_TABLE".to_string(),
            })?;

        Ok(Self {
            dynamodb_table,
            cache_ttl_secs: parse_secs("CACHE_TTL", lookup("CACHE_TTL"), DEFAULT_CACHE_TTL_SECS)?,
            blocklist_url: lookup("BLOCKLIST_URL")
                .unwrap_or_else(|| DEFAULT_BLOCKLIST_URL.to_string()),
            blocklist_refresh_secs: parse_secs(
                "BLOCKLIST_REFRESH_SECS",
                lookup("BLOCKLIST_REFRESH_SECS"),
                DEFAULT_BLOCKLIST_REFRESH_SECS,
            )?,
            fallback_domains: lookup("FALLBACK_DOMAINS")
                .map(|raw| parse_domain_list(&raw))
                .unwrap_or_else(|| {
                    DEFAULT_FALLBACK_DOMAINS
                        .iter()
                        .map(|d| d.to_string())
                        .collect()
                }),
            region: lookup("AWS_REGION"),
        })
    }
}

fn parse_secs(field: &str, raw: Option<String>, default: u64) -> Result<u64> {
    match raw {
        None => Ok(default),
        Some(value) => {
            value
                .trim()
                .parse()
                .map_err(|_| VerifierError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "Expected a whole number of seconds".to_string(),
                })
        }
    }
}

impl ConfigProvider for LambdaConfig {
    fn cache_table(&self) -> &str {
        &self.dynamodb_table
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    fn blocklist_url(&self) -> &str {
        &self.blocklist_url
    }

    fn blocklist_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.blocklist_refresh_secs)
    }

    fn fallback_domains(&self) -> &[String] {
        &self.fallback_domains
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        // 驗證 DynamoDB 表名
        validate_non_empty_string("dynamodb_table", &self.dynamodb_table)?;

        validate_positive_number("cache_ttl", self.cache_ttl_secs, 1)?;
        validate_url("blocklist_url", &self.blocklist_url)?;
        validate_positive_number("blocklist_refresh_secs", self.blocklist_refresh_secs, 1)?;
        validate_domain_list("fallback_domains", &self.fallback_domains)?;

        if let Some(region) = &self.region {
            validate_aws_region("region", region)?;
        }

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(VerifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}

/// Verdict cache in a DynamoDB table keyed by `email`. The `ttl` attribute
/// holds the expiry in epoch seconds so DynamoDB TTL can reap old items.
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: DynamoDbClient,
    table: String,
}

impl DynamoDbStore {
    pub fn new(client: DynamoDbClient, table: String) -> Self {
        Self { client, table }
    }
}

#[async_trait]
impl KeyValueStore for DynamoDbStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("email", AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(|e| VerifierError::StoreError {
                message: format!(
                    "Failed to read from DynamoDB: {}",
                    aws_sdk_dynamodb::error::DisplayErrorContext(&e)
                ),
            })?;

        output.item().map(entry_from_item).transpose()
    }

    async fn put(&self, item: CacheEntry) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(entry_to_item(&item)))
            .send()
            .await
            .map_err(|e| VerifierError::StoreError {
                message: format!(
                    "Failed to write to DynamoDB: {}",
                    aws_sdk_dynamodb::error::DisplayErrorContext(&e)
                ),
            })?;
        Ok(())
    }
}

pub(crate) fn entry_to_item(entry: &CacheEntry) -> HashMap<String, AttributeValue> {
    let v = &entry.verification;
    let verification = HashMap::from([
        ("email".to_string(), AttributeValue::S(v.email.clone())),
        ("syntax".to_string(), AttributeValue::Bool(v.syntax_valid)),
        ("disposable".to_string(), AttributeValue::Bool(v.disposable)),
        ("mxRecord".to_string(), AttributeValue::Bool(v.has_mx_record)),
        ("smtp".to_string(), AttributeValue::Bool(v.mailbox_verified)),
        ("verified".to_string(), AttributeValue::Bool(v.verified)),
    ]);

    HashMap::from([
        ("email".to_string(), AttributeValue::S(entry.email.clone())),
        ("verification".to_string(), AttributeValue::M(verification)),
        ("ttl".to_string(), AttributeValue::N(entry.expires_at.to_string())),
    ])
}

pub(crate) fn entry_from_item(item: &HashMap<String, AttributeValue>) -> Result<CacheEntry> {
    let malformed = |field: &str| VerifierError::StoreError {
        message: format!("Malformed cache item: missing or invalid '{}'", field),
    };

    let email = item
        .get("email")
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| malformed("email"))?;
    let expires_at = item
        .get("ttl")
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .ok_or_else(|| malformed("ttl"))?;
    let fields = item
        .get("verification")
        .and_then(|v| v.as_m().ok())
        .ok_or_else(|| malformed("verification"))?;

    let flag = |name: &str| {
        fields
            .get(name)
            .and_then(|v| v.as_bool().ok())
            .copied()
            .ok_or_else(|| malformed(name))
    };

    Ok(CacheEntry {
        email: email.clone(),
        verification: Verification {
            email: fields
                .get("email")
                .and_then(|v| v.as_s().ok())
                .cloned()
                .unwrap_or_else(|| email.clone()),
            syntax_valid: flag("syntax")?,
            disposable: flag("disposable")?,
            has_mx_record: flag("mxRecord")?,
            mailbox_verified: flag("smtp")?,
            verified: flag("verified")?,
        },
        expires_at,
    })
}

/// Mailbox verification through SES `VerifyEmailAddress`.
#[derive(Debug, Clone)]
pub struct SesMailboxProbe {
    client: SesClient,
}

impl SesMailboxProbe {
    pub fn new(client: SesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MailboxVerifier for SesMailboxProbe {
    async fn attempt(&self, email: &str) -> Result<()> {
        self.client
            .verify_email_address()
            .email_address(email)
            .send()
            .await
            .map_err(|e| VerifierError::MailboxError {
                message: aws_sdk_ses::error::DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }
}
