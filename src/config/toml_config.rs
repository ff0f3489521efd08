use crate::config::Settings;
use crate::utils::error::{Result, VerifierError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file for the CLI:
///
/// ```toml
/// [cache]
/// table = "email-verifications"
/// ttl_seconds = 3600
///
/// [blocklist]
/// url = "${BLOCKLIST_URL}"
/// refresh_interval_seconds = 86400
/// fallback_domains = ["mailinator.com", "yopmail.com"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub cache: Option<CacheSection>,
    pub blocklist: Option<BlocklistSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheSection {
    pub table: Option<String>,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlocklistSection {
    pub url: Option<String>,
    pub refresh_interval_seconds: Option<u64>,
    pub fallback_domains: Option<Vec<String>>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${BLOCKLIST_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| VerifierError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 將檔案中有設定的欄位覆蓋到 settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(cache) = &self.cache {
            if let Some(table) = &cache.table {
                settings.cache_table = table.clone();
            }
            if let Some(ttl) = cache.ttl_seconds {
                settings.cache_ttl_secs = ttl;
            }
        }

        if let Some(blocklist) = &self.blocklist {
            if let Some(url) = &blocklist.url {
                settings.blocklist_url = url.clone();
            }
            if let Some(refresh) = blocklist.refresh_interval_seconds {
                settings.blocklist_refresh_secs = refresh;
            }
            if let Some(domains) = &blocklist.fallback_domains {
                settings.fallback_domains = domains.iter().map(|d| d.trim().to_lowercase()).collect();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_only_overrides_given_fields() {
        let config = TomlConfig::from_toml_str(
            r#"
[cache]
ttl_seconds = 600

[blocklist]
fallback_domains = ["Mailinator.com"]
"#,
        )
        .unwrap();

        let mut settings = Settings::default();
        config.apply_to(&mut settings);

        assert_eq!(settings.cache_ttl_secs, 600);
        assert_eq!(settings.cache_table, crate::config::DEFAULT_CACHE_TABLE);
        assert_eq!(settings.fallback_domains, vec!["mailinator.com".to_string()]);
        assert_eq!(settings.blocklist_url, crate::config::DEFAULT_BLOCKLIST_URL);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EMAIL_VERIFIER_TEST_LIST_URL", "https://lists.test/blocklist.conf");

        let config = TomlConfig::from_toml_str(
            r#"
[blocklist]
url = "${EMAIL_VERIFIER_TEST_LIST_URL}"
"#,
        )
        .unwrap();

        assert_eq!(
            config.blocklist.unwrap().url.as_deref(),
            Some("https://lists.test/blocklist.conf")
        );

        std::env::remove_var("EMAIL_VERIFIER_TEST_LIST_URL");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = TomlConfig::from_toml_str("[cache\nttl_seconds = ").unwrap_err();
        assert!(matches!(err, VerifierError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[cache]\ntable = \"from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.cache.unwrap().table.as_deref(), Some("from-file"));
    }
}
