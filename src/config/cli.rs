use crate::config::toml_config::TomlConfig;
use crate::config::{parse_domain_list, Settings};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "email-verifier")]
#[command(about = "Verify an email address: syntax, disposable domain, MX records and mailbox")]
pub struct CliConfig {
    /// Address to verify
    pub email: String,

    #[arg(long, default_value = "./.email-verifier")]
    pub cache_dir: String,

    #[arg(long, help = "TOML settings file")]
    pub config: Option<String>,

    #[arg(long)]
    pub cache_table: Option<String>,

    #[arg(long, help = "Cache entry TTL in seconds")]
    pub cache_ttl: Option<u64>,

    #[arg(long)]
    pub blocklist_url: Option<String>,

    #[arg(long)]
    pub blocklist_refresh_secs: Option<u64>,

    #[arg(long, help = "Comma-separated fallback disposable domains")]
    pub fallback_domains: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 優先順序：命令列 > TOML 檔案 > 預設值
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading settings from {}", path);
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        if let Some(table) = &self.cache_table {
            settings.cache_table = table.clone();
        }
        if let Some(ttl) = self.cache_ttl {
            settings.cache_ttl_secs = ttl;
        }
        if let Some(url) = &self.blocklist_url {
            settings.blocklist_url = url.clone();
        }
        if let Some(refresh) = self.blocklist_refresh_secs {
            settings.blocklist_refresh_secs = refresh;
        }
        if let Some(domains) = &self.fallback_domains {
            settings.fallback_domains = parse_domain_list(domains);
        }

        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_no_flags() {
        let config = CliConfig::try_parse_from(["email-verifier", "a@example.com"]).unwrap();

        assert_eq!(config.email, "a@example.com");
        assert_eq!(config.settings().unwrap(), Settings::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[cache]\ntable = \"from-file\"\nttl_seconds = 60\n")
            .unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        let config = CliConfig::try_parse_from([
            "email-verifier",
            "a@example.com",
            "--config",
            &path,
            "--cache-ttl",
            "120",
            "--fallback-domains",
            "Trashmail.com,spam4.me",
        ])
        .unwrap();
        let settings = config.settings().unwrap();

        assert_eq!(settings.cache_table, "from-file");
        assert_eq!(settings.cache_ttl_secs, 120);
        assert_eq!(
            settings.fallback_domains,
            vec!["trashmail.com".to_string(), "spam4.me".to_string()]
        );
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let config = CliConfig::try_parse_from([
            "email-verifier",
            "a@example.com",
            "--blocklist-url",
            "ftp://lists.test/blocklist.conf",
        ])
        .unwrap();

        assert!(config.settings().is_err());
    }
}
