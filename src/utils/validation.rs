use crate::utils::error::{Result, VerifierError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(VerifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(VerifierError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(VerifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(VerifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VerifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 封鎖名單網域必須非空、小寫且不含空白
pub fn validate_domain_list(field_name: &str, domains: &[String]) -> Result<()> {
    if domains.is_empty() {
        return Err(VerifierError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "Domain list cannot be empty".to_string(),
        });
    }

    for domain in domains {
        if domain.is_empty() || domain.chars().any(char::is_whitespace) {
            return Err(VerifierError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: domain.clone(),
                reason: "Domain cannot be empty or contain whitespace".to_string(),
            });
        }
        if domain.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(VerifierError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: domain.clone(),
                reason: "Domain must be lowercase".to_string(),
            });
        }
    }

    Ok(())
}
