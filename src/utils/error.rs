use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid request body: {message}")]
    InvalidRequest { message: String },

    #[error("Blocklist fetch failed: {message}")]
    BlocklistError { message: String },

    #[error("DNS lookup failed: {message}")]
    DnsError { message: String },

    #[error("Cache store error: {message}")]
    StoreError { message: String },

    #[error("Mailbox verification failed: {message}")]
    MailboxError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl VerifierError {
    /// 呼叫端輸入錯誤 (400)，其餘一律視為伺服器錯誤 (500)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingEmail | Self::InvalidRequest { .. })
    }

    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifierError>;
