use serde::Deserialize;
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub limits: LimitsConfig,
    /// Staff session token configuration
    pub jwt: JwtAuthConfig,
    /// Outbound email (guest notifications and staff magic links)
    #[serde(default)]
    pub email: EmailConfig,
    /// First admin account created at startup
    #[serde(default)]
    pub admin: AdminBootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl From<&DatabaseConfig> for persistence::db::DatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections,
            min_connections: config.min_connections,
            connect_timeout_secs: config.connect_timeout_secs,
            idle_timeout_secs: config.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Per client IP limit on public write endpoints (0 disables)
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Send Strict-Transport-Security (only behind TLS termination)
    #[serde(default)]
    pub hsts_enabled: bool,

    /// Identify rate-limited clients by the first `X-Forwarded-For` hop.
    /// Only enable behind a proxy that sets the header itself.
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Largest party accepted by the public booking form
    #[serde(default = "default_max_party_size")]
    pub max_party_size: i32,

    #[serde(default = "default_login_link_ttl_minutes")]
    pub login_link_ttl_minutes: i64,

    #[serde(default = "default_invite_ttl_hours")]
    pub invite_ttl_hours: i64,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_rate_limit() -> u32 {
    20
}
fn default_max_party_size() -> i32 {
    10
}
fn default_login_link_ttl_minutes() -> i64 {
    15
}
fn default_invite_ttl_hours() -> i64 {
    72
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// HMAC secret for signing session tokens (at least 32 bytes)
    pub secret: String,

    /// Session lifetime in seconds (default: 43200 = 12 hours)
    #[serde(default = "default_session_expiry")]
    pub session_expiry_secs: i64,

    /// Clock skew tolerance in seconds
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

fn default_session_expiry() -> i64 {
    43200
}

fn default_jwt_leeway() -> u64 {
    30
}

/// Email provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Whether email sending is enabled
    #[serde(default)]
    pub enabled: bool,

    /// Email provider: sendgrid or console (for development)
    #[serde(default = "default_email_provider")]
    pub provider: String,

    /// SendGrid API key (for sendgrid provider)
    #[serde(default)]
    pub sendgrid_api_key: String,

    /// Sender email address (From header)
    #[serde(default = "default_sender_email")]
    pub sender_email: String,

    /// Sender name (From header)
    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Base URL of the staff frontend, used for magic links
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_restaurant_name")]
    pub restaurant_name: String,

    #[serde(default = "default_contact_email")]
    pub contact_email: String,

    #[serde(default = "default_contact_phone")]
    pub contact_phone: String,

    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_email_provider(),
            sendgrid_api_key: String::new(),
            sender_email: default_sender_email(),
            sender_name: default_sender_name(),
            base_url: String::new(),
            restaurant_name: default_restaurant_name(),
            contact_email: default_contact_email(),
            contact_phone: default_contact_phone(),
            address: default_address(),
        }
    }
}

fn default_email_provider() -> String {
    "console".to_string()
}

fn default_sender_email() -> String {
    "noreply@madotrestaurant.com".to_string()
}

fn default_sender_name() -> String {
    "Madot Restaurant".to_string()
}

fn default_restaurant_name() -> String {
    "Madot Restaurant".to_string()
}

fn default_contact_email() -> String {
    "info@madotrestaurant.com".to_string()
}

fn default_contact_phone() -> String {
    "(555) 123-4567".to_string()
}

fn default_address() -> String {
    "123 Gourmet Street, Food City".to_string()
}

/// Admin bootstrap configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminBootstrapConfig {
    /// Email of the admin created on first start (empty disables bootstrap)
    #[serde(default)]
    pub bootstrap_email: String,

    #[serde(default = "default_admin_name")]
    pub bootstrap_name: String,
}

impl Default for AdminBootstrapConfig {
    fn default() -> Self {
        Self {
            bootstrap_email: String::new(),
            bootstrap_name: default_admin_name(),
        }
    }
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

/// Supported email providers.
pub const EMAIL_PROVIDERS: [&str; 2] = ["console", "sendgrid"];

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with RB__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("RB")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults so tests do not depend on
    /// the working directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 2
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            rate_limit_per_minute = 20
            trust_forwarded_for = false

            [limits]
            max_party_size = 10
            login_link_ttl_minutes = 15
            invite_ttl_hours = 72

            [jwt]
            secret = "test-secret-that-is-long-enough-for-hs256"
            session_expiry_secs = 43200
            leeway_secs = 30

            [email]
            enabled = false
            provider = "console"
            sender_email = "test@example.com"
            sender_name = "Test"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RB__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RB__JWT__SECRET environment variable must be set".to_string(),
            ));
        }

        if self.jwt.secret.len() < shared::jwt::MIN_SECRET_LEN {
            return Err(ConfigValidationError::InvalidValue(format!(
                "jwt.secret must be at least {} bytes",
                shared::jwt::MIN_SECRET_LEN
            )));
        }

        if !EMAIL_PROVIDERS.contains(&self.email.provider.as_str()) {
            return Err(ConfigValidationError::InvalidValue(format!(
                "Unknown email provider '{}' (expected one of: {})",
                self.email.provider,
                EMAIL_PROVIDERS.join(", ")
            )));
        }

        if self.email.enabled
            && self.email.provider == "sendgrid"
            && self.email.sendgrid_api_key.is_empty()
        {
            return Err(ConfigValidationError::MissingRequired(
                "email.sendgrid_api_key is required for the sendgrid provider".to_string(),
            ));
        }

        if self.limits.max_party_size < 1 {
            return Err(ConfigValidationError::InvalidValue(
                "limits.max_party_size must be at least 1".to_string(),
            ));
        }

        if self.limits.login_link_ttl_minutes < 1 || self.limits.invite_ttl_hours < 1 {
            return Err(ConfigValidationError::InvalidValue(
                "Magic link lifetimes must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
