//! Configuration for the registration service.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// Service configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// SMTP relay configuration
    #[serde(default)]
    pub smtp: SmtpConfig,

    /// Table store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    #[serde(default)]
    pub hostname: String,

    /// SMTP port; falls back to the standard port of the security mode
    #[serde(default)]
    pub port: Option<u16>,

    /// SMTP username
    #[serde(default)]
    pub username: String,

    /// SMTP password
    #[serde(default = "empty_secret")]
    pub password: SecretString,

    /// Transport security
    #[serde(default)]
    pub security: SmtpSecurity,
}

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Unencrypted connection
    #[default]
    Plain,
    /// Plain connection upgraded with STARTTLS
    Starttls,
    /// Implicit TLS from the first byte
    Tls,
}

impl SmtpSecurity {
    /// Standard port for this mode.
    pub fn default_port(self) -> u16 {
        match self {
            SmtpSecurity::Plain => 25,
            SmtpSecurity::Starttls => 587,
            SmtpSecurity::Tls => 465,
        }
    }
}

impl SmtpConfig {
    /// Configured port, or the standard one for the security mode.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.security.default_port())
    }
}

impl ServerConfig {
    /// Address to bind; an unparsable listen address is an error.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address {:?}", self.listen_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    /// Table store base URL (not validated at startup)
    #[serde(default)]
    pub url: String,

    /// Table store access key
    #[serde(default = "empty_secret")]
    pub access_key: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default implementations
impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            port: None,
            username: String::new(),
            password: empty_secret(),
            security: SmtpSecurity::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            access_key: empty_secret(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn empty_secret() -> SecretString {
    SecretString::new(String::new())
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
