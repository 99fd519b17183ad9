use std::env;

use anyhow::Context;
use lettre::{message::Mailbox, Address};

use crate::email::ConnectionConfig;

#[derive(Debug)]
pub enum ConfigError {
  Missing(&'static str),
  InvalidPort(String),
  InvalidAddress(String),
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ConfigError::Missing(var) => write!(f, "{} environment variable must be set", var),
      ConfigError::InvalidPort(value) => write!(f, "Invalid mail port: {}", value),
      ConfigError::InvalidAddress(value) => write!(f, "Invalid email address: {}", value),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server: ServerConfig,
  pub mail: MailSettings,
}

impl AppConfig {
  pub fn from_env() -> anyhow::Result<Self> {
    Ok(Self {
      server: ServerConfig::from_env()?,
      mail: MailSettings::from_env(),
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    ServerConfig {
      host: "127.0.0.1".to_string(),
      port: 8000,
    }
  }
}

impl ServerConfig {
  pub fn from_env() -> anyhow::Result<Self> {
    let defaults = Self::default();
    let host = env::var("HOST").unwrap_or(defaults.host);
    let port = match env::var("PORT") {
      Ok(raw) => raw.trim().parse().with_context(|| format!("Invalid PORT: {}", raw))?,
      Err(_) => defaults.port,
    };

    Ok(Self { host, port })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }
}

/// Mail settings as read from the environment.
///
/// Values are kept unparsed so the server can start without them; a missing or
/// malformed value is reported when a request tries to build its
/// [`ConnectionConfig`].
#[derive(Debug, Clone, Default)]
pub struct MailSettings {
  pub username: Option<String>,
  pub password: Option<String>,
  pub from_name: Option<String>,
  pub port: Option<String>,
  pub server: Option<String>,
}

impl MailSettings {
  pub fn from_env() -> Self {
    MailSettings {
      username: env::var("MAIL_USERNAME").ok(),
      password: env::var("MAIL_PASSWORD").ok(),
      from_name: env::var("MAIL_FROM_NAME").ok(),
      port: env::var("MAIL_PORT").ok(),
      server: env::var("MAIL_SERVER").ok(),
    }
  }

  /// The inbox every inquiry is delivered to. It is the account we log in with.
  pub fn inbox(&self) -> Result<Mailbox, ConfigError> {
    let username = required(&self.username, "MAIL_USERNAME")?;
    let address: Address = username
      .parse()
      .map_err(|_| ConfigError::InvalidAddress(username.to_string()))?;
    Ok(Mailbox::new(None, address))
  }

  /// Builds the transport configuration for a message sent on behalf of `sender_email`.
  pub fn connection_config(&self, sender_email: &str) -> Result<ConnectionConfig, ConfigError> {
    let username = required(&self.username, "MAIL_USERNAME")?;
    let password = required(&self.password, "MAIL_PASSWORD")?;
    let from_name = required(&self.from_name, "MAIL_FROM_NAME")?;
    let raw_port = required(&self.port, "MAIL_PORT")?;
    let server = required(&self.server, "MAIL_SERVER")?;

    let port: u16 = raw_port
      .trim()
      .parse()
      .map_err(|_| ConfigError::InvalidPort(raw_port.to_string()))?;

    let sender: Address = sender_email
      .parse()
      .map_err(|_| ConfigError::InvalidAddress(sender_email.to_string()))?;

    Ok(ConnectionConfig {
      username: username.to_string(),
      password: password.to_string(),
      server: server.to_string(),
      port,
      from: Mailbox::new(Some(from_name.to_string()), sender),
    })
  }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
  value.as_deref().ok_or(ConfigError::Missing(name))
}
