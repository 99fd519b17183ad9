use lettre::message::Mailbox;

/// SMTP settings for one send. The connection always starts in plain text and
/// upgrades with STARTTLS before authenticating.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
  pub username: String,
  pub password: String,
  pub server: String,
  pub port: u16,
  pub from: Mailbox,
}

/// A composed HTML mail.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
  pub subject: String,
  pub recipients: Vec<Mailbox>,
  pub body: String,
}

impl OutboundMessage {
  pub fn html(subject: String, recipients: Vec<Mailbox>, body: String) -> Self {
    OutboundMessage {
      subject,
      recipients,
      body,
    }
  }
}
