use anyhow::Result;
use async_trait::async_trait;
use lettre::{
  message::header::ContentType, transport::smtp::authentication::Credentials, AsyncSmtpTransport, AsyncTransport,
  Message, Tokio1Executor,
};

use crate::email::types::{ConnectionConfig, OutboundMessage};

#[async_trait]
pub trait MailDispatcher: Send + Sync {
  async fn dispatch(&self, config: &ConnectionConfig, message: &OutboundMessage) -> Result<()>;
}

/// Opens a fresh SMTP connection per message using the request's [`ConnectionConfig`].
#[derive(Debug, Clone, Default)]
pub struct SmtpDispatcher;

impl SmtpDispatcher {
  pub fn new() -> Self {
    SmtpDispatcher
  }

  pub fn transport(config: &ConnectionConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
    let creds = Credentials::new(config.username.clone(), config.password.clone());

    let transporter = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)?
      .credentials(creds)
      .port(config.port)
      .build();

    Ok(transporter)
  }

  pub fn build_message(config: &ConnectionConfig, message: &OutboundMessage) -> Result<Message> {
    let mut builder = Message::builder()
      .from(config.from.clone())
      .subject(&message.subject)
      .header(ContentType::TEXT_HTML);

    for recipient in &message.recipients {
      builder = builder.to(recipient.clone());
    }

    Ok(builder.body(message.body.clone())?)
  }
}

#[async_trait]
impl MailDispatcher for SmtpDispatcher {
  async fn dispatch(&self, config: &ConnectionConfig, message: &OutboundMessage) -> Result<()> {
    let email = Self::build_message(config, message)?;
    let transporter = Self::transport(config)?;

    transporter.send(email).await?;
    tracing::info!("Mail \"{}\" sent via {}:{}", message.subject, config.server, config.port);

    Ok(())
  }
}
