use std::{error::Error, sync::Arc};

use super::model::Inquiry;
use crate::{
  config::{ConfigError, MailSettings},
  email::{ConnectionConfig, MailDispatcher, OutboundMessage},
  middleware::background::BackgroundTasks,
};

pub const SUBJECT_PREFIX: &str = "Concordia Expedition Trip Plan by ";

#[derive(Debug)]
pub enum InquiryServiceError {
  Configuration(ConfigError),
}

impl Error for InquiryServiceError {}

impl std::fmt::Display for InquiryServiceError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      InquiryServiceError::Configuration(err) => write!(f, "Mail configuration error: {}", err),
    }
  }
}

impl From<ConfigError> for InquiryServiceError {
  fn from(err: ConfigError) -> Self {
    InquiryServiceError::Configuration(err)
  }
}

pub fn subject_for(email: &str) -> String {
  format!("{}{}", SUBJECT_PREFIX, email)
}

/// Renders the mail body. `message` is accepted on the form but has never been
/// part of the mail; keep it out until product decides otherwise.
pub fn format_body(inquiry: &Inquiry) -> String {
  format!(
    concat!(
      "<h3> From: {} </h3>\n",
      "    <h3> Email: {} </h3>\n",
      "    <h3> Phone no. : {} </h3>\n",
      "    <h3> Departure Date: {} </h3>\n",
      "    <h3> Destination: {} </h3>\n",
      "    <h3> Departure City: {} </h3>\n",
      "    <h3> Number of Rooms: {} </h3>\n",
      "    <h3> Number of Days to Stay: {} </h3>\n",
      "    <h3> Number of People: {} </h3>\n",
      "    <h3> Comments: {}\n",
      "    ",
    ),
    inquiry.name,
    inquiry.email,
    inquiry.phone,
    inquiry.date,
    inquiry.destination,
    inquiry.departure,
    inquiry.rooms,
    inquiry.days,
    inquiry.people,
    inquiry.comments,
  )
}

#[derive(Debug, Clone)]
pub struct PreparedMail {
  pub config: ConnectionConfig,
  pub message: OutboundMessage,
}

pub trait InquiryService: Send + Sync {
  fn prepare_mail(&self, inquiry: &Inquiry) -> Result<PreparedMail, InquiryServiceError>;
  fn schedule_send(&self, mail: PreparedMail, tasks: &BackgroundTasks);
}

pub struct InquiryServiceImpl {
  settings: MailSettings,
  dispatcher: Arc<dyn MailDispatcher>,
}

impl InquiryServiceImpl {
  pub fn new(settings: MailSettings, dispatcher: Arc<dyn MailDispatcher>) -> Self {
    Self { settings, dispatcher }
  }
}

impl InquiryService for InquiryServiceImpl {
  fn prepare_mail(&self, inquiry: &Inquiry) -> Result<PreparedMail, InquiryServiceError> {
    let config = self.settings.connection_config(&inquiry.email)?;
    let message = OutboundMessage::html(
      subject_for(&inquiry.email),
      vec![self.settings.inbox()?],
      format_body(inquiry),
    );

    Ok(PreparedMail { config, message })
  }

  fn schedule_send(&self, mail: PreparedMail, tasks: &BackgroundTasks) {
    let dispatcher = Arc::clone(&self.dispatcher);
    tasks.add_task("send_inquiry_mail", async move {
      dispatcher.dispatch(&mail.config, &mail.message).await
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_support::{mail_settings, sample_inquiry, RecordingDispatcher};

  fn service() -> InquiryServiceImpl {
    let (dispatcher, _rx) = RecordingDispatcher::channel();
    InquiryServiceImpl::new(mail_settings(), Arc::new(dispatcher))
  }

  #[test]
  fn test_format_body_matches_form_layout() {
    let expected = "<h3> From: A </h3>
    <h3> Email: a@b.com </h3>
    <h3> Phone no. : 1 </h3>
    <h3> Departure Date: 2024-01-01 </h3>
    <h3> Destination: X </h3>
    <h3> Departure City: Y </h3>
    <h3> Number of Rooms: 1 </h3>
    <h3> Number of Days to Stay: 2 </h3>
    <h3> Number of People: 3 </h3>
    <h3> Comments: none
    ";

    assert_eq!(format_body(&sample_inquiry()), expected);
  }

  #[test]
  fn test_format_body_leaves_out_message() {
    let mut inquiry = sample_inquiry();
    inquiry.message = "please call me back".to_string();
    assert!(!format_body(&inquiry).contains("please call me back"));
  }

  #[test]
  fn test_subject_for() {
    assert_eq!(subject_for("a@b.com"), "Concordia Expedition Trip Plan by a@b.com");
    assert_eq!(
      subject_for("first.last+trips@mail.sub.example.org"),
      "Concordia Expedition Trip Plan by first.last+trips@mail.sub.example.org"
    );
  }

  #[test]
  fn test_prepare_mail() {
    let mut inquiry = sample_inquiry();
    inquiry.email = "someone+tag@sub.example.org".to_string();

    let mail = service().prepare_mail(&inquiry).unwrap();

    assert_eq!(mail.message.subject, "Concordia Expedition Trip Plan by someone+tag@sub.example.org");
    let recipients: Vec<String> = mail.message.recipients.iter().map(|r| r.email.to_string()).collect();
    assert_eq!(recipients, vec!["inbox@concordia.example".to_string()]);
    let formatted = crate::email::SmtpDispatcher::build_message(&mail.config, &mail.message)
      .unwrap()
      .formatted();
    assert!(String::from_utf8(formatted).unwrap().contains("Content-Type: text/html"));
    assert_eq!(mail.config.from.email.to_string(), "someone+tag@sub.example.org");
    assert_eq!(mail.config.port, 587);
  }

  #[test]
  fn test_prepare_mail_with_bad_port() {
    let (dispatcher, _rx) = RecordingDispatcher::channel();
    let mut settings = mail_settings();
    settings.port = Some("five-eight-seven".to_string());
    let service = InquiryServiceImpl::new(settings, Arc::new(dispatcher));

    let err = service.prepare_mail(&sample_inquiry()).unwrap_err();
    assert!(matches!(err, InquiryServiceError::Configuration(ConfigError::InvalidPort(_))));
  }

  #[test]
  fn test_schedule_send_only_queues() {
    let service = service();
    let tasks = BackgroundTasks::new();

    let mail = service.prepare_mail(&sample_inquiry()).unwrap();
    service.schedule_send(mail, &tasks);

    assert_eq!(tasks.len(), 1);
  }
}
