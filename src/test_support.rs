use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{
  body::{Body, Bytes},
  http::{Request, StatusCode},
  Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

use crate::{
  app::create_app,
  config::MailSettings,
  domains::inquiry::model::Inquiry,
  email::{ConnectionConfig, MailDispatcher, OutboundMessage},
  state::SharedAppState,
};

pub type RecordedSend = (ConnectionConfig, OutboundMessage);

/// Stands in for SMTP and reports every dispatched message on a channel.
pub struct RecordingDispatcher {
  sent: mpsc::UnboundedSender<RecordedSend>,
}

impl RecordingDispatcher {
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<RecordedSend>) {
    let (sent, rx) = mpsc::unbounded_channel();
    (Self { sent }, rx)
  }
}

#[async_trait]
impl MailDispatcher for RecordingDispatcher {
  async fn dispatch(&self, config: &ConnectionConfig, message: &OutboundMessage) -> anyhow::Result<()> {
    self.sent.send((config.clone(), message.clone()))?;
    Ok(())
  }
}

pub fn mail_settings() -> MailSettings {
  MailSettings {
    username: Some("inbox@concordia.example".to_string()),
    password: Some("secret".to_string()),
    from_name: Some("Concordia Expedition".to_string()),
    port: Some("587".to_string()),
    server: Some("smtp.example.com".to_string()),
  }
}

pub fn sample_inquiry() -> Inquiry {
  serde_json::from_value(sample_inquiry_json()).expect("sample inquiry")
}

pub fn sample_inquiry_json() -> Value {
  json!({
    "name": "A",
    "email": "a@b.com",
    "phone": "1",
    "date": "2024-01-01",
    "destination": "X",
    "departure": "Y",
    "rooms": 1,
    "days": 2,
    "people": 3,
    "message": "hi",
    "comments": "none"
  })
}

pub fn app_with_settings(settings: MailSettings) -> (Router, mpsc::UnboundedReceiver<RecordedSend>) {
  let (dispatcher, rx) = RecordingDispatcher::channel();
  let state = SharedAppState::new(settings, Arc::new(dispatcher));
  (create_app(state), rx)
}

/// Collects dispatched messages until every sender is gone or nothing arrives for a while.
pub async fn drain_sends(rx: &mut mpsc::UnboundedReceiver<RecordedSend>) -> Vec<RecordedSend> {
  let mut sends = Vec::new();
  while let Ok(Some(send)) = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await {
    sends.push(send);
  }
  sends
}

pub async fn post_json<T: Serialize>(app: Router, uri: &str, body: &T) -> (StatusCode, Bytes) {
  let body = serde_json::to_vec(body).expect("serialize request body");
  post_body(app, uri, Some("application/json"), body).await
}

pub async fn post_body(app: Router, uri: &str, content_type: Option<&str>, body: Vec<u8>) -> (StatusCode, Bytes) {
  let mut request = Request::builder().method("POST").uri(uri);
  if let Some(content_type) = content_type {
    request = request.header("content-type", content_type);
  }
  let request = request.body(Body::from(body)).expect("build request");

  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  (status, body)
}
