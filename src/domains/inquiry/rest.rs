use axum::{
  extract::State,
  response::{Json as JsonResponse, Redirect},
  routing::{post, Router},
};

use super::model::{Inquiry, SendEmailResponse};
use crate::{
  middleware::{background::BackgroundTasks, validate::ValidatedJson},
  state::{AppState, SharedAppState},
  AppError,
};

pub fn inquiry_routes() -> Router<SharedAppState> {
  Router::new()
    .route("/send-email/", post(send_email_handler))
    .route("/send-email", post(redirect_to_send_email))
}

/// 307 keeps the method and body, so clients posting without the slash retry correctly.
pub async fn redirect_to_send_email() -> Redirect {
  Redirect::temporary("/send-email/")
}

#[axum::debug_handler(state = SharedAppState)]
pub async fn send_email_handler(
  State(state): State<SharedAppState>,
  tasks: BackgroundTasks,
  ValidatedJson(inquiry): ValidatedJson<Inquiry>,
) -> Result<JsonResponse<SendEmailResponse>, AppError> {
  state.send_inquiry(&inquiry, &tasks)?;
  Ok(JsonResponse(SendEmailResponse::sent()))
}
