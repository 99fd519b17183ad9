use std::sync::Arc;

use crate::{
  config::MailSettings,
  domains::inquiry::{
    model::Inquiry,
    service::{InquiryService, InquiryServiceError, InquiryServiceImpl},
  },
  email::MailDispatcher,
  middleware::background::BackgroundTasks,
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn send_inquiry(&self, inquiry: &Inquiry, tasks: &BackgroundTasks) -> Result<(), InquiryServiceError>;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub inquiry_service: Arc<InquiryServiceImpl>,
}

impl SharedAppState {
  pub fn new(mail_settings: MailSettings, dispatcher: Arc<dyn MailDispatcher>) -> Self {
    let inquiry_service = Arc::new(InquiryServiceImpl::new(mail_settings, dispatcher));

    Self { inquiry_service }
  }
}

impl AppState for SharedAppState {
  fn send_inquiry(&self, inquiry: &Inquiry, tasks: &BackgroundTasks) -> Result<(), InquiryServiceError> {
    let mail = self.inquiry_service.prepare_mail(inquiry)?;
    self.inquiry_service.schedule_send(mail, tasks);
    Ok(())
  }
}
