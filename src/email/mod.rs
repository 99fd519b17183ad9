//! Outbound mail.
//!
//! Transport settings and message types, plus the [`MailDispatcher`] seam the
//! HTTP layer hands composed messages to. [`SmtpDispatcher`] sends them with
//! lettre's async SMTP transport.

mod service;
mod types;

pub use service::{MailDispatcher, SmtpDispatcher};
pub use types::{ConnectionConfig, OutboundMessage};
