use std::sync::Arc;

use tokio::signal;

use dotenvy::dotenv;

use trip_inquiry_mailer::app::create_app;
use trip_inquiry_mailer::config::AppConfig;
use trip_inquiry_mailer::email::SmtpDispatcher;
use trip_inquiry_mailer::state::SharedAppState;
use trip_inquiry_mailer::utils::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenv().ok();

  init_tracing();

  let config = AppConfig::from_env()?;
  let app_state = SharedAppState::new(config.mail, Arc::new(SmtpDispatcher::new()));
  let app = create_app(app_state);

  let address = config.server.bind_address();
  let listener = tokio::net::TcpListener::bind(&address).await?;

  tracing::info!("Server running on http://{}", address);

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!("Failed to install Ctrl+C handler: {}", e);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
      }
      Err(e) => {
        tracing::error!("Failed to install signal handler: {}", e);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
