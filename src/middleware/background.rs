//! Work that runs after the response has been produced.
//!
//! [`run_background_tasks`] installs a fresh [`BackgroundTasks`] queue in every
//! request. Handlers extract it and enqueue futures; once the inner service has
//! returned its response the queue is drained into a single detached tokio task
//! that runs the futures in order. Failures are logged and dropped, the client
//! has already been answered.

use std::{
  future::Future,
  pin::Pin,
  sync::{Arc, Mutex, PoisonError},
};

use axum::{
  extract::{FromRequestParts, Request},
  http::request::Parts,
  middleware::Next,
  response::Response,
};

use crate::AppError;

type Task = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

#[derive(Clone, Default)]
pub struct BackgroundTasks {
  queue: Arc<Mutex<Vec<(&'static str, Task)>>>,
}

impl BackgroundTasks {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_task<F>(&self, name: &'static str, task: F)
  where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
  {
    self
      .queue
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .push((name, Box::pin(task)));
  }

  pub fn len(&self) -> usize {
    self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Detaches everything queued so far. Returns the number of tasks handed off.
  pub fn spawn_all(&self) -> usize {
    let tasks = std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner));
    let count = tasks.len();
    if count == 0 {
      return 0;
    }

    tokio::spawn(async move {
      for (name, task) in tasks {
        match task.await {
          Ok(()) => tracing::debug!(task = name, "Background task finished"),
          Err(e) => tracing::error!(task = name, "Background task failed: {:?}", e),
        }
      }
    });

    count
  }
}

impl std::fmt::Debug for BackgroundTasks {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BackgroundTasks").field("pending", &self.len()).finish()
  }
}

impl<S> FromRequestParts<S> for BackgroundTasks
where
  S: Send + Sync,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts.extensions.get::<BackgroundTasks>().cloned().ok_or_else(|| {
      tracing::error!("BackgroundTasks requested but run_background_tasks layer is not installed");
      AppError::internal_server_error("Internal server error occurred")
    })
  }
}

pub async fn run_background_tasks(mut request: Request, next: Next) -> Response {
  let tasks = BackgroundTasks::new();
  request.extensions_mut().insert(tasks.clone());

  let response = next.run(request).await;

  let spawned = tasks.spawn_all();
  if spawned > 0 {
    tracing::debug!("Deferred {} background task(s)", spawned);
  }

  response
}
