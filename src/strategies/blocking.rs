//! Thread-blocking strategies.

use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::suspend::load_contributors_suspend;
use crate::error::Error;
use crate::service::ContributorsService;
use crate::sink::ResultSink;
use crate::types::{RequestData, User};

/// Load contributors sequentially, blocking the calling thread until done.
///
/// Drives its own single-threaded runtime, so it must be called from
/// synchronous code (or from the blocking pool), never from inside an async
/// task.
pub fn load_contributors_blocking(
    service: Arc<dyn ContributorsService>,
    req: &RequestData,
) -> Result<Vec<User>, Error> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Worker(format!("Failed to start runtime: {e}")))?;

    // Nothing can cancel a blocked thread, so the token never fires.
    let never = CancellationToken::new();
    runtime.block_on(load_contributors_suspend(service, req, &never))
}

/// A sequential load running on a dedicated thread.
///
/// Dropping the handle does not stop the thread; its result is discarded
/// when it finishes.
pub struct BackgroundLoad {
    rx: oneshot::Receiver<Result<Vec<User>, Error>>,
}

impl BackgroundLoad {
    /// Wait for the worker's result without blocking the current thread.
    pub async fn wait(self) -> Result<Vec<User>, Error> {
        self.rx
            .await
            .map_err(|_| Error::Worker("Background worker exited without a result".to_string()))?
    }

    /// Wait for the worker and deliver its result to `sink` from the
    /// caller's context.
    pub async fn deliver_to(self, sink: &dyn ResultSink) -> Result<(), Error> {
        let users = self.wait().await?;
        sink.deliver(users, true).await;
        Ok(())
    }
}

/// Start a blocking load on a dedicated thread and return immediately.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn load_contributors_background(
    service: Arc<dyn ContributorsService>,
    req: RequestData,
) -> Result<BackgroundLoad, Error> {
    let (tx, rx) = oneshot::channel();

    thread::Builder::new()
        .name("contributors-background".to_string())
        .spawn(move || {
            let result = load_contributors_blocking(service, &req);
            match &result {
                Ok(users) => info!(org = %req.org, users = users.len(), "Background load finished"),
                Err(e) => error!(org = %req.org, "Background load failed: {}", e),
            }
            if tx.send(result).is_err() {
                info!(org = %req.org, "Background load result discarded");
            }
        })
        .map_err(|e| Error::Worker(format!("Failed to spawn background worker: {e}")))?;

    Ok(BackgroundLoad { rx })
}
