//! Sink that records every delivery.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::aggregate::total_contributions;
use crate::sink::ResultSink;
use crate::types::User;

/// One recorded call to [`ResultSink::deliver`].
#[derive(Debug, Clone)]
pub struct Delivery {
    pub users: Vec<User>,
    pub completed: bool,
    /// When the delivery finished, on the tokio clock
    pub at: Instant,
}

/// [`ResultSink`] that keeps every delivery for later assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delay: Duration,
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every delivery suspend for `delay` before it is recorded.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.deliveries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last delivered ranking, if any.
    pub fn last(&self) -> Option<Vec<User>> {
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .map(|d| d.users.clone())
    }

    /// Total contributions of every delivery, in delivery order.
    pub fn totals(&self) -> Vec<u64> {
        self.deliveries()
            .iter()
            .map(|d| total_contributions(&d.users))
            .collect()
    }
}

#[async_trait]
impl ResultSink for RecordingSink {
    async fn deliver(&self, users: Vec<User>, completed: bool) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Delivery {
                users,
                completed,
                at: Instant::now(),
            });
    }
}
