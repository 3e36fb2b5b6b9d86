//! Bounded fan-in channel: many producers, exactly one consumer.
//!
//! Producers suspend while the buffer is full and the consumer suspends while
//! it is empty. There is no unbounded mode; a slow consumer always pushes
//! back on its producers instead of letting the queue grow.

use std::future::Future;

use tokio::sync::{mpsc, oneshot};

use crate::error::Error;

/// Buffer capacity of a fan-in channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    /// No buffer: `send` completes only once the consumer has taken the item.
    Rendezvous,
    /// Up to `n` items wait in the buffer before producers suspend.
    Buffered(usize),
}

impl Default for Capacity {
    fn default() -> Self {
        Self::Rendezvous
    }
}

impl From<usize> for Capacity {
    fn from(n: usize) -> Self {
        match n {
            0 => Self::Rendezvous,
            n => Self::Buffered(n),
        }
    }
}

struct Envelope<T> {
    item: T,
    /// Present in rendezvous mode; fired once the consumer takes the item.
    ack: Option<oneshot::Sender<()>>,
}

/// Sending half. Clone it once per producer.
pub struct Producer<T> {
    tx: mpsc::Sender<Envelope<T>>,
    rendezvous: bool,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            rendezvous: self.rendezvous,
        }
    }
}

/// Receiving half. There is exactly one per channel.
pub struct Consumer<T> {
    rx: mpsc::Receiver<Envelope<T>>,
}

/// Create a fan-in channel with the given capacity.
pub fn bounded<T>(capacity: Capacity) -> (Producer<T>, Consumer<T>) {
    let (rendezvous, slots) = match capacity {
        // A single slot plus an acknowledgement gives rendezvous semantics.
        Capacity::Rendezvous => (true, 1),
        Capacity::Buffered(n) => (false, n.max(1)),
    };
    let (tx, rx) = mpsc::channel(slots);
    (Producer { tx, rendezvous }, Consumer { rx })
}

impl<T> Producer<T> {
    /// Hand an item to the consumer, suspending while the channel is full.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the consumer is gone, which only
    /// happens when the load it belonged to was abandoned.
    pub async fn send(&self, item: T) -> Result<(), Error> {
        if !self.rendezvous {
            return self
                .tx
                .send(Envelope { item, ack: None })
                .await
                .map_err(|_| Error::Cancelled);
        }

        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                item,
                ack: Some(ack_tx),
            })
            .await
            .map_err(|_| Error::Cancelled)?;
        ack_rx.await.map_err(|_| Error::Cancelled)
    }
}

impl<T> Consumer<T> {
    /// Receive the next item; `None` once every producer is gone and the
    /// buffer is drained.
    pub async fn recv(&mut self) -> Option<T> {
        let envelope = self.rx.recv().await?;
        if let Some(ack) = envelope.ack {
            // The producer may have been cancelled while waiting; nothing to do then.
            let _ = ack.send(());
        }
        Some(envelope.item)
    }

    /// Receive exactly `expected` items, calling `f(index, item)` for each.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] if all producers go away before
    /// `expected` items arrived, or the first error returned by `f`.
    pub async fn recv_exact<F, Fut>(&mut self, expected: usize, mut f: F) -> Result<(), Error>
    where
        F: FnMut(usize, T) -> Fut,
        Fut: Future<Output = Result<(), Error>>,
    {
        for received in 0..expected {
            let item = self
                .recv()
                .await
                .ok_or(Error::ChannelClosed { received, expected })?;
            f(received, item).await?;
        }
        Ok(())
    }
}
