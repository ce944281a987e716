//! Background shape producer.
//!
//! A one-worker tokio runtime runs an async task that keeps a bounded
//! channel topped up with shapes from its own [`BagRandomizer`]. The engine
//! reads the other end through [`FeedReceiver`], which blocks only when the
//! producer falls behind.
//!
//! Shutting the feed down (or dropping it) cancels the producer. Shapes
//! already buffered can still be taken; after that the receiver reports
//! the channel closed and [`ShapeQueue`](crate::core::ShapeQueue) falls
//! back to random shapes.

use anyhow::Result;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc;

use crate::core::{log_event, BagRandomizer, ShapeSource};
use crate::types::Shape;

/// Running producer. Keep it alive for as long as shapes are needed.
pub struct ShapeFeed {
    rt: Option<Runtime>,
    capacity: usize,
}

/// Engine side of the shape channel.
#[derive(Debug)]
pub struct FeedReceiver {
    rx: mpsc::Receiver<Shape>,
}

impl ShapeFeed {
    /// Start a producer seeded from the operating system.
    pub fn spawn(capacity: usize) -> Result<(Self, FeedReceiver)> {
        Self::spawn_with(BagRandomizer::from_entropy(), capacity)
    }

    /// Start a producer drawing from `bag`.
    pub fn spawn_with(bag: BagRandomizer, capacity: usize) -> Result<(Self, FeedReceiver)> {
        let capacity = capacity.max(1);
        let rt = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("shape-generator")
            .enable_all()
            .build()?;

        let (tx, rx) = mpsc::channel::<Shape>(capacity);
        rt.spawn(produce(bag, tx));

        Ok((
            Self {
                rt: Some(rt),
                capacity,
            },
            FeedReceiver { rx },
        ))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cancel the producer without waiting for it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(rt) = self.rt.take() {
            rt.shutdown_background();
        }
    }
}

impl Drop for ShapeFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn produce(mut bag: BagRandomizer, tx: mpsc::Sender<Shape>) {
    while tx.send(bag.next_shape()).await.is_ok() {}
    log_event!("ShapeFeed", "receiver dropped; producer stopped");
}

impl ShapeSource for FeedReceiver {
    fn take(&mut self) -> Option<Shape> {
        self.rx.blocking_recv()
    }
}
