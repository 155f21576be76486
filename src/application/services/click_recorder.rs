//! Fire-and-dispatch click recording.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::warn;

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::NewClick;
use crate::utils::geo::GeoLookup;

/// Classifies resolved requests and hands them to the click worker.
///
/// [`ClickRecorder::record`] never waits: when the queue is full or the
/// worker has stopped, the click is dropped and counted in
/// `clicks_dropped_total`.
#[derive(Clone)]
pub struct ClickRecorder {
    tx: mpsc::Sender<NewClick>,
    geo: Arc<dyn GeoLookup>,
}

impl ClickRecorder {
    pub fn new(tx: mpsc::Sender<NewClick>, geo: Arc<dyn GeoLookup>) -> Self {
        Self { tx, geo }
    }

    /// Creates a recorder with a bounded queue of `capacity` clicks.
    ///
    /// The receiver is meant for [`crate::domain::click_worker::run_click_worker`].
    pub fn channel(capacity: usize, geo: Arc<dyn GeoLookup>) -> (Self, mpsc::Receiver<NewClick>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx, geo), rx)
    }

    /// Classifies `event` and queues it. Returns `false` if the click was dropped.
    pub fn record(&self, event: ClickEvent) -> bool {
        let click = event.classify(self.geo.as_ref());

        match self.tx.try_send(click) {
            Ok(()) => true,
            Err(TrySendError::Full(click)) => {
                warn!(code = %click.code, "Click queue full, dropping click");
                metrics::counter!("clicks_dropped_total", "reason" => "queue_full").increment(1);
                false
            }
            Err(TrySendError::Closed(click)) => {
                warn!(code = %click.code, "Click worker stopped, dropping click");
                metrics::counter!("clicks_dropped_total", "reason" => "closed").increment(1);
                false
            }
        }
    }

    /// Clicks waiting in the queue.
    pub fn queue_depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn queue_capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Returns false once the worker has stopped receiving.
    pub fn is_accepting(&self) -> bool {
        !self.tx.is_closed()
    }
}
