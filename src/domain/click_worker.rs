//! Background worker that applies queued clicks to the durable stores.
//!
//! Every click fans out into three independent effects: the link's durable
//! counter, the click-event log and the hot ranking. A failed effect is logged
//! and counted but never aborts the other two.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc, watch};
use tokio::task::{JoinError, JoinSet};
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, error, info, warn};

use crate::domain::entities::NewClick;
use crate::domain::repositories::{ClickLog, HotRanking, LinkStore};

const EFFECT_RETRY_DELAY_MS: u64 = 50;

/// Worker tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct WorkerOptions {
    /// Maximum number of clicks being applied at once.
    pub concurrency: usize,
    /// Extra attempts for the counter increment and event append.
    pub effect_retries: usize,
    /// How long shutdown waits for queued and in-flight clicks.
    pub shutdown_grace: Duration,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            effect_retries: 2,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Outcome of a worker run, reported once it stops.
///
/// Every click received from the queue ends up in exactly one of the two
/// counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Clicks whose effects ran to completion.
    pub applied: u64,
    /// Clicks abandoned at the end of the grace period, or lost to a panic.
    pub dropped: usize,
}

impl WorkerReport {
    fn settle(&mut self, result: Result<(), JoinError>) {
        match result {
            Ok(()) => self.applied += 1,
            Err(e) if e.is_cancelled() => self.dropped += 1,
            Err(e) => {
                error!(error = %e, "Click effect task panicked");
                metrics::counter!("click_effect_failures_total", "effect" => "task").increment(1);
                self.dropped += 1;
            }
        }
    }
}

/// The three side effects of a recorded click.
pub struct ClickEffects {
    links: Arc<dyn LinkStore>,
    clicks: Arc<dyn ClickLog>,
    ranking: Arc<dyn HotRanking>,
    retries: usize,
}

impl ClickEffects {
    pub fn new(
        links: Arc<dyn LinkStore>,
        clicks: Arc<dyn ClickLog>,
        ranking: Arc<dyn HotRanking>,
        retries: usize,
    ) -> Self {
        Self {
            links,
            clicks,
            ranking,
            retries,
        }
    }

    /// Runs all three effects concurrently and logs each failure on its own.
    pub async fn apply(&self, click: NewClick) {
        let code = click.code.as_str();

        let (counter, append, hot) = tokio::join!(
            Retry::spawn(self.retry_strategy(), || self.links.increment_counter(code)),
            Retry::spawn(self.retry_strategy(), || self.clicks.append(click.clone())),
            self.ranking.increment(code),
        );

        let mut failed = false;

        if let Err(e) = counter {
            failed = true;
            error!(code, error = %e, "Failed to increment click counter");
            metrics::counter!("click_effect_failures_total", "effect" => "counter").increment(1);
        }

        if let Err(e) = append {
            failed = true;
            error!(code, error = %e, "Failed to append click event");
            metrics::counter!("click_effect_failures_total", "effect" => "event").increment(1);
        }

        if let Err(e) = hot {
            failed = true;
            error!(code, error = %e, "Failed to increment hot score");
            metrics::counter!("click_effect_failures_total", "effect" => "ranking").increment(1);
        }

        if !failed {
            debug!(code, "Click recorded");
            metrics::counter!("clicks_recorded_total").increment(1);
        }
    }

    fn retry_strategy(&self) -> std::iter::Take<FixedInterval> {
        FixedInterval::from_millis(EFFECT_RETRY_DELAY_MS).take(self.retries)
    }
}

/// Drains `rx` until the queue closes or `shutdown` fires.
///
/// At most `options.concurrency` clicks are applied at once. On shutdown the
/// queue is closed, buffered clicks are still applied, and everything left
/// after `options.shutdown_grace` is aborted and reported as dropped.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<NewClick>,
    effects: Arc<ClickEffects>,
    options: WorkerOptions,
    mut shutdown: watch::Receiver<bool>,
) -> WorkerReport {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let mut in_flight = JoinSet::new();
    let mut report = WorkerReport::default();

    info!(
        concurrency = options.concurrency,
        retries = options.effect_retries,
        "Click worker started"
    );

    loop {
        while let Some(result) = in_flight.try_join_next() {
            report.settle(result);
        }

        let permit = tokio::select! {
            _ = shutdown.changed() => break,
            permit = semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let click = tokio::select! {
            _ = shutdown.changed() => break,
            click = rx.recv() => match click {
                Some(click) => click,
                None => break,
            },
        };

        let effects = effects.clone();
        in_flight.spawn(async move {
            effects.apply(click).await;
            drop(permit);
        });
    }

    rx.close();
    debug!(queued = rx.len(), in_flight = in_flight.len(), "Click worker draining");

    // The permit is taken before a click leaves the queue, so a click is
    // always either still queued or owned by `in_flight` when the grace
    // period cuts the drain short.
    let drain = async {
        loop {
            while let Some(result) = in_flight.try_join_next() {
                report.settle(result);
            }
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };
            let Some(click) = rx.recv().await else {
                break;
            };
            let effects = effects.clone();
            in_flight.spawn(async move {
                effects.apply(click).await;
                drop(permit);
            });
        }
        while let Some(result) = in_flight.join_next().await {
            report.settle(result);
        }
    };

    if tokio::time::timeout(options.shutdown_grace, drain).await.is_err() {
        let mut queued = 0;
        while rx.try_recv().is_ok() {
            queued += 1;
        }

        let settled = report.dropped;
        in_flight.abort_all();
        while let Some(result) = in_flight.join_next().await {
            report.settle(result);
        }
        let abandoned = queued + report.dropped - settled;
        report.dropped += queued;

        warn!(
            dropped = abandoned,
            grace_secs = options.shutdown_grace.as_secs_f64(),
            "Click worker grace period elapsed, dropping pending clicks"
        );
        metrics::counter!("clicks_dropped_total", "reason" => "shutdown")
            .increment(abandoned as u64);
    }

    info!(applied = report.applied, dropped = report.dropped, "Click worker stopped");
    report
}
