//! Periodic metrics polling.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::MissedTickBehavior,
};

use crate::event::AppEvent;

use super::source::MetricsSource;

/// Start/stop handle over a recurring poll
pub trait PollControl {
    /// Start polling: poll immediately, then on every interval. No-op if running.
    fn start(&mut self);

    /// Stop polling. No poll result of the stopped run is accepted afterwards.
    fn stop(&mut self);

    fn is_running(&self) -> bool;

    /// Whether a result tagged with `generation` belongs to the current run
    fn is_current(&self, generation: u64) -> bool;
}

/// Polls a [`MetricsSource`] on a fixed interval while started.
///
/// Results are posted to the event loop as [`AppEvent::MetricsPolled`], tagged
/// with the generation of the run that produced them. Each start begins a new
/// generation.
pub struct MetricsPoller {
    source: Arc<dyn MetricsSource>,
    interval: Duration,
    events: mpsc::UnboundedSender<AppEvent>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl MetricsPoller {
    pub fn new(
        source: Arc<dyn MetricsSource>,
        interval: Duration,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            source,
            interval,
            events,
            generation: 0,
            task: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl PollControl for MetricsPoller {
    fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            interval_ms = self.interval.as_millis() as u64,
            "Starting metrics poller"
        );
        self.task = Some(tokio::spawn(poll_loop(
            self.source.clone(),
            self.interval,
            self.events.clone(),
            self.generation,
        )));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!(generation = self.generation, "Stopping metrics poller");
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.is_some()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }
}

impl Drop for MetricsPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    source: Arc<dyn MetricsSource>,
    interval: Duration,
    events: mpsc::UnboundedSender<AppEvent>,
    generation: u64,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // The first tick completes immediately
        ticker.tick().await;

        let result = source.fetch().await;
        if let Err(e) = &result {
            tracing::warn!("Metrics poll failed: {}", e);
        }

        if events
            .send(AppEvent::MetricsPolled { generation, result })
            .is_err()
        {
            tracing::debug!("Event loop has stopped; ending metrics poller");
            break;
        }
    }
}
