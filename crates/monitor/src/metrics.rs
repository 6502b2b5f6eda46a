//! Prometheus collectors published by the lag monitor.

use prometheus::{GaugeVec, IntCounterVec, Opts, Registry};

/// Handles to every collector this crate publishes.
///
/// Created once at startup against the embedder's registry. There are no
/// global metric singletons, so two monitors can coexist in one process as
/// long as they use separate registries.
#[derive(Clone)]
pub struct LagMetrics {
    topic_lag: GaugeVec,
    commit_records: IntCounterVec,
    poll_ticks: IntCounterVec,
}

impl LagMetrics {
    /// Creates the collectors and registers them with `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if a collector with the same name is already
    /// registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let topic_lag = GaugeVec::new(
            Opts::new("consumer_group_lag", "Consumer group lag per topic"),
            &["topic"],
        )?;
        registry.register(Box::new(topic_lag.clone()))?;

        let commit_records = IntCounterVec::new(
            Opts::new(
                "commit_records_total",
                "Total records committed by sink workers",
            ),
            &["worker", "status"],
        )?;
        registry.register(Box::new(commit_records.clone()))?;

        let poll_ticks = IntCounterVec::new(
            Opts::new("poll_ticks_total", "Total lag reconciliation ticks by outcome"),
            &["status"],
        )?;
        registry.register(Box::new(poll_ticks.clone()))?;

        Ok(Self {
            topic_lag,
            commit_records,
            poll_ticks,
        })
    }

    /// Publishes the lag for one topic, replacing any previous value.
    #[allow(clippy::cast_precision_loss)]
    pub fn set_topic_lag(&self, topic: &str, lag: u64) {
        self.topic_lag.with_label_values(&[topic]).set(lag as f64);
    }

    /// Counts records a sink worker committed, by outcome.
    pub fn record_commit(&self, worker: &str, status: &str, count: u64) {
        self.commit_records
            .with_label_values(&[worker, status])
            .inc_by(count);
    }

    pub(crate) fn tick_succeeded(&self) {
        self.poll_ticks.with_label_values(&["ok"]).inc();
    }

    pub(crate) fn tick_failed(&self) {
        self.poll_ticks.with_label_values(&["error"]).inc();
    }
}
