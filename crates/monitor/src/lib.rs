//! Periodic consumer-group lag monitoring.
//!
//! A [`LagMonitor`] owns one administrative connection to a broker cluster
//! and reconciles three views of a single consumer group on a fixed cadence:
//! the group description, the group's committed offsets, and the end offsets
//! of every topic either of those mentions. The result is one lag gauge per
//! topic.
//!
//! Ticks are strictly sequential and never overlap. Failures are soft: when
//! any read in a tick fails, the tick is logged and abandoned, previously
//! published gauges keep their last good value, and the next tick starts
//! fresh. Operators can tell a frozen gauge from a healthy one through the
//! tick outcome counter. Cancellation is cooperative and observed between
//! ticks, never mid-read.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod config;
mod error;
mod metrics;

use std::sync::Arc;

use lagwatch_admin::lag::{lag_by_topic, probe_topics};
use lagwatch_admin::{GroupAdmin, GroupId};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

pub use config::MonitorConfig;
pub use error::Error;
pub use metrics::LagMetrics;

/// Watches one consumer group and publishes its per-topic lag.
pub struct LagMonitor<A>
where
    A: GroupAdmin,
{
    admin: Arc<Mutex<Option<A>>>,
    group: GroupId,
    metrics: LagMetrics,
    config: MonitorConfig,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

impl<A> LagMonitor<A>
where
    A: GroupAdmin,
{
    /// Creates a monitor over an established admin connection.
    ///
    /// Nothing happens until [`start`](Self::start).
    #[must_use]
    pub fn new(admin: A, group: GroupId, metrics: LagMetrics, config: MonitorConfig) -> Self {
        Self {
            admin: Arc::new(Mutex::new(Some(admin))),
            group,
            metrics,
            config,
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Verifies the cluster is reachable, then hands the connection to a
    /// background task that reconciles lag once per tick.
    ///
    /// On a failed liveness check the connection is closed and no background
    /// work starts. After a successful start the loop runs until
    /// [`shutdown`](Self::shutdown).
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] if start was already attempted and
    /// [`Error::Liveness`] if the cluster does not answer.
    pub async fn start(&self) -> Result<(), Error<A::Error>> {
        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let Some(admin) = self.admin.lock().await.take() else {
            return Err(Error::AlreadyStarted);
        };

        if let Err(e) = admin.ping().await {
            admin.close().await;
            return Err(Error::Liveness(e));
        }

        info!("starting lag monitor for group {}", self.group);

        self.task_tracker.spawn(run_loop(
            admin,
            self.group.clone(),
            self.metrics.clone(),
            self.config.clone(),
            self.shutdown_token.clone(),
        ));
        self.task_tracker.close();

        Ok(())
    }

    /// Cancels the background loop and waits for it to release the
    /// connection.
    pub async fn shutdown(&self) {
        debug!("lag monitor for group {} shutting down", self.group);

        self.shutdown_token.cancel();
        // Closing here keeps shutdown from hanging when start was never
        // called. It is a no-op after a successful start.
        self.task_tracker.close();
        self.task_tracker.wait().await;
    }

    /// Waits for the background loop to exit without cancelling it.
    pub async fn wait(&self) {
        self.task_tracker.wait().await;
    }
}

async fn run_loop<A>(
    admin: A,
    group: GroupId,
    metrics: LagMetrics,
    config: MonitorConfig,
    shutdown_token: CancellationToken,
) where
    A: GroupAdmin,
{
    let mut ticker = tokio::time::interval_at(
        tokio::time::Instant::now() + config.poll_interval,
        config.poll_interval,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shutdown_token.cancelled() => {
                info!("stopping consumer lag collection for group {}", group);
                break;
            }
            _ = ticker.tick() => {
                match reconcile(&admin, &group, &metrics).await {
                    Ok(()) => metrics.tick_succeeded(),
                    Err(e) => {
                        error!("lag reconciliation for group {} failed: {}", group, e);
                        metrics.tick_failed();
                    }
                }
            }
        }
    }

    admin.close().await;
}

async fn reconcile<A>(admin: &A, group: &GroupId, metrics: &LagMetrics) -> Result<(), A::Error>
where
    A: GroupAdmin,
{
    let description = admin.describe_group(group).await?;
    let committed = admin.committed_offsets(group).await?;

    let topics: Vec<String> = probe_topics(&description, &committed)
        .into_iter()
        .collect();
    let ends = admin.end_offsets(&topics).await?;

    for (topic, lag) in lag_by_topic(&description, &committed, &ends) {
        debug!("consumer group lag topic={} lag={}", topic, lag);
        metrics.set_topic_lag(&topic, lag);
    }

    Ok(())
}
