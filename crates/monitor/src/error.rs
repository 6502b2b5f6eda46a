//! Error types for the lag monitor.

use thiserror::Error;

/// Errors returned by [`LagMonitor`](crate::LagMonitor) lifecycle calls.
#[derive(Debug, Error)]
pub enum Error<E>
where
    E: std::error::Error + 'static,
{
    /// Start was already attempted on this monitor.
    #[error("already started")]
    AlreadyStarted,

    /// The initial liveness check against the cluster failed.
    #[error("liveness check failed")]
    Liveness(#[source] E),
}
