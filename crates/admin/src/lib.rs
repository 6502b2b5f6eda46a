//! Abstract interface for read-only consumer-group administration.
//!
//! A [`GroupAdmin`] exposes the three broker-side views a lag monitor needs
//! to reconcile on every tick: the group description, the group's committed
//! offsets, and topic end offsets. Implementations own whatever connection
//! they need and release it in [`close`](GroupAdmin::close).
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod lag;
mod types;

use std::error::Error;

use async_trait::async_trait;

pub use types::{
    CommittedOffsets, EndOffsets, GroupDescription, GroupId, GroupMember, GroupState,
    TopicPartition,
};

/// Marker trait for group-admin errors.
pub trait GroupAdminError: Error + Send + Sync + 'static {}

/// Read-only administrative view of consumer groups on a broker cluster.
///
/// Every operation is a single request-response against the cluster; none of
/// them retry. Callers decide how to react to failures.
#[async_trait]
pub trait GroupAdmin
where
    Self: Send + Sync + 'static,
{
    /// The error type for this implementation.
    type Error: GroupAdminError;

    /// Fetches the group's state, members, and member assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the broker cannot be reached or does not know the
    /// group.
    async fn describe_group(&self, group: &GroupId) -> Result<GroupDescription, Self::Error>;

    /// Fetches every offset the group has committed, including offsets on
    /// topics no member is currently assigned.
    ///
    /// # Errors
    ///
    /// Returns an error if the offsets cannot be fetched.
    async fn committed_offsets(&self, group: &GroupId) -> Result<CommittedOffsets, Self::Error>;

    /// Fetches the end offset of every partition of the named topics.
    ///
    /// Unknown topics yield no entries rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the broker cannot be reached.
    async fn end_offsets(&self, topics: &[String]) -> Result<EndOffsets, Self::Error>;

    /// Verifies the cluster is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster does not answer within the
    /// implementation's request timeout.
    async fn ping(&self) -> Result<(), Self::Error>;

    /// Releases the underlying connection.
    ///
    /// Further calls on the admin after closing are implementation-defined.
    async fn close(&self);
}
