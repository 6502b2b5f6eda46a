//! Error types for the Kafka-backed group admin.

use lagwatch_admin::GroupAdminError;
use thiserror::Error;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Client construction or a broker request failed.
    #[error("kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// The broker does not know the group.
    #[error("consumer group not found: {0}")]
    GroupNotFound(String),

    /// This connection is scoped to a different group's offsets.
    #[error("connection is scoped to group {scoped}, not {requested}")]
    WrongGroup {
        /// Group the connection was established for.
        scoped: String,
        /// Group the caller asked about.
        requested: String,
    },

    /// A member's assignment blob could not be decoded.
    #[error("malformed assignment for member {member_id}: {reason}")]
    Assignment {
        /// Member whose assignment failed to decode.
        member_id: String,
        /// What was wrong with the blob.
        reason: &'static str,
    },

    /// The blocking broker call could not be joined.
    #[error("admin task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl GroupAdminError for Error {}
