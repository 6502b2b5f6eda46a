//! Kafka-backed implementation of the group-admin interface.
//!
//! librdkafka's metadata and offset calls block, so every operation runs the
//! underlying client on a blocking task and the shared handle never blocks
//! the async runtime.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod assignment;
mod error;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lagwatch_admin::{
    CommittedOffsets, EndOffsets, GroupAdmin, GroupDescription, GroupId, GroupMember, GroupState,
    TopicPartition,
};
use rdkafka::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::{Offset, TopicPartitionList};
use tracing::debug;

pub use error::Error;

/// Options for connecting a [`KafkaGroupAdmin`].
#[derive(Clone, Debug)]
pub struct KafkaAdminOptions {
    /// Seed brokers for bootstrapping the connection.
    pub brokers: Vec<String>,

    /// Consumer group whose committed offsets this connection can read.
    pub group: GroupId,

    /// Timeout applied to each broker request.
    pub request_timeout: Duration,
}

impl KafkaAdminOptions {
    /// Creates options with a five second request timeout.
    #[must_use]
    pub fn new(brokers: Vec<String>, group: GroupId) -> Self {
        Self {
            brokers,
            group,
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Read-only administrative view of consumer groups on a Kafka cluster.
///
/// Committed offsets can only be read for the group named in the options,
/// since the broker scopes offset fetches to the connection's own group.
/// Describe and end-offset reads are not scoped.
pub struct KafkaGroupAdmin {
    consumer: Arc<BaseConsumer>,
    group: GroupId,
    request_timeout: Duration,
}

impl KafkaGroupAdmin {
    /// Builds the underlying client.
    ///
    /// Construction does not touch the network. Reachability is only checked
    /// by [`GroupAdmin::ping`].
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created from the options.
    pub fn connect(options: &KafkaAdminOptions) -> Result<Self, Error> {
        let consumer: BaseConsumer = ClientConfig::new()
            .set("bootstrap.servers", options.brokers.join(","))
            .set("group.id", options.group.as_str())
            .set("enable.auto.commit", "false")
            .create()?;

        Ok(Self {
            consumer: Arc::new(consumer),
            group: options.group.clone(),
            request_timeout: options.request_timeout,
        })
    }

    async fn with_consumer<T, F>(&self, op: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&BaseConsumer, Duration) -> Result<T, Error> + Send + 'static,
    {
        let consumer = Arc::clone(&self.consumer);
        let timeout = self.request_timeout;
        tokio::task::spawn_blocking(move || op(&consumer, timeout)).await?
    }
}

#[async_trait]
impl GroupAdmin for KafkaGroupAdmin {
    type Error = Error;

    async fn describe_group(&self, group: &GroupId) -> Result<GroupDescription, Self::Error> {
        let group = group.clone();
        self.with_consumer(move |consumer, timeout| {
            let groups = consumer.fetch_group_list(Some(group.as_str()), timeout)?;
            let info = groups
                .groups()
                .iter()
                .find(|info| info.name() == group.as_str())
                .ok_or_else(|| Error::GroupNotFound(group.to_string()))?;

            let decode_assignments = info.protocol_type() == "consumer";
            let mut members = Vec::with_capacity(info.members().len());
            for member in info.members() {
                let assigned = if decode_assignments {
                    assignment::decode_member_assignment(member.assignment().unwrap_or_default())
                        .map_err(|reason| Error::Assignment {
                            member_id: member.id().to_string(),
                            reason,
                        })?
                } else {
                    Vec::new()
                };

                members.push(GroupMember {
                    member_id: member.id().to_string(),
                    client_id: member.client_id().to_string(),
                    client_host: member.client_host().to_string(),
                    assigned,
                });
            }

            Ok(GroupDescription {
                group: group.clone(),
                state: GroupState::from(info.state()),
                members,
            })
        })
        .await
    }

    async fn committed_offsets(&self, group: &GroupId) -> Result<CommittedOffsets, Self::Error> {
        if group != &self.group {
            return Err(Error::WrongGroup {
                scoped: self.group.to_string(),
                requested: group.to_string(),
            });
        }

        self.with_consumer(|consumer, timeout| {
            // Probe every partition in the cluster so commits on topics the
            // group is no longer assigned still show up.
            let metadata = consumer.fetch_metadata(None, timeout)?;
            let mut probe = TopicPartitionList::new();
            for topic in metadata.topics() {
                for partition in topic.partitions() {
                    probe.add_partition(topic.name(), partition.id());
                }
            }

            let committed = consumer.committed_offsets(probe, timeout)?;
            let mut offsets = CommittedOffsets::new();
            for elem in committed.elements() {
                if let Offset::Offset(offset) = elem.offset() {
                    offsets.insert(TopicPartition::new(elem.topic(), elem.partition()), offset);
                }
            }
            Ok(offsets)
        })
        .await
    }

    async fn end_offsets(&self, topics: &[String]) -> Result<EndOffsets, Self::Error> {
        let topics = topics.to_vec();
        self.with_consumer(move |consumer, timeout| {
            let mut ends = EndOffsets::new();
            for topic in &topics {
                let metadata = consumer.fetch_metadata(Some(topic), timeout)?;
                for topic_metadata in metadata.topics() {
                    for partition in topic_metadata.partitions() {
                        let (_, high) = consumer.fetch_watermarks(
                            topic_metadata.name(),
                            partition.id(),
                            timeout,
                        )?;
                        ends.insert(
                            TopicPartition::new(topic_metadata.name(), partition.id()),
                            high,
                        );
                    }
                }
            }
            Ok(ends)
        })
        .await
    }

    async fn ping(&self) -> Result<(), Self::Error> {
        self.with_consumer(|consumer, timeout| {
            consumer.fetch_metadata(None, timeout)?;
            Ok(())
        })
        .await
    }

    async fn close(&self) {
        // BaseConsumer tears down on drop; nothing to flush here.
        debug!("releasing kafka admin client for group {}", self.group);
    }
}
