//! Mock implementation of the group-admin interface.
//!
//! Backed by scriptable in-memory state with one-shot failure injection per
//! operation. Used for testing.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lagwatch_admin::{
    CommittedOffsets, EndOffsets, GroupAdmin, GroupDescription, GroupId, GroupMember, GroupState,
    TopicPartition,
};
use tokio::sync::Mutex;

pub use error::Error;

#[derive(Debug, Default)]
struct MockState {
    state: GroupState,
    members: Vec<GroupMember>,
    committed: CommittedOffsets,
    ends: EndOffsets,
    describe_delay: Option<Duration>,
    fail_describes: usize,
    fail_committed_fetches: usize,
    fail_end_offset_fetches: usize,
    fail_pings: usize,
    describe_calls: usize,
    ping_calls: usize,
    end_offset_queries: Vec<Vec<String>>,
    closed: bool,
}

/// Mock implementation of [`GroupAdmin`] with scriptable group state.
///
/// Clones share state, so a test can keep one handle for scripting and
/// observation while another is owned by the code under test.
#[derive(Clone, Debug, Default)]
pub struct MockGroupAdmin {
    state: Arc<Mutex<MockState>>,
}

impl MockGroupAdmin {
    /// Creates a new mock with an empty, stable group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns partitions of a topic to a new synthetic member.
    pub async fn assign(
        &self,
        topic: impl Into<String>,
        partitions: impl IntoIterator<Item = i32>,
    ) {
        let topic = topic.into();
        let mut state = self.state.lock().await;
        let ordinal = state.members.len();
        state.members.push(GroupMember {
            member_id: format!("member-{ordinal}"),
            client_id: format!("client-{ordinal}"),
            client_host: "/127.0.0.1".to_string(),
            assigned: partitions
                .into_iter()
                .map(|partition| TopicPartition::new(topic.clone(), partition))
                .collect(),
        });
        state.state = GroupState::Stable;
    }

    /// Records a committed offset for the group.
    pub async fn commit(&self, topic: impl Into<String>, partition: i32, offset: i64) {
        let mut state = self.state.lock().await;
        state
            .committed
            .insert(TopicPartition::new(topic, partition), offset);
    }

    /// Sets the end offset reported for a partition.
    pub async fn set_end_offset(&self, topic: impl Into<String>, partition: i32, offset: i64) {
        let mut state = self.state.lock().await;
        state.ends.insert(TopicPartition::new(topic, partition), offset);
    }

    /// Overrides the reported group state.
    pub async fn set_state(&self, group_state: GroupState) {
        self.state.lock().await.state = group_state;
    }

    /// Makes every describe call sleep before answering.
    pub async fn set_describe_delay(&self, delay: Duration) {
        self.state.lock().await.describe_delay = Some(delay);
    }

    /// Fails the next `count` describe calls.
    pub async fn fail_describes(&self, count: usize) {
        self.state.lock().await.fail_describes = count;
    }

    /// Fails the next `count` committed-offset fetches.
    pub async fn fail_committed_fetches(&self, count: usize) {
        self.state.lock().await.fail_committed_fetches = count;
    }

    /// Fails the next `count` end-offset fetches.
    pub async fn fail_end_offset_fetches(&self, count: usize) {
        self.state.lock().await.fail_end_offset_fetches = count;
    }

    /// Fails the next `count` pings.
    pub async fn fail_pings(&self, count: usize) {
        self.state.lock().await.fail_pings = count;
    }

    /// Number of describe calls made so far, including failed ones.
    pub async fn describe_calls(&self) -> usize {
        self.state.lock().await.describe_calls
    }

    /// Number of pings made so far, including failed ones.
    pub async fn ping_calls(&self) -> usize {
        self.state.lock().await.ping_calls
    }

    /// Topic lists passed to end-offset fetches, in call order.
    pub async fn end_offset_queries(&self) -> Vec<Vec<String>> {
        self.state.lock().await.end_offset_queries.clone()
    }

    /// Whether [`GroupAdmin::close`] has been called.
    pub async fn closed(&self) -> bool {
        self.state.lock().await.closed
    }
}

#[async_trait]
impl GroupAdmin for MockGroupAdmin {
    type Error = Error;

    async fn describe_group(&self, group: &GroupId) -> Result<GroupDescription, Self::Error> {
        let delay = {
            let mut state = self.state.lock().await;
            state.describe_calls += 1;
            if state.fail_describes > 0 {
                state.fail_describes -= 1;
                return Err(Error::Injected("describe"));
            }
            state.describe_delay
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().await;
        Ok(GroupDescription {
            group: group.clone(),
            state: state.state.clone(),
            members: state.members.clone(),
        })
    }

    async fn committed_offsets(&self, _group: &GroupId) -> Result<CommittedOffsets, Self::Error> {
        let mut state = self.state.lock().await;
        if state.fail_committed_fetches > 0 {
            state.fail_committed_fetches -= 1;
            return Err(Error::Injected("committed-offsets"));
        }
        Ok(state.committed.clone())
    }

    async fn end_offsets(&self, topics: &[String]) -> Result<EndOffsets, Self::Error> {
        let mut state = self.state.lock().await;
        state.end_offset_queries.push(topics.to_vec());
        if state.fail_end_offset_fetches > 0 {
            state.fail_end_offset_fetches -= 1;
            return Err(Error::Injected("end-offsets"));
        }
        Ok(state
            .ends
            .iter()
            .filter(|(tp, _)| topics.contains(&tp.topic))
            .map(|(tp, offset)| (tp.clone(), offset))
            .collect())
    }

    async fn ping(&self) -> Result<(), Self::Error> {
        let mut state = self.state.lock().await;
        state.ping_calls += 1;
        if state.fail_pings > 0 {
            state.fail_pings -= 1;
            return Err(Error::Injected("ping"));
        }
        Ok(())
    }

    async fn close(&self) {
        self.state.lock().await.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_describes_scripted_assignments() {
        let mock = MockGroupAdmin::new();
        mock.assign("orders", [0, 1]).await;
        mock.assign("payments", [0]).await;

        let description = mock
            .describe_group(&GroupId::from("workers"))
            .await
            .unwrap();

        assert_eq!(description.group, GroupId::from("workers"));
        assert_eq!(description.state, GroupState::Stable);
        assert_eq!(description.members.len(), 2);
        assert_eq!(description.assigned_partitions().len(), 3);
        assert_eq!(mock.describe_calls().await, 1);
    }

    #[tokio::test]
    async fn test_state_override_survives_describe() {
        let mock = MockGroupAdmin::new();
        mock.assign("orders", [0]).await;
        mock.set_state(GroupState::PreparingRebalance).await;

        let description = mock
            .describe_group(&GroupId::from("workers"))
            .await
            .unwrap();

        assert_eq!(description.state, GroupState::PreparingRebalance);
        assert_eq!(description.members.len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failures_are_one_shot() {
        let mock = MockGroupAdmin::new();
        mock.fail_describes(2).await;

        let group = GroupId::from("workers");
        assert!(mock.describe_group(&group).await.is_err());
        assert!(mock.describe_group(&group).await.is_err());
        assert!(mock.describe_group(&group).await.is_ok());
        assert_eq!(mock.describe_calls().await, 3);
    }

    #[tokio::test]
    async fn test_end_offsets_only_cover_requested_topics() {
        let mock = MockGroupAdmin::new();
        mock.set_end_offset("orders", 0, 10).await;
        mock.set_end_offset("payments", 0, 7).await;

        let ends = mock.end_offsets(&["orders".to_string()]).await.unwrap();

        assert_eq!(ends.get(&TopicPartition::new("orders", 0)), Some(10));
        assert_eq!(ends.get(&TopicPartition::new("payments", 0)), None);
        assert_eq!(
            mock.end_offset_queries().await,
            vec![vec!["orders".to_string()]]
        );
    }

    #[tokio::test]
    async fn test_close_is_observable() {
        let mock = MockGroupAdmin::new();
        assert!(!mock.closed().await);
        mock.close().await;
        assert!(mock.closed().await);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mock = MockGroupAdmin::new();
        let observer = mock.clone();

        mock.commit("orders", 0, 42).await;
        let committed = observer
            .committed_offsets(&GroupId::from("workers"))
            .await
            .unwrap();

        assert_eq!(committed.get(&TopicPartition::new("orders", 0)), Some(42));
    }
}
