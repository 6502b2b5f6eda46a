//! Domain types shared by every group-admin implementation.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a consumer group.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for GroupId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A topic-partition pair, ordered so collections over it iterate
/// deterministically by topic then partition.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct TopicPartition {
    /// Topic name.
    pub topic: String,

    /// Partition index within the topic.
    pub partition: i32,
}

impl TopicPartition {
    /// Creates a new topic-partition pair.
    #[must_use]
    pub fn new(topic: impl Into<String>, partition: i32) -> Self {
        Self {
            topic: topic.into(),
            partition,
        }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.topic, self.partition)
    }
}

/// Broker-reported state of a consumer group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum GroupState {
    /// The group exists but has no members.
    #[default]
    Empty,

    /// Members are rejoining after a membership change.
    PreparingRebalance,

    /// The group leader is computing new assignments.
    CompletingRebalance,

    /// All members have received their assignments.
    Stable,

    /// The group has been deleted or its offsets have expired.
    Dead,

    /// A state string this crate does not recognize.
    Unknown(String),
}

impl From<&str> for GroupState {
    fn from(state: &str) -> Self {
        match state {
            "Empty" => Self::Empty,
            "PreparingRebalance" => Self::PreparingRebalance,
            "CompletingRebalance" => Self::CompletingRebalance,
            "Stable" => Self::Stable,
            "Dead" => Self::Dead,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::PreparingRebalance => f.write_str("PreparingRebalance"),
            Self::CompletingRebalance => f.write_str("CompletingRebalance"),
            Self::Stable => f.write_str("Stable"),
            Self::Dead => f.write_str("Dead"),
            Self::Unknown(other) => f.write_str(other),
        }
    }
}

/// One member of a consumer group and its current partition assignment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Broker-assigned member identifier.
    pub member_id: String,

    /// Client-supplied identifier.
    pub client_id: String,

    /// Host the member connected from.
    pub client_host: String,

    /// Partitions currently assigned to this member.
    pub assigned: Vec<TopicPartition>,
}

/// Point-in-time snapshot of a consumer group as the broker describes it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupDescription {
    /// The group this snapshot describes.
    pub group: GroupId,

    /// Group state at snapshot time.
    pub state: GroupState,

    /// Current members with their assignments.
    pub members: Vec<GroupMember>,
}

impl GroupDescription {
    /// Topics with at least one partition assigned to a member.
    #[must_use]
    pub fn assigned_topics(&self) -> BTreeSet<String> {
        self.members
            .iter()
            .flat_map(|member| member.assigned.iter())
            .map(|tp| tp.topic.clone())
            .collect()
    }

    /// Every partition assigned across all members.
    #[must_use]
    pub fn assigned_partitions(&self) -> BTreeSet<TopicPartition> {
        self.members
            .iter()
            .flat_map(|member| member.assigned.iter())
            .cloned()
            .collect()
    }
}

/// Last committed offset per partition for one consumer group.
///
/// Partitions the group has never committed for are absent.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct CommittedOffsets(BTreeMap<TopicPartition, i64>);

impl CommittedOffsets {
    /// Creates an empty set of committed offsets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the committed offset for a partition.
    pub fn insert(&mut self, tp: TopicPartition, offset: i64) {
        self.0.insert(tp, offset);
    }

    /// The committed offset for a partition, if the group has one.
    #[must_use]
    pub fn get(&self, tp: &TopicPartition) -> Option<i64> {
        self.0.get(tp).copied()
    }

    /// Topics with at least one committed offset.
    #[must_use]
    pub fn topics(&self) -> BTreeSet<String> {
        self.0.keys().map(|tp| tp.topic.clone()).collect()
    }

    /// Iterates over partitions and their committed offsets in topic order.
    pub fn iter(&self) -> impl Iterator<Item = (&TopicPartition, i64)> {
        self.0.iter().map(|(tp, offset)| (tp, *offset))
    }

    /// Number of partitions with a committed offset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no partition has a committed offset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(TopicPartition, i64)> for CommittedOffsets {
    fn from_iter<I: IntoIterator<Item = (TopicPartition, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Next offset to be produced per partition, per the broker's high
/// watermarks.
///
/// Partitions whose end offset could not be determined are absent.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct EndOffsets(BTreeMap<TopicPartition, i64>);

impl EndOffsets {
    /// Creates an empty set of end offsets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the end offset for a partition.
    pub fn insert(&mut self, tp: TopicPartition, offset: i64) {
        self.0.insert(tp, offset);
    }

    /// The end offset for a partition, if known.
    #[must_use]
    pub fn get(&self, tp: &TopicPartition) -> Option<i64> {
        self.0.get(tp).copied()
    }

    /// Topics with at least one known end offset.
    #[must_use]
    pub fn topics(&self) -> BTreeSet<String> {
        self.0.keys().map(|tp| tp.topic.clone()).collect()
    }

    /// Iterates over partitions and their end offsets in topic order.
    pub fn iter(&self) -> impl Iterator<Item = (&TopicPartition, i64)> {
        self.0.iter().map(|(tp, offset)| (tp, *offset))
    }

    /// Number of partitions with a known end offset.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no partition has a known end offset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(TopicPartition, i64)> for EndOffsets {
    fn from_iter<I: IntoIterator<Item = (TopicPartition, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(assigned: Vec<TopicPartition>) -> GroupMember {
        GroupMember {
            member_id: "member-1".to_string(),
            client_id: "client-1".to_string(),
            client_host: "/10.0.0.1".to_string(),
            assigned,
        }
    }

    #[test]
    fn test_assigned_topics_deduplicate_across_members() {
        let description = GroupDescription {
            group: GroupId::from("workers"),
            state: GroupState::Stable,
            members: vec![
                member(vec![
                    TopicPartition::new("orders", 0),
                    TopicPartition::new("orders", 1),
                ]),
                member(vec![
                    TopicPartition::new("orders", 2),
                    TopicPartition::new("payments", 0),
                ]),
            ],
        };

        let topics: Vec<_> = description.assigned_topics().into_iter().collect();
        assert_eq!(topics, vec!["orders".to_string(), "payments".to_string()]);
        assert_eq!(description.assigned_partitions().len(), 4);
    }

    #[test]
    fn test_group_state_round_trips_known_names() {
        for name in [
            "Empty",
            "PreparingRebalance",
            "CompletingRebalance",
            "Stable",
            "Dead",
        ] {
            assert_eq!(GroupState::from(name).to_string(), name);
        }
    }

    #[test]
    fn test_group_state_preserves_unrecognized_names() {
        let state = GroupState::from("Fenced");
        assert_eq!(state, GroupState::Unknown("Fenced".to_string()));
        assert_eq!(state.to_string(), "Fenced");
    }

    #[test]
    fn test_committed_offsets_track_topics() {
        let mut committed = CommittedOffsets::new();
        committed.insert(TopicPartition::new("orders", 0), 5);
        committed.insert(TopicPartition::new("orders", 1), 7);
        committed.insert(TopicPartition::new("audit", 0), 2);

        let topics: Vec<_> = committed.topics().into_iter().collect();
        assert_eq!(topics, vec!["audit".to_string(), "orders".to_string()]);
        assert_eq!(committed.get(&TopicPartition::new("orders", 1)), Some(7));
        assert_eq!(committed.get(&TopicPartition::new("orders", 2)), None);
        assert_eq!(committed.len(), 3);
    }

    #[test]
    fn test_topic_partition_orders_by_topic_then_partition() {
        let mut parts = vec![
            TopicPartition::new("b", 0),
            TopicPartition::new("a", 2),
            TopicPartition::new("a", 0),
        ];
        parts.sort();
        assert_eq!(
            parts,
            vec![
                TopicPartition::new("a", 0),
                TopicPartition::new("a", 2),
                TopicPartition::new("b", 0),
            ]
        );
        assert_eq!(parts[0].to_string(), "a[0]");
    }
}
