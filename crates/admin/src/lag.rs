//! Lag derivation over a group description and two offset snapshots.

use std::collections::{BTreeMap, BTreeSet};

use crate::{CommittedOffsets, EndOffsets, GroupDescription};

/// Topics whose end offsets must be probed for a full lag picture: the union
/// of currently assigned topics and topics with committed offsets.
///
/// A group can hold stale commits on topics it no longer consumes, and a
/// fresh assignment may exist before the first commit lands, so either source
/// alone under-reports.
#[must_use]
pub fn probe_topics(
    description: &GroupDescription,
    committed: &CommittedOffsets,
) -> BTreeSet<String> {
    let mut topics = description.assigned_topics();
    topics.extend(committed.topics());
    topics
}

/// Sums per-partition lag, end offset minus committed offset, into one value
/// per probed topic.
///
/// A partition with no committed offset contributes its full end offset. A
/// partition with no known end offset contributes nothing. A committed offset
/// ahead of the end offset clamps to zero rather than going negative. Every
/// probed topic appears in the result, so a fully caught-up topic reports an
/// explicit zero.
#[must_use]
pub fn lag_by_topic(
    description: &GroupDescription,
    committed: &CommittedOffsets,
    ends: &EndOffsets,
) -> BTreeMap<String, u64> {
    let mut lag: BTreeMap<String, u64> = probe_topics(description, committed)
        .into_iter()
        .map(|topic| (topic, 0))
        .collect();

    for (tp, end) in ends.iter() {
        let Some(total) = lag.get_mut(&tp.topic) else {
            continue;
        };

        #[allow(clippy::cast_sign_loss)]
        let behind = end.saturating_sub(committed.get(tp).unwrap_or(0)).max(0) as u64;
        *total += behind;
    }

    lag
}
