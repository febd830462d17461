use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::kafka_types::TopicPartition;

/// End offsets of the monitored Topic Partitions, captured in a single polling round.
///
/// Exactly one snapshot is "current" at any time: the previous one is retained
/// by the monitoring loop only long enough to compute one delta, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OffsetSnapshot {
    offsets: HashMap<TopicPartition, u64>,

    /// [`DateTime<Utc>`] when this information was read from the Cluster
    read_datetime: DateTime<Utc>,
}

impl OffsetSnapshot {
    pub fn new(offsets: HashMap<TopicPartition, u64>) -> Self {
        Self {
            offsets,
            read_datetime: Utc::now(),
        }
    }

    /// End offset of the given Partition, or `None` if it was not part of this polling round.
    pub fn end_offset(&self, tp: &TopicPartition) -> Option<u64> {
        self.offsets.get(tp).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TopicPartition, u64)> {
        self.offsets.iter().map(|(tp, offset)| (tp, *offset))
    }

    #[allow(unused)]
    pub fn partition_count(&self) -> usize {
        self.offsets.len()
    }

    #[allow(unused)]
    pub fn read_datetime(&self) -> DateTime<Utc> {
        self.read_datetime
    }
}
