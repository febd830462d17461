use std::collections::HashMap;
use std::time::Duration;

use rdkafka::{admin::AdminClient, client::DefaultClientContext, ClientConfig};

use super::errors::{OffsetsError, OffsetsResult};
use super::snapshot::OffsetSnapshot;
use crate::kafka_types::TopicPartition;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can produce the current end offsets of a fixed set of Partitions.
///
/// This is the seam between the monitoring loop and the Kafka Cluster:
/// the loop only ever sees [`OffsetSnapshot`]s coming out of this.
pub trait EndOffsetSource {
    /// Fetch the current end offset of every given Partition, as one [`OffsetSnapshot`].
    fn end_offsets(&self, partitions: &[TopicPartition]) -> OffsetsResult<OffsetSnapshot>;
}

/// Polls a Kafka Cluster for Topic Partitions end offsets (i.e. high watermarks).
///
/// It wraps an Admin Kafka Client: [`Self::discover_partitions`] resolves the
/// monitored Partition set once at startup, and [`EndOffsetSource::end_offsets`]
/// is then called once per tick by the monitoring loop.
pub struct OffsetPoller {
    admin_client: AdminClient<DefaultClientContext>,
}

impl OffsetPoller {
    /// Create a new [`OffsetPoller`].
    ///
    /// # Arguments
    ///
    /// * `client_config` - Kafka admin client configuration, used to fetch Metadata and watermarks
    pub fn new(client_config: ClientConfig) -> OffsetsResult<Self> {
        let admin_client = client_config.create().map_err(OffsetsError::ClientCreation)?;

        Ok(Self {
            admin_client,
        })
    }

    /// Resolve the Partitions of the given Topic, by querying the Cluster Metadata.
    ///
    /// The result is sorted by Partition id, so logging is stable.
    ///
    /// # Arguments
    ///
    /// * `topic` - Topic we want to know the Partitions of
    pub fn discover_partitions(&self, topic: &str) -> OffsetsResult<Vec<TopicPartition>> {
        let metadata = self
            .admin_client
            .inner()
            .fetch_metadata(Some(topic), FETCH_TIMEOUT)
            .map_err(|e| OffsetsError::MetadataFetch {
                topic: topic.to_string(),
                source: e,
            })?;

        let mut partitions: Vec<TopicPartition> = metadata
            .topics()
            .iter()
            .filter(|mt| mt.name() == topic)
            .flat_map(|mt| {
                mt.partitions()
                    .iter()
                    .map(|mp| TopicPartition::new(topic.to_string(), mp.id() as u32))
            })
            .collect();

        // A Metadata response can name the Topic while carrying no Partitions
        // (e.g. unknown Topic): either way there is nothing to monitor.
        if partitions.is_empty() {
            return Err(OffsetsError::TopicNotFound(topic.to_string()));
        }

        partitions.sort();
        Ok(partitions)
    }
}

impl EndOffsetSource for OffsetPoller {
    /// Fetch the end offset of each Partition, in a single polling round.
    ///
    /// Partitions are queried back-to-back within the round, so the resulting
    /// [`OffsetSnapshot`] represents one instant as closely as the underlying
    /// transport allows.
    fn end_offsets(&self, partitions: &[TopicPartition]) -> OffsetsResult<OffsetSnapshot> {
        let mut offsets = HashMap::with_capacity(partitions.len());

        for tp in partitions {
            trace!("Fetching end offset of Partition '{tp}'");

            let (_, latest) = self
                .admin_client
                .inner()
                .fetch_watermarks(&tp.topic, tp.partition as i32, FETCH_TIMEOUT)
                .map_err(|e| OffsetsError::WatermarkFetch {
                    topic: tp.topic.clone(),
                    partition: tp.partition,
                    source: e,
                })?;

            offsets.insert(tp.clone(), latest as u64);
        }

        Ok(OffsetSnapshot::new(offsets))
    }
}
