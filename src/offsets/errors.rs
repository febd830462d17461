use rdkafka::error::KafkaError;
use rdkafka::types::RDKafkaErrorCode;
use thiserror::Error;

/// Possible errors when querying the Kafka Cluster for Partition end offsets.
#[derive(Error, Debug, PartialEq)]
pub enum OffsetsError {
    /// The internal Kafka Admin Client could not be created (i.e. bad client configuration).
    #[error("Failed to create Kafka Admin Client: {0}")]
    ClientCreation(#[source] KafkaError),

    /// Metadata for the monitored Topic could not be fetched.
    #[error("Failed to fetch Metadata of Topic '{topic}': {source}")]
    MetadataFetch {
        topic: String,
        #[source]
        source: KafkaError,
    },

    /// The monitored Topic does not exist (or reports no Partitions).
    #[error("Topic '{0}' not found in Cluster")]
    TopicNotFound(String),

    /// The end offset of a specific Topic Partition could not be fetched.
    #[error("Failed to fetch end offset of '{topic}:{partition}': {source}")]
    WatermarkFetch {
        topic: String,
        partition: u32,
        #[source]
        source: KafkaError,
    },
}

impl OffsetsError {
    /// `true` if the error is worth retrying on the next scheduled poll.
    ///
    /// Authentication/Authorization rejections and unknown Topics are permanent:
    /// retrying won't fix them, so the caller should give up. Everything else
    /// (broker timeouts, transport hiccups) is considered transient.
    pub fn is_transient(&self) -> bool {
        match self {
            OffsetsError::ClientCreation(_) | OffsetsError::TopicNotFound(_) => false,
            OffsetsError::MetadataFetch {
                source,
                ..
            }
            | OffsetsError::WatermarkFetch {
                source,
                ..
            } => !matches!(
                source.rdkafka_error_code(),
                Some(
                    RDKafkaErrorCode::Authentication
                        | RDKafkaErrorCode::SaslAuthenticationFailed
                        | RDKafkaErrorCode::TopicAuthorizationFailed
                        | RDKafkaErrorCode::GroupAuthorizationFailed
                        | RDKafkaErrorCode::ClusterAuthorizationFailed
                        | RDKafkaErrorCode::UnknownTopicOrPartition
                )
            ),
        }
    }
}

pub type OffsetsResult<T> = Result<T, OffsetsError>;
