use std::time::Duration;

use crate::offsets::OffsetSnapshot;

/// The throughput measured over a single tick of the monitoring loop.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSample {
    /// Total amount of messages produced across all Partitions during the tick.
    pub messages: u64,

    /// Normalized rate, in messages/second.
    pub rate: f64,
}

/// Compute the throughput between two consecutive [`OffsetSnapshot`]s.
///
/// Per Partition present in both snapshots, the contribution is
/// `current end offset - previous end offset`. A Partition first seen in the
/// current snapshot contributes zero. An end offset that moved _backwards_
/// (e.g. the Topic was deleted and re-created mid-run) also contributes zero,
/// and is reported via logging: a negative throughput is never produced.
///
/// # Arguments
///
/// * `previous` - The last successfully captured snapshot
/// * `current` - The snapshot captured by this tick
/// * `elapsed` - Monotonic time between the two captures; must be `> 0`, guaranteed by the caller
pub(crate) fn between(
    previous: &OffsetSnapshot,
    current: &OffsetSnapshot,
    elapsed: Duration,
) -> RateSample {
    let mut messages: u64 = 0;

    for (tp, end_offset) in current.iter() {
        match previous.end_offset(tp) {
            None => {
                debug!("Partition '{tp}' observed for the first time: contributes 0 to this tick");
            },
            Some(previous_offset) if end_offset < previous_offset => {
                warn!(
                    "End offset of Partition '{tp}' moved backwards \
                    ({previous_offset} -> {end_offset}): counting 0 messages for it"
                );
            },
            Some(previous_offset) => {
                messages += end_offset - previous_offset;
            },
        }
    }

    RateSample {
        messages,
        rate: messages as f64 / elapsed.as_secs_f64(),
    }
}
