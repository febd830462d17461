use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::aggregator::{RateAggregator, WindowCapacities};
use super::delta::{self, RateSample};
use super::reporter::ThroughputReporter;
use crate::kafka_types::TopicPartition;
use crate::offsets::{EndOffsetSource, OffsetSnapshot, OffsetsResult};

/// The last successfully captured snapshot, and the monotonic instant of its capture.
///
/// While the monitoring loop holds no checkpoint yet, it has produced no rate:
/// the first successful poll only seeds this.
struct Checkpoint {
    snapshot: OffsetSnapshot,
    polled_at: Instant,
}

/// Drives the poll -> delta -> aggregate -> report cadence, until cancelled.
///
/// One tick at a time, strictly serialized: a tick polls the end offsets of
/// the (fixed) monitored Partitions, turns the change since the previous
/// checkpoint into a [`RateSample`], feeds it to the smoothing windows, and
/// reports. A transient poll failure skips the tick, leaving the checkpoint
/// in place: the next successful poll computes its delta against the last
/// good snapshot, over the accordingly longer elapsed time.
///
/// It stops when the provided [`CancellationToken`] is cancelled (checked
/// once per tick, at the tick boundary - an in-flight poll always runs to
/// completion or to its own timeout first), or when a poll fails permanently.
/// Either way the stop is terminal: `run` consumes the monitor.
pub struct ThroughputMonitor<S: EndOffsetSource> {
    source: S,
    partitions: Vec<TopicPartition>,
    poll_interval: Duration,
    aggregator: RateAggregator,
    reporter: ThroughputReporter,
    checkpoint: Option<Checkpoint>,
}

impl<S: EndOffsetSource> ThroughputMonitor<S> {
    pub fn new(
        source: S,
        partitions: Vec<TopicPartition>,
        poll_interval: Duration,
        window_capacities: WindowCapacities,
        reporter: ThroughputReporter,
    ) -> Self {
        Self {
            source,
            partitions,
            poll_interval,
            aggregator: RateAggregator::new(window_capacities),
            reporter,
            checkpoint: None,
        }
    }

    /// Run the monitoring loop until cancellation or a permanent poll failure.
    ///
    /// # Arguments
    ///
    /// * `shutdown_token`: A [`CancellationToken`] that, when cancelled, will make the loop terminate.
    pub async fn run(mut self, shutdown_token: CancellationToken) -> OffsetsResult<()> {
        let mut interval = interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            "Begin polling {} Partitions every {:?}",
            self.partitions.len(),
            self.poll_interval
        );

        loop {
            // The only point where cancellation is observed
            tokio::select! {
                _ = shutdown_token.cancelled() => {
                    info!("Shutting down");
                    return Ok(());
                },
                _ = interval.tick() => {},
            }

            match self.source.end_offsets(&self.partitions) {
                Ok(snapshot) => {
                    if let Some(sample) = self.observe(snapshot, Instant::now()) {
                        self.reporter.report(&sample, &self.aggregator.averages());
                    }
                },
                Err(e) if e.is_transient() => {
                    warn!("Failed to poll end offsets (will retry on next tick): {e}");
                },
                Err(e) => {
                    return Err(e);
                },
            }
        }
    }

    /// Fold a freshly captured snapshot into the monitor state.
    ///
    /// Returns the [`RateSample`] measured since the previous checkpoint, already
    /// fed to the smoothing windows. Returns `None` when no rate can be measured:
    /// on the seeding (first) snapshot, and when no time elapsed since the
    /// checkpoint - in the latter case the checkpoint is left untouched, so the
    /// skipped interval is still accounted for by the next tick.
    fn observe(&mut self, snapshot: OffsetSnapshot, polled_at: Instant) -> Option<RateSample> {
        let Some(checkpoint) = self.checkpoint.take() else {
            debug!("Captured first snapshot: rates begin with the next tick");
            self.checkpoint = Some(Checkpoint {
                snapshot,
                polled_at,
            });
            return None;
        };

        let elapsed = polled_at.duration_since(checkpoint.polled_at);
        if elapsed.is_zero() {
            warn!("No measurable time elapsed since previous poll: skipping this tick");
            self.checkpoint = Some(checkpoint);
            return None;
        }

        let sample = delta::between(&checkpoint.snapshot, &snapshot, elapsed);
        trace!("Measured {} new messages over {:?}", sample.messages, elapsed);

        self.aggregator.observe(sample.rate);
        self.checkpoint = Some(Checkpoint {
            snapshot,
            polled_at,
        });

        Some(sample)
    }
}

#[cfg(test)]
mod test {
    use std::cell::{Cell, RefCell};
    use std::collections::{HashMap, VecDeque};

    use super::*;
    use crate::offsets::OffsetsError;

    use rdkafka::error::KafkaError;
    use rdkafka::types::RDKafkaErrorCode;

    fn tp(partition: u32) -> TopicPartition {
        TopicPartition::new("a_topic".to_string(), partition)
    }

    fn snapshot(offsets: &[(u32, u64)]) -> OffsetSnapshot {
        OffsetSnapshot::new(HashMap::from_iter(
            offsets.iter().map(|(partition, offset)| (tp(*partition), *offset)),
        ))
    }

    fn monitor<S: EndOffsetSource>(source: S) -> ThroughputMonitor<S> {
        ThroughputMonitor::new(
            source,
            vec![tp(0), tp(1)],
            Duration::from_secs(2),
            WindowCapacities {
                short: 2,
                medium: 4,
                long: 8,
            },
            ThroughputReporter::new("a_topic".to_string()),
        )
    }

    /// Serves a pre-baked sequence of poll outcomes.
    struct ScriptedSource {
        script: RefCell<VecDeque<OffsetsResult<OffsetSnapshot>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<OffsetsResult<OffsetSnapshot>>) -> Self {
            Self {
                script: RefCell::new(VecDeque::from(script)),
            }
        }
    }

    impl EndOffsetSource for ScriptedSource {
        fn end_offsets(&self, _: &[TopicPartition]) -> OffsetsResult<OffsetSnapshot> {
            self.script.borrow_mut().pop_front().expect("ScriptedSource exhausted")
        }
    }

    /// Serves an unbounded sequence of growing snapshots.
    struct CountingSource {
        polls: Cell<u64>,
    }

    impl EndOffsetSource for CountingSource {
        fn end_offsets(&self, _: &[TopicPartition]) -> OffsetsResult<OffsetSnapshot> {
            let polls = self.polls.get() + 1;
            self.polls.set(polls);
            Ok(snapshot(&[(0, polls * 100), (1, polls * 100)]))
        }
    }

    fn transient_error() -> OffsetsError {
        OffsetsError::WatermarkFetch {
            topic: "a_topic".to_string(),
            partition: 0,
            source: KafkaError::MetadataFetch(RDKafkaErrorCode::RequestTimedOut),
        }
    }

    // --- observe(): the state transitions, driven directly ---

    #[test]
    fn first_snapshot_seeds_without_a_sample() {
        let mut monitor = monitor(ScriptedSource::new(vec![]));
        let t0 = Instant::now();

        assert_eq!(monitor.observe(snapshot(&[(0, 100), (1, 200)]), t0), None);

        // Nothing reached the windows either
        assert_eq!(monitor.aggregator.averages().long.samples, 0);
    }

    #[test]
    fn second_snapshot_produces_a_sample() {
        let mut monitor = monitor(ScriptedSource::new(vec![]));
        let t0 = Instant::now();

        monitor.observe(snapshot(&[(0, 100), (1, 200)]), t0);
        let sample =
            monitor.observe(snapshot(&[(0, 150), (1, 260)]), t0 + Duration::from_secs(2));

        assert_eq!(
            sample,
            Some(RateSample {
                messages: 110,
                rate: 55.0,
            })
        );

        let averages = monitor.aggregator.averages();
        for stats in [&averages.short, &averages.medium, &averages.long] {
            assert_eq!(stats.samples, 1);
            assert_eq!(stats.mean, Some(55.0));
        }
    }

    #[test]
    fn skipped_tick_stretches_the_next_delta() {
        let mut monitor = monitor(ScriptedSource::new(vec![]));
        let t0 = Instant::now();

        monitor.observe(snapshot(&[(0, 100)]), t0);

        // One poll failed in between: the next snapshot arrives 2 intervals
        // after the checkpoint, and the rate is normalized over all of it
        let sample = monitor.observe(snapshot(&[(0, 300)]), t0 + Duration::from_secs(4));

        assert_eq!(
            sample,
            Some(RateSample {
                messages: 200,
                rate: 50.0,
            })
        );
    }

    #[test]
    fn zero_elapsed_time_skips_the_sample_and_keeps_the_checkpoint() {
        let mut monitor = monitor(ScriptedSource::new(vec![]));
        let t0 = Instant::now();

        monitor.observe(snapshot(&[(0, 100)]), t0);
        assert_eq!(monitor.observe(snapshot(&[(0, 170)]), t0), None);

        // The degenerate tick contributed nothing...
        assert_eq!(monitor.aggregator.averages().long.samples, 0);

        // ...and the checkpoint still points at the first snapshot
        let sample = monitor.observe(snapshot(&[(0, 200)]), t0 + Duration::from_secs(2));
        assert_eq!(
            sample,
            Some(RateSample {
                messages: 100,
                rate: 50.0,
            })
        );
    }

    // --- run(): the loop, driven with a paused clock ---

    #[tokio::test(start_paused = true)]
    async fn run_stops_with_the_error_on_permanent_failure() {
        let source = ScriptedSource::new(vec![
            Ok(snapshot(&[(0, 100), (1, 200)])),
            Ok(snapshot(&[(0, 150), (1, 260)])),
            Err(OffsetsError::TopicNotFound("a_topic".to_string())),
        ]);

        let result = monitor(source).run(CancellationToken::new()).await;

        assert_eq!(result, Err(OffsetsError::TopicNotFound("a_topic".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn run_survives_transient_failures() {
        // If the transient failure stopped the loop, the result would carry it;
        // instead the loop keeps polling until the permanent one
        let source = ScriptedSource::new(vec![
            Ok(snapshot(&[(0, 100), (1, 200)])),
            Err(transient_error()),
            Ok(snapshot(&[(0, 150), (1, 260)])),
            Err(OffsetsError::TopicNotFound("a_topic".to_string())),
        ]);

        let result = monitor(source).run(CancellationToken::new()).await;

        assert_eq!(result, Err(OffsetsError::TopicNotFound("a_topic".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_cleanly_on_cancellation() {
        let source = CountingSource {
            polls: Cell::new(0),
        };

        let shutdown_token = CancellationToken::new();
        shutdown_token.cancel();

        let result = monitor(source).run(shutdown_token).await;

        assert_eq!(result, Ok(()));
    }
}
