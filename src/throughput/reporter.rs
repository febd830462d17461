use super::aggregator::ThroughputAverages;
use super::delta::RateSample;
use super::window::WindowStats;

/// Formats the per-tick throughput report and emits it via the logging sink.
pub struct ThroughputReporter {
    topic: String,
}

impl ThroughputReporter {
    pub fn new(topic: String) -> Self {
        Self {
            topic,
        }
    }

    /// Emit one report line: instantaneous rate first, then each window's average.
    pub fn report(&self, sample: &RateSample, averages: &ThroughputAverages) {
        info!("{}", self.format_line(sample, averages));
    }

    fn format_line(&self, sample: &RateSample, averages: &ThroughputAverages) -> String {
        let mut line = format!("Topic '{}': {:.0} msg/s", self.topic, sample.rate);

        for stats in [&averages.short, &averages.medium, &averages.long] {
            line.push_str(" | ");
            line.push_str(&format_window(stats));
        }

        line
    }
}

fn format_window(stats: &WindowStats) -> String {
    match stats.mean {
        Some(mean) => {
            format!("avg[{}]: {:.0} msg/s ({} samples)", stats.capacity, mean, stats.samples)
        },
        None => format!("avg[{}]: no data", stats.capacity),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stats(capacity: usize, samples: usize, mean: Option<f64>) -> WindowStats {
        WindowStats {
            capacity,
            samples,
            mean,
        }
    }

    #[test]
    fn line_contains_rate_and_all_window_averages() {
        let reporter = ThroughputReporter::new("a_topic".to_string());

        let sample = RateSample {
            messages: 110,
            rate: 55.0,
        };
        let averages = ThroughputAverages {
            short: stats(30, 12, Some(50.25)),
            medium: stats(60, 12, Some(48.0)),
            long: stats(300, 12, Some(45.9)),
        };

        assert_eq!(
            reporter.format_line(&sample, &averages),
            "Topic 'a_topic': 55 msg/s \
            | avg[30]: 50 msg/s (12 samples) \
            | avg[60]: 48 msg/s (12 samples) \
            | avg[300]: 46 msg/s (12 samples)"
        );
    }

    #[test]
    fn empty_window_reports_no_data() {
        let reporter = ThroughputReporter::new("a_topic".to_string());

        let sample = RateSample {
            messages: 0,
            rate: 0.0,
        };
        let averages = ThroughputAverages {
            short: stats(30, 0, None),
            medium: stats(60, 0, None),
            long: stats(300, 0, None),
        };

        assert_eq!(
            reporter.format_line(&sample, &averages),
            "Topic 'a_topic': 0 msg/s \
            | avg[30]: no data | avg[60]: no data | avg[300]: no data"
        );
    }
}
