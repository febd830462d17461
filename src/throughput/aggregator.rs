use super::window::{SlidingWindow, WindowStats};

/// How many rate samples each of the three smoothing windows holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCapacities {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

/// The three moving averages, one per smoothing horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputAverages {
    pub short: WindowStats,
    pub medium: WindowStats,
    pub long: WindowStats,
}

/// Smooths the instantaneous rate over three sliding windows of increasing horizon.
///
/// All three windows are fed the same sample stream, in strict arrival order:
/// they only differ in how far back their average looks.
pub struct RateAggregator {
    short: SlidingWindow,
    medium: SlidingWindow,
    long: SlidingWindow,
}

impl RateAggregator {
    pub fn new(capacities: WindowCapacities) -> Self {
        Self {
            short: SlidingWindow::new(capacities.short),
            medium: SlidingWindow::new(capacities.medium),
            long: SlidingWindow::new(capacities.long),
        }
    }

    /// Append a rate sample to all three windows.
    ///
    /// # Arguments
    ///
    /// * `rate` - The messages/second measured over the last tick
    pub fn observe(&mut self, rate: f64) {
        self.short.push(rate);
        self.medium.push(rate);
        self.long.push(rate);
    }

    /// The current mean (and fullness) of each window.
    pub fn averages(&self) -> ThroughputAverages {
        ThroughputAverages {
            short: self.short.stats(),
            medium: self.medium.stats(),
            long: self.long.stats(),
        }
    }
}
