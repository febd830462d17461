use std::collections::VecDeque;

/// A bounded FIFO of recent rate samples, used to compute a moving average.
///
/// Insertion is append-to-tail; once the window holds `capacity` samples,
/// each new insertion evicts the oldest sample from the head. The window
/// therefore never holds more than `capacity` samples, and its contents are
/// always the most recent ones, in insertion order.
pub struct SlidingWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

/// A point-in-time summary of a [`SlidingWindow`]: how full it is, and its mean.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats {
    /// Maximum amount of samples the window can hold.
    pub capacity: usize,
    /// Amount of samples the window currently holds.
    pub samples: usize,
    /// Arithmetic mean of the current contents; `None` while the window is empty.
    pub mean: Option<f64>,
}

impl SlidingWindow {
    /// Create a new [`SlidingWindow`] that holds at most `capacity` samples.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The amount of most-recent samples to average over
    pub fn new(capacity: usize) -> SlidingWindow {
        assert!(capacity > 0, "SlidingWindow capacity must hold at least 1 sample");

        SlidingWindow {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a new sample, evicting the oldest one if the window is full.
    ///
    /// # Arguments
    ///
    /// * `sample` - The rate sample (messages/second) to append
    pub fn push(&mut self, sample: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }

        self.samples.push_back(sample);
    }

    /// Arithmetic mean of the window's current contents.
    ///
    /// An empty window has no mean: `None` is returned,
    /// never a division by zero.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.samples.iter().sum::<f64>() / self.len() as f64)
        }
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats {
            capacity: self.capacity,
            samples: self.len(),
            mean: self.mean(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[allow(unused)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
