use const_format::formatcp;

/// How often (seconds) the monitored Partitions' end offsets are polled.
pub(crate) const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub(crate) const DEFAULT_POLL_INTERVAL: &str = formatcp!("{DEFAULT_POLL_INTERVAL_SECS}");

/// Sliding window sizes (in rate samples) used to smooth the instantaneous rate.
///
/// At the default polling interval of 2s, these cover roughly
/// 1, 2 and 10 minutes of readings.
pub(crate) const DEFAULT_SHORT_WINDOW_SIZE: usize = 30;
pub(crate) const DEFAULT_SHORT_WINDOW: &str = formatcp!("{DEFAULT_SHORT_WINDOW_SIZE}");
pub(crate) const DEFAULT_MEDIUM_WINDOW_SIZE: usize = 60;
pub(crate) const DEFAULT_MEDIUM_WINDOW: &str = formatcp!("{DEFAULT_MEDIUM_WINDOW_SIZE}");
pub(crate) const DEFAULT_LONG_WINDOW_SIZE: usize = 300;
pub(crate) const DEFAULT_LONG_WINDOW: &str = formatcp!("{DEFAULT_LONG_WINDOW_SIZE}");
