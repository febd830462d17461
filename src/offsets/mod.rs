// Inner modules
mod errors;
mod poller;
mod snapshot;

// Exports
pub use errors::{OffsetsError, OffsetsResult};
pub use poller::{EndOffsetSource, OffsetPoller};
pub use snapshot::OffsetSnapshot;
