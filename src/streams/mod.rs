pub mod io_bridge;
pub mod media_buffer;
pub mod pull_stream;

pub use io_bridge::{BridgeState, IoBridge, ReadOutcome};
pub use media_buffer::MediaBuffer;
pub use pull_stream::{PullStream, ReadOnlyStream};

#[cfg(test)]
mod io_bridge_test;
