pub mod bits;

pub mod codec;
pub use codec::CodecId;

pub mod config;
pub use config::ProbeOptions;

pub mod mp4;

pub mod streams;
pub use streams::{IoBridge, MediaBuffer, PullStream, ReadOutcome};

pub mod demux;
pub use demux::{Session, StreamHandle, Timebase};

pub mod metadata;
pub use metadata::{
    probe_local_segments, probe_segments, ContainerFormat, ProbeResult, StreamDescriber,
    StreamDescriptor, StreamKind,
};

pub mod errors;
pub use errors::{
    ConfigError, DemuxError, DemuxResult, InputError, SegProbeError, SegProbeResult,
};
