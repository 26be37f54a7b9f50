use super::describer::StreamDescriber;
use super::types::{ProbeResult, StreamKind};
use crate::config::ProbeOptions;
use crate::demux;
use crate::errors::{DemuxResult, InputError, SegProbeResult};
use crate::streams::{IoBridge, MediaBuffer, PullStream};
use log::info;
use std::fs;
use std::path::Path;

/// Read a whole segment file into memory
pub fn read_segment<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, InputError> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| InputError::new(path, e))
}

/// Probe an initialization segment and a media segment stored on disk
pub fn probe_local_segments<P: AsRef<Path>, Q: AsRef<Path>>(
    init_path: P,
    media_path: Q,
    options: &ProbeOptions,
) -> SegProbeResult<ProbeResult> {
    // Both files are read before any buffer is built
    let init = read_segment(&init_path)?;
    let media = read_segment(&media_path)?;
    info!(
        "probing {} ({} bytes) + {} ({} bytes)",
        init_path.as_ref().display(),
        init.len(),
        media_path.as_ref().display(),
        media.len()
    );
    probe_buffer(MediaBuffer::from_segments(init, media)?, options)
}

/// Probe two in-memory segments
pub fn probe_segments(
    init: &[u8],
    media: &[u8],
    options: &ProbeOptions,
) -> SegProbeResult<ProbeResult> {
    probe_buffer(MediaBuffer::new(init, media)?, options)
}

/// Run a full session over `buffer`.
///
/// The demuxer session is closed before the bridge (and its staging area)
/// is dropped, and the buffer is released last.
pub fn probe_buffer(buffer: MediaBuffer, options: &ProbeOptions) -> SegProbeResult<ProbeResult> {
    let mut bridge = IoBridge::new(buffer, options)?;
    let result = run_session(&mut bridge, options);
    bridge.log_stats();

    let buffer = bridge.into_buffer();
    drop(buffer);
    Ok(result?)
}

/// open → probe → describe → close over any pull source
pub fn run_session<S: PullStream>(source: S, options: &ProbeOptions) -> DemuxResult<ProbeResult> {
    let mut session = demux::open(source, options)?;
    let described = session.probe_streams().and_then(|()| {
        StreamDescriber::new(options).describe_all(session.streams())
    });
    let format = session.format().clone();
    session.close();

    let result = ProbeResult {
        format,
        streams: described?,
    };
    info!(
        "{} streams described ({} video, {} audio)",
        result.len(),
        result.streams_of(StreamKind::Video).count(),
        result.streams_of(StreamKind::Audio).count()
    );
    Ok(result)
}
