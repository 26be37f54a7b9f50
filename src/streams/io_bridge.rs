use super::media_buffer::MediaBuffer;
use super::pull_stream::PullStream;
use crate::config::ProbeOptions;
use crate::errors::ConfigError;
use log::{debug, trace};
use std::io::{self, Read};

/// Lifecycle of a bridge. `Drained` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Ready,
    Serving,
    Drained,
}

/// Result of one read callback invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// This many bytes were copied into the destination.
    Served(usize),
    /// Nothing is left; distinct from a zero-length successful read.
    EndOfStream,
}

/// Forward-only position into the media buffer.
#[derive(Debug)]
struct BridgeCursor {
    offset: usize,
    state: BridgeState,
}

impl BridgeCursor {
    fn new() -> Self {
        Self {
            offset: 0,
            state: BridgeState::Ready,
        }
    }

    /// Copy the next bytes of `buffer` into `dest` and move past them.
    fn advance(&mut self, buffer: &MediaBuffer, dest: &mut [u8]) -> ReadOutcome {
        if self.state == BridgeState::Drained || self.offset >= buffer.len() {
            self.state = BridgeState::Drained;
            return ReadOutcome::EndOfStream;
        }
        if dest.is_empty() {
            return ReadOutcome::Served(0);
        }

        let src = buffer.slice_from(self.offset, dest.len());
        let served = src.len();
        dest[..served].copy_from_slice(src);
        self.offset += served;
        self.state = BridgeState::Serving;
        ReadOutcome::Served(served)
    }
}

/// Fixed-capacity region each callback invocation fills.
#[derive(Debug)]
struct StagingArea {
    data: Box<[u8]>,
    start: usize,
    end: usize,
}

impl StagingArea {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            start: 0,
            end: 0,
        }
    }

    fn pending(&self) -> &[u8] {
        &self.data[self.start..self.end]
    }

    fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn drain_into(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.end - self.start);
        buf[..n].copy_from_slice(&self.data[self.start..self.start + n]);
        self.start += n;
        n
    }
}

/// Presents a [`MediaBuffer`] to the demuxer as a non-seekable byte stream.
///
/// `read_packet` is the read callback: it serves at most the requested number
/// of bytes from the cursor and reports [`ReadOutcome::EndOfStream`] once the
/// buffer is exhausted. The `Read` implementation refills the staging area
/// with one callback invocation whenever it runs dry.
#[derive(Debug)]
pub struct IoBridge {
    buffer: MediaBuffer,
    cursor: BridgeCursor,
    staging: StagingArea,
    callback_count: u64,
    log_callbacks: bool,
}

impl IoBridge {
    pub fn new(buffer: MediaBuffer, options: &ProbeOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        debug!(
            "I/O bridge over {} bytes ({} init + {} media), staging capacity {}",
            buffer.len(),
            buffer.init_len(),
            buffer.media_len(),
            options.staging_capacity
        );
        Ok(Self {
            buffer,
            cursor: BridgeCursor::new(),
            staging: StagingArea::with_capacity(options.staging_capacity),
            callback_count: 0,
            log_callbacks: options.log_callbacks,
        })
    }

    /// Read callback. Serves `min(dest.len(), remaining)` bytes.
    pub fn read_packet(&mut self, dest: &mut [u8]) -> ReadOutcome {
        let before = self.cursor.offset;
        let outcome = self.cursor.advance(&self.buffer, dest);
        self.record(before, dest.len(), outcome);
        outcome
    }

    fn fill_staging(&mut self) -> ReadOutcome {
        let before = self.cursor.offset;
        let requested = self.staging.data.len();
        let outcome = self.cursor.advance(&self.buffer, &mut self.staging.data);
        self.staging.start = 0;
        self.staging.end = match outcome {
            ReadOutcome::Served(n) => n,
            ReadOutcome::EndOfStream => 0,
        };
        self.record(before, requested, outcome);
        outcome
    }

    fn record(&mut self, offset: usize, requested: usize, outcome: ReadOutcome) {
        self.callback_count += 1;
        if self.log_callbacks {
            trace!(
                "read callback #{}: offset {} requested {} remaining {} -> {:?}",
                self.callback_count,
                offset,
                requested,
                self.buffer.len() - offset,
                outcome
            );
        }
    }

    pub fn state(&self) -> BridgeState {
        self.cursor.state
    }

    /// Offset of the next byte the callback will serve.
    pub fn position(&self) -> usize {
        self.cursor.offset
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor.offset
    }

    /// Bytes handed out through `Read`, i.e. served minus still staged.
    pub fn bytes_consumed(&self) -> usize {
        self.cursor.offset - self.staging.pending().len()
    }

    pub fn buffer(&self) -> &MediaBuffer {
        &self.buffer
    }

    /// Release the staging area and hand the media buffer back.
    pub fn into_buffer(self) -> MediaBuffer {
        let IoBridge {
            buffer, staging, ..
        } = self;
        drop(staging);
        buffer
    }
}

impl Read for IoBridge {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.staging.is_empty() {
            if let ReadOutcome::EndOfStream = self.fill_staging() {
                return Ok(0);
            }
        }
        Ok(self.staging.drain_into(buf))
    }
}

impl PullStream for IoBridge {
    fn byte_len(&self) -> Option<u64> {
        Some(self.buffer.len() as u64)
    }

    fn callback_count(&self) -> u64 {
        self.callback_count
    }

    fn bytes_served(&self) -> u64 {
        self.cursor.offset as u64
    }

    fn log_stats(&self) {
        debug!(
            "I/O bridge: {} callbacks, {} of {} bytes served, state {:?}",
            self.callback_count,
            self.cursor.offset,
            self.buffer.len(),
            self.cursor.state
        );
    }
}
