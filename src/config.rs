use crate::errors::ConfigError;

/// Staging area size used when nothing else is requested.
pub const DEFAULT_STAGING_CAPACITY: usize = 4096;
/// Larger staging area; halves the callback count on big segments.
pub const LARGE_STAGING_CAPACITY: usize = 8192;
/// Upper bound on bytes the demuxer consumes while probing (5 MiB).
pub const DEFAULT_PROBE_SIZE: u64 = 5 * 1024 * 1024;

/// Knobs for a probing session.
///
/// None of them change which streams are reported or how their fields are
/// computed, except `report_bitrate` which adds a field to video records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Capacity of the staging area handed to each read callback.
    pub staging_capacity: usize,
    /// Bytes after which `probe_streams` stops reading fragments.
    pub probe_size: u64,
    /// Log every read callback invocation at `trace` level.
    pub log_callbacks: bool,
    /// Compute a bit rate for video streams from fragment sample sizes.
    pub report_bitrate: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            staging_capacity: DEFAULT_STAGING_CAPACITY,
            probe_size: DEFAULT_PROBE_SIZE,
            log_callbacks: false,
            report_bitrate: false,
        }
    }
}

impl ProbeOptions {
    pub fn with_staging_capacity(mut self, capacity: usize) -> Self {
        self.staging_capacity = capacity;
        self
    }

    pub fn with_callback_logging(mut self, enabled: bool) -> Self {
        self.log_callbacks = enabled;
        self
    }

    pub fn with_bitrate(mut self, enabled: bool) -> Self {
        self.report_bitrate = enabled;
        self
    }

    /// Reject options that would make the bridge unable to progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.staging_capacity == 0 {
            return Err(ConfigError::new("staging capacity must be at least 1 byte"));
        }
        if self.probe_size == 0 {
            return Err(ConfigError::new("probe size must be at least 1 byte"));
        }
        Ok(())
    }
}
