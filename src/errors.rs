use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Enumeration of all possible errors that can occur while probing segments
#[derive(Debug)]
pub enum SegProbeError {
    Config(ConfigError),
    Input(InputError),
    Demux(DemuxError),
}

/// Invalid or missing configuration, detected before any probing starts
#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A segment file that could not be read in full
#[derive(Debug)]
pub struct InputError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl InputError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// Container open and stream discovery errors
#[derive(Debug)]
pub enum DemuxError {
    /// A box or field that does not follow the ISO-BMFF layout
    InvalidData { message: String },
    /// The source ended in the middle of a structure the demuxer needs
    Truncated { context: String },
    /// The source ended before a `moov` box was seen
    MissingMovieHeader,
    /// Fragment data (`moof`/`mdat`) showed up before the `moov` box
    FragmentBeforeMovieHeader { box_name: String },
    /// The `moov` box did not describe any track
    NoStreams,
    /// A stream whose timebase denominator is zero or negative
    InvalidTimebase { index: usize, denominator: i64 },
    /// Read failure reported by the pull source
    Io(io::Error),
}

impl DemuxError {
    pub fn invalid(message: impl Into<String>) -> Self {
        DemuxError::InvalidData {
            message: message.into(),
        }
    }

    pub fn truncated(context: impl Into<String>) -> Self {
        DemuxError::Truncated {
            context: context.into(),
        }
    }
}

impl fmt::Display for SegProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegProbeError::Config(err) => write!(f, "Configuration error: {}", err),
            SegProbeError::Input(err) => write!(f, "I/O error: {}", err),
            SegProbeError::Demux(err) => write!(f, "Demux error: {}", err),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read {}: {}", self.path.display(), self.source)
    }
}

impl fmt::Display for DemuxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemuxError::InvalidData { message } => write!(f, "invalid data: {}", message),
            DemuxError::Truncated { context } => write!(f, "unexpected end of input in {}", context),
            DemuxError::MissingMovieHeader => {
                write!(f, "no moov box found, initialization segment missing")
            }
            DemuxError::FragmentBeforeMovieHeader { box_name } => write!(
                f,
                "found '{}' before moov, media segment precedes initialization segment",
                box_name
            ),
            DemuxError::NoStreams => write!(f, "moov box contains no tracks"),
            DemuxError::InvalidTimebase { index, denominator } => write!(
                f,
                "stream {} has non-positive timebase denominator {}",
                index, denominator
            ),
            DemuxError::Io(err) => write!(f, "read failed: {}", err),
        }
    }
}

impl Error for SegProbeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SegProbeError::Config(err) => Some(err),
            SegProbeError::Input(err) => Some(err),
            SegProbeError::Demux(err) => Some(err),
        }
    }
}

impl Error for ConfigError {}

impl Error for InputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl Error for DemuxError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DemuxError::Io(err) => Some(err),
            _ => None,
        }
    }
}

// Conversion implementations
impl From<ConfigError> for SegProbeError {
    fn from(err: ConfigError) -> Self {
        SegProbeError::Config(err)
    }
}

impl From<InputError> for SegProbeError {
    fn from(err: InputError) -> Self {
        SegProbeError::Input(err)
    }
}

impl From<DemuxError> for SegProbeError {
    fn from(err: DemuxError) -> Self {
        SegProbeError::Demux(err)
    }
}

impl From<io::Error> for DemuxError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            DemuxError::truncated(err.to_string())
        } else {
            DemuxError::Io(err)
        }
    }
}

// Type alias for Result with SegProbeError
pub type SegProbeResult<T> = Result<T, SegProbeError>;

/// Type alias for demuxer results
pub type DemuxResult<T> = Result<T, DemuxError>;
