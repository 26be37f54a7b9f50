use crate::codec::CodecId;
use serde::Serialize;

/// Container format detected from the file type brands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContainerFormat {
    Mp4,
    Cmaf,
    Dash,
    M4v,
    M4a,
    ThreeGp,
    ThreeG2,
    Mov,
    Unknown(String),
}

impl ContainerFormat {
    pub fn name(&self) -> &str {
        match self {
            ContainerFormat::Mp4 => "MP4",
            ContainerFormat::Cmaf => "CMAF",
            ContainerFormat::Dash => "DASH",
            ContainerFormat::M4v => "M4V",
            ContainerFormat::M4a => "M4A",
            ContainerFormat::ThreeGp => "3GP",
            ContainerFormat::ThreeG2 => "3G2",
            ContainerFormat::Mov => "MOV",
            ContainerFormat::Unknown(s) => s,
        }
    }
}

/// Media kind of an elementary stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Other,
}

impl StreamKind {
    pub fn name(&self) -> &'static str {
        match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Subtitle => "subtitle",
            StreamKind::Other => "data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoParams {
    pub width: u32,
    pub height: u32,
    /// Start timestamp in timebase ticks
    pub start_pts: i64,
    /// `(raw_duration - start_pts) / timebase.den`, truncated toward zero
    pub duration_ticks: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioParams {
    pub channels: u32,
    pub sample_rate_hz: u32,
}

/// Kind-specific fields of a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamParams {
    Video(VideoParams),
    Audio(AudioParams),
    None,
}

impl StreamParams {
    pub fn is_none(&self) -> bool {
        matches!(self, StreamParams::None)
    }
}

/// Reportable snapshot of one stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDescriptor {
    pub index: usize,
    pub kind: StreamKind,
    pub codec_id: CodecId,
    pub codec_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "StreamParams::is_none")]
    pub params: StreamParams,
}

/// Every stream of a probed segment pair, in demuxer index order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub format: ContainerFormat,
    pub streams: Vec<StreamDescriptor>,
}

impl ProbeResult {
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Streams of one kind, keeping their relative order
    pub fn streams_of(&self, kind: StreamKind) -> impl Iterator<Item = &StreamDescriptor> {
        self.streams.iter().filter(move |s| s.kind == kind)
    }
}
