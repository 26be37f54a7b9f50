use crate::codec::CodecId;
use crate::metadata::StreamKind;
use crate::mp4::moov::Track;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Rational time unit of a stream's timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timebase {
    pub num: i64,
    pub den: i64,
}

impl Timebase {
    pub fn new(num: i64, den: i64) -> Self {
        Self { num, den }
    }

    /// `1/timescale`, the timebase of an ISO-BMFF track
    pub fn from_timescale(timescale: u32) -> Self {
        Self::new(1, timescale as i64)
    }
}

impl fmt::Display for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Codec parameters and metadata of one stream, as discovered by the demuxer
#[derive(Debug, Clone, PartialEq)]
pub struct StreamHandle {
    pub index: usize,
    pub track_id: u32,
    pub kind: StreamKind,
    pub codec_id: CodecId,
    /// Sample entry code, kept even when the codec is unknown
    pub codec_tag: String,
    pub timebase: Timebase,
    /// `language` and `handler_name` when the track declares them
    pub metadata: BTreeMap<String, String>,
    /// First presentation timestamp, in timebase ticks
    pub start_time: i64,
    /// End of the track in timebase ticks: the declared duration, or the
    /// end of the last probed sample when that is later
    pub raw_duration: i64,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub sample_rate: u32,
    /// Samples seen in fragments during probing
    pub sample_count: u64,
    pub sample_bytes: u64,
    /// Sum of fragment sample durations, in timebase ticks
    pub fragment_duration: u64,
}

impl StreamHandle {
    pub(crate) fn from_track(index: usize, track: &Track) -> Self {
        let kind = track.kind();
        let entry = track.sample_entry.as_ref();

        let mut metadata = BTreeMap::new();
        if let Some(language) = track.language() {
            metadata.insert("language".to_string(), language.to_string());
        }
        if let Some(name) = &track.handler.name {
            metadata.insert("handler_name".to_string(), name.clone());
        }

        let (mut width, mut height) = entry.map(|e| (e.width, e.height)).unwrap_or((0, 0));
        if kind == StreamKind::Video && (width == 0 || height == 0) {
            width = track.header.width;
            height = track.header.height;
        }

        let mut sample_rate = entry.map(|e| e.sample_rate).unwrap_or(0);
        if kind == StreamKind::Audio && sample_rate == 0 {
            sample_rate = track.media.timescale;
        }

        Self {
            index,
            track_id: track.header.track_id,
            kind,
            codec_id: entry.map(|e| e.codec_id).unwrap_or(CodecId::None),
            codec_tag: entry.map(|e| e.codec_tag()).unwrap_or_default(),
            timebase: Timebase::from_timescale(track.media.timescale),
            metadata,
            start_time: 0,
            raw_duration: i64::try_from(track.media.duration).unwrap_or(i64::MAX),
            width,
            height,
            channels: entry.map(|e| e.channels).unwrap_or(0),
            sample_rate,
            sample_count: 0,
            sample_bytes: 0,
            fragment_duration: 0,
        }
    }

    pub fn language(&self) -> Option<&str> {
        self.metadata.get("language").map(String::as_str)
    }

    /// Average bit rate over the probed fragments, in bits per second
    pub fn bit_rate(&self) -> Option<u64> {
        if self.fragment_duration == 0 || self.timebase.den <= 0 || self.timebase.num <= 0 {
            return None;
        }
        let bits = self.sample_bytes as u128 * 8 * self.timebase.den as u128;
        let ticks = self.fragment_duration as u128 * self.timebase.num as u128;
        u64::try_from(bits / ticks).ok()
    }
}
