use super::r#box::{find_box, find_boxes, find_path};
use crate::errors::{DemuxError, DemuxResult};
use crate::metadata::StreamKind;
use crate::mp4::hdlr::{parse_hdlr, Handler};
use crate::mp4::mdhd::{parse_elng, parse_mdhd, MediaHeader};
use crate::mp4::mvex::{parse_mvex, TrackExtends};
use crate::mp4::stsd::{parse_stsd, SampleEntry};
use crate::mp4::tkhd::{parse_tkhd, TrackHeader};
use log::debug;

/// One `trak` of the movie, as declared by the initialization segment
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub header: TrackHeader,
    pub media: MediaHeader,
    pub handler: Handler,
    /// Extended language tag from `elng`, preferred over the mdhd code
    pub extended_language: Option<String>,
    pub sample_entry: Option<SampleEntry>,
}

impl Track {
    pub fn kind(&self) -> StreamKind {
        self.handler.kind()
    }

    pub fn language(&self) -> Option<&str> {
        self.extended_language
            .as_deref()
            .or(self.media.language.as_deref())
    }
}

/// Everything the demuxer needs from a moov box
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub tracks: Vec<Track>,
    pub track_extends: Vec<TrackExtends>,
}

impl Movie {
    /// True when the movie announces fragments (an mvex box was present)
    pub fn is_fragmented(&self) -> bool {
        !self.track_extends.is_empty()
    }
}

/// Parse the payload of a moov box
pub fn parse_moov(moov_data: &[u8]) -> DemuxResult<Movie> {
    let tracks = find_boxes(moov_data, b"trak")
        .enumerate()
        .map(|(i, trak)| parse_trak(trak, i))
        .collect::<DemuxResult<Vec<_>>>()?;

    let track_extends = match find_box(moov_data, b"mvex") {
        Some(mvex) => parse_mvex(mvex)?,
        None => Vec::new(),
    };

    debug!(
        "moov: {} tracks, {} trex entries",
        tracks.len(),
        track_extends.len()
    );
    Ok(Movie {
        tracks,
        track_extends,
    })
}

/// Extract track info from trak box
pub fn parse_trak(trak_data: &[u8], position: usize) -> DemuxResult<Track> {
    let missing = |name: &str| DemuxError::invalid(format!("trak #{} has no {} box", position, name));

    let header = parse_tkhd(find_box(trak_data, b"tkhd").ok_or_else(|| missing("tkhd"))?)?;
    let mdia = find_box(trak_data, b"mdia").ok_or_else(|| missing("mdia"))?;
    let media = parse_mdhd(find_box(mdia, b"mdhd").ok_or_else(|| missing("mdhd"))?)?;
    let handler = parse_hdlr(find_box(mdia, b"hdlr").ok_or_else(|| missing("hdlr"))?)?;
    let extended_language = find_box(mdia, b"elng").and_then(parse_elng);

    let sample_entry = match find_path(mdia, &[b"minf", b"stbl", b"stsd"]) {
        Some(stsd) => parse_stsd(stsd, handler.kind())?,
        None => None,
    };

    debug!(
        "trak #{}: id {} handler {:?} timescale {} entry {:?}",
        position,
        header.track_id,
        handler.kind(),
        media.timescale,
        sample_entry.as_ref().map(|e| e.codec_tag())
    );

    Ok(Track {
        header,
        media,
        handler,
        extended_language,
        sample_entry,
    })
}
