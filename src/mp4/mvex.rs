use crate::bits::reader::read_u32;
use crate::errors::{DemuxError, DemuxResult};
use crate::mp4::r#box::find_boxes;

/// Per-track sample defaults declared in `mvex/trex`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackExtends {
    pub track_id: u32,
    pub default_sample_description_index: u32,
    pub default_sample_duration: u32,
    pub default_sample_size: u32,
    pub default_sample_flags: u32,
}

/// Parse a trex box
pub fn parse_trex(trex: &[u8]) -> DemuxResult<TrackExtends> {
    let mut pos = 4;
    let mut field = || read_u32(trex, &mut pos).ok_or_else(|| DemuxError::invalid("trex box too small"));
    Ok(TrackExtends {
        track_id: field()?,
        default_sample_description_index: field()?,
        default_sample_duration: field()?,
        default_sample_size: field()?,
        default_sample_flags: field()?,
    })
}

/// Every trex entry of an mvex box, in order
pub fn parse_mvex(mvex: &[u8]) -> DemuxResult<Vec<TrackExtends>> {
    find_boxes(mvex, b"trex").map(parse_trex).collect()
}
