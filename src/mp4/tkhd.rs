use crate::bits::reader::{read_full_box_header, read_u32};
use crate::errors::{DemuxError, DemuxResult};

/// Track header fields the demuxer uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackHeader {
    pub track_id: u32,
    /// Presentation size in pixels (integer part of the 16.16 values)
    pub width: u32,
    pub height: u32,
}

/// Parse tkhd box
pub fn parse_tkhd(tkhd: &[u8]) -> DemuxResult<TrackHeader> {
    let mut pos = 0;
    let (version, _) = read_full_box_header(tkhd, &mut pos)
        .ok_or_else(|| DemuxError::invalid("tkhd box too small"))?;

    // creation + modification time
    pos += if version == 1 { 16 } else { 8 };
    let track_id =
        read_u32(tkhd, &mut pos).ok_or_else(|| DemuxError::invalid("tkhd box too small"))?;

    // reserved, duration, reserved[2], layer, alternate_group, volume, reserved, matrix
    pos += 4 + if version == 1 { 8 } else { 4 } + 8 + 8 + 36;
    let width = read_u32(tkhd, &mut pos).map(|w| w >> 16).unwrap_or(0);
    let height = read_u32(tkhd, &mut pos).map(|h| h >> 16).unwrap_or(0);

    Ok(TrackHeader {
        track_id,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tkhd_v0() {
        let mut payload = vec![0, 0, 0, 7];
        payload.extend_from_slice(&[0; 8]);
        payload.extend_from_slice(&2u32.to_be_bytes());
        payload.extend_from_slice(&[0; 4 + 4 + 8 + 8 + 36]);
        payload.extend_from_slice(&(1280u32 << 16).to_be_bytes());
        payload.extend_from_slice(&(720u32 << 16).to_be_bytes());

        let tkhd = parse_tkhd(&payload).unwrap();
        assert_eq!(tkhd.track_id, 2);
        assert_eq!((tkhd.width, tkhd.height), (1280, 720));
    }

    #[test]
    fn test_parse_tkhd_v1_without_dimensions() {
        let mut payload = vec![1, 0, 0, 0];
        payload.extend_from_slice(&[0; 16]);
        payload.extend_from_slice(&9u32.to_be_bytes());
        let tkhd = parse_tkhd(&payload).unwrap();
        assert_eq!(tkhd.track_id, 9);
        assert_eq!((tkhd.width, tkhd.height), (0, 0));
    }
}
