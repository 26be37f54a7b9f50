use crate::bits::reader::{read_u16, read_u32, read_u64, read_u8};
use crate::codec::CodecId;
use crate::errors::{DemuxError, DemuxResult};
use crate::metadata::StreamKind;
use crate::mp4::r#box::{box_name, find_box, find_path, parse_box_header};

/// Reserved bytes and data reference index shared by every sample entry
const SAMPLE_ENTRY_HEADER: usize = 8;
/// Offset of child boxes inside a VisualSampleEntry
const VISUAL_ENTRY_SIZE: usize = 78;
/// Offset of child boxes inside a version 0 AudioSampleEntry
const AUDIO_ENTRY_SIZE: usize = 28;

/// First sample description of a track
#[derive(Debug, Clone, PartialEq)]
pub struct SampleEntry {
    /// Entry code after resolving protected (`encv`/`enca`) entries
    pub fourcc: [u8; 4],
    pub codec_id: CodecId,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    /// Sample rate in Hz, 0 when the entry does not carry one
    pub sample_rate: u32,
    /// `objectTypeIndication` from an esds box
    pub object_type: Option<u8>,
}

impl SampleEntry {
    pub fn codec_tag(&self) -> String {
        box_name(&self.fourcc)
    }
}

/// Extract codec and details from the first entry of an stsd box
pub fn parse_stsd(stsd: &[u8], kind: StreamKind) -> DemuxResult<Option<SampleEntry>> {
    let mut pos = 4;
    let entry_count =
        read_u32(stsd, &mut pos).ok_or_else(|| DemuxError::invalid("stsd box too small"))?;
    if entry_count == 0 {
        return Ok(None);
    }

    let (mut fourcc, start, end) = parse_box_header(stsd, &mut pos)
        .ok_or_else(|| DemuxError::invalid("stsd entry header out of bounds"))?;
    let body = &stsd[start..end];
    if body.len() < SAMPLE_ENTRY_HEADER {
        return Err(DemuxError::invalid(format!(
            "sample entry '{}' too small",
            box_name(&fourcc)
        )));
    }

    let mut entry = SampleEntry {
        fourcc,
        codec_id: CodecId::None,
        width: 0,
        height: 0,
        channels: 0,
        sample_rate: 0,
        object_type: None,
    };

    let children = match kind {
        StreamKind::Video => parse_visual_fields(body, &mut entry),
        StreamKind::Audio => parse_audio_fields(body, &mut entry),
        _ => body.get(SAMPLE_ENTRY_HEADER..),
    }
    .unwrap_or(&[]);

    if &fourcc == b"encv" || &fourcc == b"enca" {
        if let Some(original) = find_path(children, &[b"sinf", b"frma"]) {
            if original.len() >= 4 {
                fourcc = [original[0], original[1], original[2], original[3]];
            }
        }
    }

    entry.object_type = find_box(children, b"esds").and_then(parse_esds_object_type);
    entry.fourcc = fourcc;
    entry.codec_id = CodecId::from_sample_entry(&fourcc, entry.object_type);
    Ok(Some(entry))
}

/// Width and height from a VisualSampleEntry. Returns the child box area.
fn parse_visual_fields<'a>(body: &'a [u8], entry: &mut SampleEntry) -> Option<&'a [u8]> {
    // pre_defined, reserved, pre_defined[3]
    let mut pos = SAMPLE_ENTRY_HEADER + 16;
    entry.width = read_u16(body, &mut pos)? as u32;
    entry.height = read_u16(body, &mut pos)? as u32;
    body.get(VISUAL_ENTRY_SIZE..)
}

/// Channel count and sample rate from an AudioSampleEntry (QuickTime v0, v1, v2 layouts).
fn parse_audio_fields<'a>(body: &'a [u8], entry: &mut SampleEntry) -> Option<&'a [u8]> {
    let mut pos = SAMPLE_ENTRY_HEADER;
    let version = read_u16(body, &mut pos)?;
    // revision level, vendor
    pos += 6;

    match version {
        2 => {
            // always3, always16, alwaysMinus2, always0, always65536, sizeOfStructOnly
            pos += 16;
            let rate = f64::from_bits(read_u64(body, &mut pos)?);
            entry.sample_rate = if rate.is_finite() && rate > 0.0 {
                rate.round() as u32
            } else {
                0
            };
            entry.channels = read_u32(body, &mut pos)?;
            body.get(AUDIO_ENTRY_SIZE + 36..)
        }
        _ => {
            entry.channels = read_u16(body, &mut pos)? as u32;
            // sample size, compression id, packet size
            pos += 6;
            entry.sample_rate = read_u32(body, &mut pos)? >> 16;
            let extra = if version == 1 { 16 } else { 0 };
            body.get(AUDIO_ENTRY_SIZE + extra..)
        }
    }
}

/// Read a descriptor length (up to four 7-bit groups)
fn read_descriptor_len(data: &[u8], pos: &mut usize) -> Option<usize> {
    let mut len = 0usize;
    for _ in 0..4 {
        let b = read_u8(data, pos)?;
        len = (len << 7) | (b & 0x7F) as usize;
        if b & 0x80 == 0 {
            break;
        }
    }
    Some(len)
}

/// `objectTypeIndication` of the DecoderConfigDescriptor inside an esds box
pub fn parse_esds_object_type(esds: &[u8]) -> Option<u8> {
    let mut pos = 4;
    if read_u8(esds, &mut pos)? != 0x03 {
        return None;
    }
    read_descriptor_len(esds, &mut pos)?;
    // ES_ID
    pos += 2;
    let flags = read_u8(esds, &mut pos)?;
    if flags & 0x80 != 0 {
        pos += 2;
    }
    if flags & 0x40 != 0 {
        let url_len = read_u8(esds, &mut pos)? as usize;
        pos += url_len;
    }
    if flags & 0x20 != 0 {
        pos += 2;
    }
    if read_u8(esds, &mut pos)? != 0x04 {
        return None;
    }
    read_descriptor_len(esds, &mut pos)?;
    read_u8(esds, &mut pos)
}
