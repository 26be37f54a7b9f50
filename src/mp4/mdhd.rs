use crate::bits::reader::{read_full_box_header, read_u16, read_u32, read_u64};
use crate::errors::{DemuxError, DemuxResult};

/// Media header: the track's timescale, declared duration and language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHeader {
    pub timescale: u32,
    /// Duration in `timescale` units, 0 when unknown (typical for init segments)
    pub duration: u64,
    /// ISO 639-2/T code such as `eng`, `None` when unset or not decodable
    pub language: Option<String>,
}

/// Parse mdhd box to get timescale, duration and language
pub fn parse_mdhd(mdhd: &[u8]) -> DemuxResult<MediaHeader> {
    let mut pos = 0;
    let (version, _) = read_full_box_header(mdhd, &mut pos)
        .ok_or_else(|| DemuxError::invalid("mdhd box too small"))?;

    let (timescale, duration) = if version == 1 {
        // Version 1: 64-bit creation/modification times and duration
        pos += 16;
        let timescale = read_u32(mdhd, &mut pos);
        let duration = read_u64(mdhd, &mut pos);
        match (timescale, duration) {
            (Some(t), Some(d)) => (t, if d == u64::MAX { 0 } else { d }),
            _ => return Err(DemuxError::invalid("mdhd v1 box too small")),
        }
    } else {
        pos += 8;
        let timescale = read_u32(mdhd, &mut pos);
        let duration = read_u32(mdhd, &mut pos);
        match (timescale, duration) {
            (Some(t), Some(d)) => (t, if d == u32::MAX { 0 } else { d as u64 }),
            _ => return Err(DemuxError::invalid("mdhd box too small")),
        }
    };

    let language = read_u16(mdhd, &mut pos).and_then(decode_language);

    Ok(MediaHeader {
        timescale,
        duration,
        language,
    })
}

/// Macintosh language codes (QuickTime) by value, "" where there is no
/// ISO 639-2 equivalent
const MAC_LANGUAGES: [&str; 34] = [
    "eng", "fra", "ger", "ita", "dut", "sve", "spa", "dan", "por", "nor", // 0-9
    "heb", "jpn", "ara", "fin", "gre", "ice", "mlt", "tur", "hrv", "chi", // 10-19
    "urd", "hin", "tha", "kor", "lit", "pol", "hun", "est", "lav", "", // 20-29
    "fao", "", "rus", "chi", // 30-33
];

/// Decode a packed ISO 639-2/T language code.
///
/// Format: [pad bit][char1: 5 bits][char2: 5 bits][char3: 5 bits], each char offset by 0x60.
/// Values below 0x400 are Macintosh language codes; only the common ones map.
pub fn decode_language(lang_code: u16) -> Option<String> {
    if lang_code < 0x400 {
        return MAC_LANGUAGES
            .get(lang_code as usize)
            .filter(|lang| !lang.is_empty())
            .map(|lang| lang.to_string());
    }
    if lang_code == 0x7FFF {
        return None;
    }

    let chars = [
        ((lang_code >> 10) & 0x1F) as u8 + 0x60,
        ((lang_code >> 5) & 0x1F) as u8 + 0x60,
        (lang_code & 0x1F) as u8 + 0x60,
    ];

    if chars.iter().all(|c| c.is_ascii_lowercase()) {
        Some(chars.iter().map(|&c| c as char).collect())
    } else {
        None
    }
}

/// Parse an `elng` box (extended language tag, e.g. `en-US`)
pub fn parse_elng(elng: &[u8]) -> Option<String> {
    let text = elng.get(4..)?;
    let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    let tag = std::str::from_utf8(&text[..end]).ok()?.trim();
    if tag.is_empty() {
        None
    } else {
        Some(tag.to_string())
    }
}
