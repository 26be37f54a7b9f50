use crate::errors::{DemuxError, DemuxResult};
use crate::metadata::StreamKind;

/// Handler reference: what kind of media a track carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub handler_type: [u8; 4],
    pub name: Option<String>,
}

impl Handler {
    pub fn kind(&self) -> StreamKind {
        match &self.handler_type {
            b"vide" => StreamKind::Video,
            b"soun" => StreamKind::Audio,
            b"sbtl" | b"text" | b"subt" | b"clcp" => StreamKind::Subtitle,
            _ => StreamKind::Other,
        }
    }
}

/// Parse hdlr box
pub fn parse_hdlr(hdlr: &[u8]) -> DemuxResult<Handler> {
    if hdlr.len() < 12 {
        return Err(DemuxError::invalid("hdlr box too small"));
    }
    let handler_type = [hdlr[8], hdlr[9], hdlr[10], hdlr[11]];
    let name = hdlr.get(24..).and_then(parse_handler_name);
    Ok(Handler { handler_type, name })
}

/// ISO files store a NUL-terminated string, QuickTime files a counted one.
fn parse_handler_name(raw: &[u8]) -> Option<String> {
    let text = match raw.first() {
        Some(&len) if len as usize == raw.len() - 1 && len > 0 => &raw[1..],
        _ => raw,
    };
    let end = text.iter().position(|&b| b == 0).unwrap_or(text.len());
    let name = String::from_utf8_lossy(&text[..end]).trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
