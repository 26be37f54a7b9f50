use crate::bits::reader::{read_u32, read_u64};
use crate::errors::{DemuxError, DemuxResult};
use std::io::{self, Read};

/// Box header information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxHeader {
    pub name: [u8; 4],
    /// Total size including the header, `None` when the box runs to the end of input.
    pub size: Option<u64>,
    pub header_size: u64,
}

impl BoxHeader {
    /// Size of the payload, `None` when the box runs to the end of input.
    pub fn payload_size(&self) -> Option<u64> {
        self.size.map(|s| s - self.header_size)
    }

    pub fn name_str(&self) -> String {
        box_name(&self.name)
    }
}

/// Printable form of a four character code.
pub fn box_name(name: &[u8; 4]) -> String {
    name.iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '?' })
        .collect()
}

/// Fill `buf` from `r`, returning how many bytes arrived before end of input.
fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read a box header from an io source.
///
/// Returns `Ok(None)` when the source is exhausted exactly at a box boundary.
pub fn read_box_header<R: Read>(r: &mut R) -> DemuxResult<Option<BoxHeader>> {
    let mut head = [0u8; 8];
    match read_up_to(r, &mut head)? {
        0 => return Ok(None),
        8 => {}
        n => {
            return Err(DemuxError::truncated(format!(
                "box header ({} of 8 bytes)",
                n
            )))
        }
    }

    let size32 = u32::from_be_bytes([head[0], head[1], head[2], head[3]]);
    let name = [head[4], head[5], head[6], head[7]];

    let (size, header_size) = match size32 {
        0 => (None, 8),
        1 => {
            let mut ext = [0u8; 8];
            if read_up_to(r, &mut ext)? != 8 {
                return Err(DemuxError::truncated(format!(
                    "extended size of '{}'",
                    box_name(&name)
                )));
            }
            (Some(u64::from_be_bytes(ext)), 16)
        }
        s => (Some(s as u64), 8),
    };

    if let Some(size) = size {
        if size < header_size {
            return Err(DemuxError::invalid(format!(
                "box '{}' declares size {} smaller than its header",
                box_name(&name),
                size
            )));
        }
    }

    Ok(Some(BoxHeader {
        name,
        size,
        header_size,
    }))
}

/// Read a whole payload into memory. Fails if the source ends early.
pub fn read_box_payload<R: Read>(r: &mut R, header: &BoxHeader) -> DemuxResult<Vec<u8>> {
    let mut payload = Vec::new();
    match header.payload_size() {
        Some(len) => {
            let got = r.by_ref().take(len).read_to_end(&mut payload)?;
            if (got as u64) < len {
                return Err(DemuxError::truncated(format!(
                    "'{}' payload ({} of {} bytes)",
                    header.name_str(),
                    got,
                    len
                )));
            }
        }
        None => {
            r.read_to_end(&mut payload)?;
        }
    }
    Ok(payload)
}

/// Discard a payload without buffering it. Returns the number of bytes skipped.
pub fn skip_box_payload<R: Read>(r: &mut R, header: &BoxHeader) -> DemuxResult<u64> {
    match header.payload_size() {
        Some(len) => {
            let skipped = io::copy(&mut r.by_ref().take(len), &mut io::sink())?;
            if skipped < len {
                return Err(DemuxError::truncated(format!(
                    "'{}' payload ({} of {} bytes)",
                    header.name_str(),
                    skipped,
                    len
                )));
            }
            Ok(skipped)
        }
        None => Ok(io::copy(r, &mut io::sink())?),
    }
}

/// Parse a box header from a byte slice advancing the cursor.
/// Returns the name and the payload bounds within `data`.
pub fn parse_box_header(data: &[u8], pos: &mut usize) -> Option<([u8; 4], usize, usize)> {
    let start = *pos;
    let mut p = start;
    let size = read_u32(data, &mut p)? as u64;
    let name_bytes = data.get(p..p + 4)?;
    let name = [name_bytes[0], name_bytes[1], name_bytes[2], name_bytes[3]];
    p += 4;

    let end = match size {
        0 => data.len(),
        1 => {
            let large = read_u64(data, &mut p)?;
            if large < 16 || large > (data.len() - start) as u64 {
                return None;
            }
            start + large as usize
        }
        s => {
            if s < 8 || s > (data.len() - start) as u64 {
                return None;
            }
            start + s as usize
        }
    };

    *pos = end;
    Some((name, p, end))
}

/// Iterator over the child boxes of a payload, yielding `(name, payload)`.
/// Stops at the first malformed header.
pub struct BoxIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for BoxIter<'a> {
    type Item = ([u8; 4], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        match parse_box_header(self.data, &mut self.pos) {
            Some((name, start, end)) => Some((name, &self.data[start..end])),
            None => {
                self.pos = self.data.len();
                None
            }
        }
    }
}

pub fn iter_boxes(data: &[u8]) -> BoxIter<'_> {
    BoxIter { data, pos: 0 }
}

/// Find a box and return the contained slice
pub fn find_box<'a>(data: &'a [u8], name: &[u8; 4]) -> Option<&'a [u8]> {
    iter_boxes(data).find(|(n, _)| n == name).map(|(_, p)| p)
}

/// Find every box with the given name, in order
pub fn find_boxes<'a>(data: &'a [u8], name: &'a [u8; 4]) -> impl Iterator<Item = &'a [u8]> + 'a {
    iter_boxes(data).filter(move |(n, _)| n == name).map(|(_, p)| p)
}

/// Follow a path of nested boxes, e.g. `[b"minf", b"stbl", b"stsd"]`
pub fn find_path<'a>(data: &'a [u8], path: &[&[u8; 4]]) -> Option<&'a [u8]> {
    path.iter().try_fold(data, |inner, name| find_box(inner, name))
}

/// Write a box header to a vector
pub fn write_box_header(output: &mut Vec<u8>, name: &[u8; 4], size: u32) {
    output.extend_from_slice(&size.to_be_bytes());
    output.extend_from_slice(name);
}

/// Wrap `payload` in a box with a 32-bit size
pub fn make_box(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(payload.len() + 8);
    write_box_header(&mut buf, name, (payload.len() + 8) as u32);
    buf.extend_from_slice(payload);
    buf
}
