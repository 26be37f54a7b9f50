/*
# Bits Reader Module

 Big-endian integer readers used by the box parsers.

 Key components:
 - `read_u8()` .. `read_u64()`, `read_fourcc()` with position tracking
 - `read_full_box_header()` for the version/flags prefix of full boxes

 They return `None` instead of reading past the end of the slice.
*/

/// Borrow `n` bytes at `pos`, advancing the position.
pub fn read_bytes<'a>(data: &'a [u8], pos: &mut usize, n: usize) -> Option<&'a [u8]> {
    let end = pos.checked_add(n)?;
    let bytes = data.get(*pos..end)?;
    *pos = end;
    Some(bytes)
}

/// Read one byte from a byte slice advancing the position.
pub fn read_u8(data: &[u8], pos: &mut usize) -> Option<u8> {
    read_bytes(data, pos, 1).map(|b| b[0])
}

/// Read a 16-bit big endian value from a byte slice advancing the position.
pub fn read_u16(data: &[u8], pos: &mut usize) -> Option<u16> {
    let b = read_bytes(data, pos, 2)?;
    Some(u16::from_be_bytes([b[0], b[1]]))
}

/// Read a 24-bit big endian value from a byte slice advancing the position.
pub fn read_u24(data: &[u8], pos: &mut usize) -> Option<u32> {
    let b = read_bytes(data, pos, 3)?;
    Some(((b[0] as u32) << 16) | ((b[1] as u32) << 8) | b[2] as u32)
}

/// Read a 32-bit big endian value from a byte slice advancing the position.
pub fn read_u32(data: &[u8], pos: &mut usize) -> Option<u32> {
    let b = read_bytes(data, pos, 4)?;
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read a 64-bit big endian value from a byte slice advancing the position.
pub fn read_u64(data: &[u8], pos: &mut usize) -> Option<u64> {
    let b = read_bytes(data, pos, 8)?;
    let mut buf = [0u8; 8];
    buf.copy_from_slice(b);
    Some(u64::from_be_bytes(buf))
}

/// Read a four character code advancing the position.
pub fn read_fourcc(data: &[u8], pos: &mut usize) -> Option<[u8; 4]> {
    let b = read_bytes(data, pos, 4)?;
    Some([b[0], b[1], b[2], b[3]])
}

/// Read the version byte and 24-bit flags of a full box.
pub fn read_full_box_header(data: &[u8], pos: &mut usize) -> Option<(u8, u32)> {
    let version = read_u8(data, pos)?;
    let flags = read_u24(data, pos)?;
    Some((version, flags))
}
