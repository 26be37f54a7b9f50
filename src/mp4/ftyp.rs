use crate::bits::reader::{read_fourcc, read_u32};
use crate::errors::{DemuxError, DemuxResult};
use crate::metadata::ContainerFormat;
use crate::mp4::r#box::box_name;

/// Contents of an `ftyp` or `styp` box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileType {
    pub major_brand: [u8; 4],
    pub minor_version: u32,
    pub compatible_brands: Vec<[u8; 4]>,
}

impl FileType {
    pub fn is_compatible_with(&self, brand: &[u8; 4]) -> bool {
        &self.major_brand == brand || self.compatible_brands.iter().any(|b| b == brand)
    }
}

/// Parse the payload of an `ftyp`/`styp` box
pub fn parse_ftyp(payload: &[u8]) -> DemuxResult<FileType> {
    let mut pos = 0;
    let major_brand = read_fourcc(payload, &mut pos)
        .ok_or_else(|| DemuxError::invalid("ftyp box too short for major brand"))?;
    let minor_version = read_u32(payload, &mut pos)
        .ok_or_else(|| DemuxError::invalid("ftyp box too short for minor version"))?;

    let mut compatible_brands = Vec::new();
    while let Some(brand) = read_fourcc(payload, &mut pos) {
        compatible_brands.push(brand);
    }

    Ok(FileType {
        major_brand,
        minor_version,
        compatible_brands,
    })
}

/// Detect the container format from the file type brands
pub fn detect_format_from_ftyp(ftyp: &FileType) -> ContainerFormat {
    match parse_ftyp_brand(&ftyp.major_brand) {
        ContainerFormat::Unknown(_) => {}
        format => return format,
    }
    // Segment-oriented files often carry a generic major brand.
    if ftyp.is_compatible_with(b"cmfc") || ftyp.is_compatible_with(b"cmf2") {
        ContainerFormat::Cmaf
    } else if ftyp.is_compatible_with(b"dash") || ftyp.is_compatible_with(b"msdh") {
        ContainerFormat::Dash
    } else if ftyp.is_compatible_with(b"isom") {
        ContainerFormat::Mp4
    } else {
        ContainerFormat::Unknown(box_name(&ftyp.major_brand))
    }
}

/// Map a major brand to the corresponding container format
pub fn parse_ftyp_brand(major_brand: &[u8; 4]) -> ContainerFormat {
    match major_brand {
        b"isom" | b"mp41" | b"mp42" | b"iso2" | b"iso4" | b"iso5" | b"iso6" | b"avc1" => {
            ContainerFormat::Mp4
        }
        b"cmfc" | b"cmf2" | b"cmfs" => ContainerFormat::Cmaf,
        b"dash" | b"msdh" | b"msix" => ContainerFormat::Dash,
        b"M4V " | b"M4VH" | b"M4VP" => ContainerFormat::M4v,
        b"M4A " => ContainerFormat::M4a,
        b"3gp4" | b"3gp5" | b"3gp6" | b"3gp7" | b"3ge6" | b"3ge7" | b"3gg6" => {
            ContainerFormat::ThreeGp
        }
        b"3g2a" | b"3g2b" | b"3g2c" => ContainerFormat::ThreeG2,
        b"qt  " => ContainerFormat::Mov,
        _ => ContainerFormat::Unknown(box_name(major_brand)),
    }
}
