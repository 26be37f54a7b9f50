use crate::bits::reader::{read_full_box_header, read_u32, read_u64};
use crate::errors::{DemuxError, DemuxResult};
use crate::mp4::mvex::TrackExtends;
use crate::mp4::r#box::{find_box, find_boxes};
use log::debug;

const TFHD_BASE_DATA_OFFSET: u32 = 0x01;
const TFHD_SAMPLE_DESCRIPTION_INDEX: u32 = 0x02;
const TFHD_DEFAULT_DURATION: u32 = 0x08;
const TFHD_DEFAULT_SIZE: u32 = 0x10;
const TFHD_DEFAULT_FLAGS: u32 = 0x20;

const TRUN_DATA_OFFSET: u32 = 0x01;
const TRUN_FIRST_SAMPLE_FLAGS: u32 = 0x04;
const TRUN_DURATION: u32 = 0x100;
const TRUN_SIZE: u32 = 0x200;
const TRUN_FLAGS: u32 = 0x400;
const TRUN_COMPOSITION_OFFSET: u32 = 0x800;

/// Track fragment header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FragmentHeader {
    pub track_id: u32,
    pub default_sample_duration: Option<u32>,
    pub default_sample_size: Option<u32>,
}

/// Summary of the samples one `traf` contributes to a track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackFragment {
    pub track_id: u32,
    /// `tfdt` baseMediaDecodeTime, when present
    pub base_decode_time: Option<u64>,
    pub sample_count: u64,
    /// Sum of sample durations, in media timescale units
    pub duration: u64,
    /// Sum of sample sizes in bytes
    pub bytes: u64,
    /// Composition offset of the first sample
    pub first_composition_offset: Option<i64>,
}

/// Parse tfhd box
pub fn parse_tfhd(tfhd: &[u8]) -> DemuxResult<FragmentHeader> {
    let too_small = || DemuxError::invalid("tfhd box too small");
    let mut pos = 0;
    let (_, flags) = read_full_box_header(tfhd, &mut pos).ok_or_else(too_small)?;
    let track_id = read_u32(tfhd, &mut pos).ok_or_else(too_small)?;

    if flags & TFHD_BASE_DATA_OFFSET != 0 {
        read_u64(tfhd, &mut pos).ok_or_else(too_small)?;
    }
    if flags & TFHD_SAMPLE_DESCRIPTION_INDEX != 0 {
        read_u32(tfhd, &mut pos).ok_or_else(too_small)?;
    }
    let mut optional = |bit: u32| -> DemuxResult<Option<u32>> {
        if flags & bit != 0 {
            read_u32(tfhd, &mut pos).ok_or_else(too_small).map(Some)
        } else {
            Ok(None)
        }
    };
    let default_sample_duration = optional(TFHD_DEFAULT_DURATION)?;
    let default_sample_size = optional(TFHD_DEFAULT_SIZE)?;
    optional(TFHD_DEFAULT_FLAGS)?;

    Ok(FragmentHeader {
        track_id,
        default_sample_duration,
        default_sample_size,
    })
}

/// Parse tfdt box
pub fn parse_tfdt(tfdt: &[u8]) -> DemuxResult<u64> {
    let mut pos = 0;
    let decode_time = match read_full_box_header(tfdt, &mut pos) {
        Some((1, _)) => read_u64(tfdt, &mut pos),
        Some(_) => read_u32(tfdt, &mut pos).map(u64::from),
        None => None,
    };
    decode_time.ok_or_else(|| DemuxError::invalid("tfdt box too small"))
}

/// Add the samples of one trun box to `fragment`
pub fn parse_trun(
    trun: &[u8],
    default_duration: u32,
    default_size: u32,
    fragment: &mut TrackFragment,
) -> DemuxResult<()> {
    let too_small = || DemuxError::invalid("trun box too small");
    let mut pos = 0;
    let (version, flags) = read_full_box_header(trun, &mut pos).ok_or_else(too_small)?;
    let sample_count = read_u32(trun, &mut pos).ok_or_else(too_small)?;

    if flags & TRUN_DATA_OFFSET != 0 {
        read_u32(trun, &mut pos).ok_or_else(too_small)?;
    }
    if flags & TRUN_FIRST_SAMPLE_FLAGS != 0 {
        read_u32(trun, &mut pos).ok_or_else(too_small)?;
    }

    let per_sample = [TRUN_DURATION, TRUN_SIZE, TRUN_FLAGS, TRUN_COMPOSITION_OFFSET]
        .iter()
        .filter(|&&bit| flags & bit != 0)
        .count()
        * 4;
    let needed = per_sample as u64 * sample_count as u64;
    if needed > (trun.len() - pos) as u64 {
        return Err(DemuxError::invalid(format!(
            "trun declares {} samples but holds {} bytes of sample data",
            sample_count,
            trun.len() - pos
        )));
    }

    if sample_count > 0 && fragment.sample_count == 0 {
        fragment.first_composition_offset = Some(0);
    }
    let count = sample_count as u64;

    if per_sample == 0 {
        return add_samples(
            fragment,
            count,
            count * default_duration as u64,
            count * default_size as u64,
        );
    }

    // At most u32::MAX samples of at most u32::MAX each: fits in u64
    let mut duration_sum = 0u64;
    let mut size_sum = 0u64;
    for i in 0..sample_count {
        let mut sample_field = |bit: u32| {
            if flags & bit != 0 {
                read_u32(trun, &mut pos)
            } else {
                None
            }
        };
        let duration = sample_field(TRUN_DURATION).unwrap_or(default_duration);
        let size = sample_field(TRUN_SIZE).unwrap_or(default_size);
        sample_field(TRUN_FLAGS);
        let composition_offset = sample_field(TRUN_COMPOSITION_OFFSET).map(|raw| {
            if version == 0 {
                raw as i64
            } else {
                raw as i32 as i64
            }
        });

        if i == 0 && fragment.sample_count == 0 {
            fragment.first_composition_offset = Some(composition_offset.unwrap_or(0));
        }
        duration_sum += duration as u64;
        size_sum += size as u64;
    }
    add_samples(fragment, count, duration_sum, size_sum)
}

fn add_samples(
    fragment: &mut TrackFragment,
    count: u64,
    duration: u64,
    bytes: u64,
) -> DemuxResult<()> {
    let track_id = fragment.track_id;
    let overflow = || {
        DemuxError::invalid(format!("trun totals overflow on track {}", track_id))
    };
    fragment.duration = fragment.duration.checked_add(duration).ok_or_else(overflow)?;
    fragment.bytes = fragment.bytes.checked_add(bytes).ok_or_else(overflow)?;
    fragment.sample_count = fragment.sample_count.checked_add(count).ok_or_else(overflow)?;
    Ok(())
}

/// Parse one traf box, falling back to trex defaults where tfhd is silent
pub fn parse_traf(traf: &[u8], trex: &[TrackExtends]) -> DemuxResult<TrackFragment> {
    let tfhd = find_box(traf, b"tfhd").ok_or_else(|| DemuxError::invalid("traf without tfhd"))?;
    let header = parse_tfhd(tfhd)?;
    let defaults = trex
        .iter()
        .find(|t| t.track_id == header.track_id)
        .copied()
        .unwrap_or_default();

    let mut fragment = TrackFragment {
        track_id: header.track_id,
        base_decode_time: find_box(traf, b"tfdt").map(parse_tfdt).transpose()?,
        ..TrackFragment::default()
    };

    let duration = header
        .default_sample_duration
        .unwrap_or(defaults.default_sample_duration);
    let size = header
        .default_sample_size
        .unwrap_or(defaults.default_sample_size);
    for trun in find_boxes(traf, b"trun") {
        parse_trun(trun, duration, size, &mut fragment)?;
    }

    debug!(
        "traf track {}: {} samples, duration {}, {} bytes",
        fragment.track_id, fragment.sample_count, fragment.duration, fragment.bytes
    );
    Ok(fragment)
}

/// Parse a moof box into one summary per track fragment
pub fn parse_moof(moof: &[u8], trex: &[TrackExtends]) -> DemuxResult<Vec<TrackFragment>> {
    find_boxes(moof, b"traf")
        .map(|traf| parse_traf(traf, trex))
        .collect()
}
