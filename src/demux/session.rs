use super::stream::StreamHandle;
use crate::config::ProbeOptions;
use crate::errors::{DemuxError, DemuxResult};
use crate::metadata::ContainerFormat;
use crate::mp4::ftyp::{detect_format_from_ftyp, parse_ftyp};
use crate::mp4::moof::{parse_moof, TrackFragment};
use crate::mp4::moov::{parse_moov, Movie};
use crate::mp4::r#box::{read_box_header, read_box_payload, skip_box_payload, BoxHeader};
use crate::streams::PullStream;
use log::{debug, info, trace, warn};

/// Per-track fragment bookkeeping while probing
#[derive(Debug, Default, Clone)]
struct FragmentProgress {
    first_decode_time: Option<u64>,
    first_composition_offset: i64,
    next_decode_time: u64,
}

/// An open demuxer session over a forward-only source.
///
/// The session owns the source (usually `&mut IoBridge`) until [`Session::close`]
/// hands it back.
#[derive(Debug)]
pub struct Session<S: PullStream> {
    source: S,
    format: ContainerFormat,
    movie: Movie,
    streams: Vec<StreamHandle>,
    progress: Vec<FragmentProgress>,
    position: u64,
    probe_size: u64,
    probed: bool,
}

/// Open a container by reading top-level boxes up to and including `moov`.
pub fn open<S: PullStream>(mut source: S, options: &ProbeOptions) -> DemuxResult<Session<S>> {
    let mut position = 0u64;
    let mut format = None;
    if let Some(len) = source.byte_len() {
        debug!("opening a {} byte source", len);
    }

    let movie = loop {
        let header = read_box_header(&mut source)?.ok_or(DemuxError::MissingMovieHeader)?;
        check_box_name(&header, position)?;
        trace!(
            "top-level '{}' at {} ({:?} bytes)",
            header.name_str(),
            position,
            header.size
        );
        position += header.header_size;

        match &header.name {
            b"moov" => {
                let payload = read_box_payload(&mut source, &header)?;
                position += payload.len() as u64;
                break parse_moov(&payload)?;
            }
            b"moof" | b"mdat" => {
                return Err(DemuxError::FragmentBeforeMovieHeader {
                    box_name: header.name_str(),
                });
            }
            b"ftyp" | b"styp" => {
                let payload = read_box_payload(&mut source, &header)?;
                position += payload.len() as u64;
                let file_type = parse_ftyp(&payload)?;
                if format.is_none() || &header.name == b"ftyp" {
                    format = Some(detect_format_from_ftyp(&file_type));
                }
            }
            b"free" | b"skip" | b"wide" | b"sidx" | b"uuid" | b"prft" | b"emsg" | b"pdin"
            | b"meta" => {
                position += skip_box_payload(&mut source, &header)?;
            }
            _ => {
                debug!("skipping unknown top-level box '{}'", header.name_str());
                position += skip_box_payload(&mut source, &header)?;
            }
        }
    };

    if movie.tracks.is_empty() {
        return Err(DemuxError::NoStreams);
    }

    let format = format.unwrap_or_else(|| {
        debug!("no ftyp before moov, assuming MP4");
        ContainerFormat::Mp4
    });
    let streams: Vec<StreamHandle> = movie
        .tracks
        .iter()
        .enumerate()
        .map(|(index, track)| StreamHandle::from_track(index, track))
        .collect();

    info!(
        "opened {} container: {} streams, movie header ends at byte {}",
        format.name(),
        streams.len(),
        position
    );

    Ok(Session {
        source,
        format,
        progress: vec![FragmentProgress::default(); streams.len()],
        movie,
        streams,
        position,
        probe_size: options.probe_size,
        probed: false,
    })
}

/// Top-level box types are four printable ASCII characters.
fn check_box_name(header: &BoxHeader, position: u64) -> DemuxResult<()> {
    if header.name.iter().all(|&b| (0x20..0x7F).contains(&b)) {
        Ok(())
    } else {
        Err(DemuxError::invalid(format!(
            "unreadable box type {:02x?} at byte {}",
            header.name, position
        )))
    }
}

fn checked_sum(total: u64, value: u64, track_id: u32) -> DemuxResult<u64> {
    total.checked_add(value).ok_or_else(|| {
        DemuxError::invalid(format!("fragment totals overflow on track {}", track_id))
    })
}

/// Decode time plus composition offset as a signed timestamp
fn presentation_time(decode_time: u64, offset: i64, track_id: u32) -> DemuxResult<i64> {
    i64::try_from(decode_time)
        .ok()
        .and_then(|t| t.checked_add(offset))
        .ok_or_else(|| {
            DemuxError::invalid(format!(
                "decode time {} out of range on track {}",
                decode_time, track_id
            ))
        })
}

fn is_truncated(err: &DemuxError) -> bool {
    matches!(err, DemuxError::Truncated { .. })
}

impl<S: PullStream> Session<S> {
    /// Read fragments up to end of input or the probe size and fill in
    /// start times, durations and sample statistics.
    pub fn probe_streams(&mut self) -> DemuxResult<()> {
        if self.probed {
            return Ok(());
        }

        while self.position < self.probe_size {
            let header = match read_box_header(&mut self.source) {
                Ok(Some(header)) => header,
                Ok(None) => break,
                Err(err) if is_truncated(&err) => {
                    warn!("media segment ends inside a box header: {}", err);
                    break;
                }
                Err(err) => return Err(err),
            };
            self.position += header.header_size;

            let read = if &header.name == b"moof" {
                read_box_payload(&mut self.source, &header).and_then(|payload| {
                    let fragments = parse_moof(&payload, &self.movie.track_extends)?;
                    self.apply_fragments(&fragments)?;
                    Ok(payload.len() as u64)
                })
            } else {
                skip_box_payload(&mut self.source, &header)
            };

            match read {
                Ok(len) => self.position += len,
                Err(err) if is_truncated(&err) => {
                    warn!("media segment cut short: {}", err);
                    break;
                }
                Err(err) => return Err(err),
            }
        }

        if self.position >= self.probe_size {
            debug!("probe size of {} bytes reached", self.probe_size);
        }
        self.finalize()?;
        self.probed = true;
        Ok(())
    }

    fn apply_fragments(&mut self, fragments: &[TrackFragment]) -> DemuxResult<()> {
        for fragment in fragments {
            let Some(index) = self
                .streams
                .iter()
                .position(|s| s.track_id == fragment.track_id)
            else {
                warn!(
                    "fragment references unknown track {}, ignoring it",
                    fragment.track_id
                );
                continue;
            };

            let track_id = fragment.track_id;
            let progress = &mut self.progress[index];
            let decode_time = fragment
                .base_decode_time
                .unwrap_or(progress.next_decode_time);
            if progress.first_decode_time.is_none() && fragment.sample_count > 0 {
                progress.first_decode_time = Some(decode_time);
                progress.first_composition_offset = fragment.first_composition_offset.unwrap_or(0);
            }
            progress.next_decode_time = checked_sum(decode_time, fragment.duration, track_id)?;

            let stream = &mut self.streams[index];
            stream.sample_count =
                checked_sum(stream.sample_count, fragment.sample_count, track_id)?;
            stream.sample_bytes = checked_sum(stream.sample_bytes, fragment.bytes, track_id)?;
            stream.fragment_duration =
                checked_sum(stream.fragment_duration, fragment.duration, track_id)?;
        }
        Ok(())
    }

    /// Start time from the first fragment; the duration grows to the end of
    /// the last probed sample when the movie header declares less.
    fn finalize(&mut self) -> DemuxResult<()> {
        for (stream, progress) in self.streams.iter_mut().zip(&self.progress) {
            stream.start_time = 0;
            if let Some(first) = progress.first_decode_time {
                let offset = progress.first_composition_offset;
                stream.start_time = presentation_time(first, offset, stream.track_id)?;
                let track_end =
                    presentation_time(progress.next_decode_time, offset, stream.track_id)?;
                stream.raw_duration = stream.raw_duration.max(track_end);
            }
            debug!(
                "stream {}: {:?} {} timebase {} start {} duration {} ({} samples)",
                stream.index,
                stream.kind,
                stream.codec_tag,
                stream.timebase,
                stream.start_time,
                stream.raw_duration,
                stream.sample_count
            );
        }
        Ok(())
    }

    /// Streams in `trak` order
    pub fn streams(&self) -> &[StreamHandle] {
        &self.streams
    }

    pub fn format(&self) -> &ContainerFormat {
        &self.format
    }

    pub fn movie(&self) -> &Movie {
        &self.movie
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Bytes consumed from the source so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// End the session and give the source back.
    pub fn close(self) -> S {
        debug!("closing demuxer session at byte {}", self.position);
        self.source
    }
}
