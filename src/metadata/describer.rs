use super::types::{AudioParams, StreamDescriptor, StreamKind, StreamParams, VideoParams};
use crate::config::ProbeOptions;
use crate::demux::{StreamHandle, Timebase};
use crate::errors::{DemuxError, DemuxResult};
use log::debug;

/// Turns demuxer stream handles into reportable descriptors
#[derive(Debug, Clone, Default)]
pub struct StreamDescriber {
    report_bitrate: bool,
}

impl StreamDescriber {
    pub fn new(options: &ProbeOptions) -> Self {
        Self {
            report_bitrate: options.report_bitrate,
        }
    }

    /// Describe every handle, keeping their order. Nothing is filtered out.
    pub fn describe_all(&self, handles: &[StreamHandle]) -> DemuxResult<Vec<StreamDescriptor>> {
        handles.iter().map(|h| self.describe(h)).collect()
    }

    pub fn describe(&self, handle: &StreamHandle) -> DemuxResult<StreamDescriptor> {
        let params = match handle.kind {
            StreamKind::Video => StreamParams::Video(VideoParams {
                width: handle.width,
                height: handle.height,
                start_pts: handle.start_time,
                duration_ticks: duration_ticks(
                    handle.raw_duration,
                    handle.start_time,
                    handle.timebase,
                    handle.index,
                )?,
                bit_rate: if self.report_bitrate {
                    handle.bit_rate()
                } else {
                    None
                },
            }),
            StreamKind::Audio => StreamParams::Audio(AudioParams {
                channels: handle.channels,
                sample_rate_hz: handle.sample_rate,
            }),
            StreamKind::Subtitle | StreamKind::Other => StreamParams::None,
        };

        let descriptor = StreamDescriptor {
            index: handle.index,
            kind: handle.kind,
            codec_id: handle.codec_id,
            codec_name: handle.codec_id.name().to_string(),
            language: handle.language().map(str::to_string),
            params,
        };
        debug!("described stream {}: {:?}", descriptor.index, descriptor);
        Ok(descriptor)
    }
}

/// `(raw_duration - start_pts) / timebase.den`, truncated toward zero.
///
/// Fails with [`DemuxError::InvalidTimebase`] when the denominator is not positive.
pub fn duration_ticks(
    raw_duration: i64,
    start_pts: i64,
    timebase: Timebase,
    index: usize,
) -> DemuxResult<i64> {
    if timebase.den <= 0 {
        return Err(DemuxError::InvalidTimebase {
            index,
            denominator: timebase.den,
        });
    }
    Ok(raw_duration.saturating_sub(start_pts) / timebase.den)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecId;
    use std::collections::BTreeMap;

    fn handle(index: usize, kind: StreamKind, codec_id: CodecId) -> StreamHandle {
        StreamHandle {
            index,
            track_id: index as u32 + 1,
            kind,
            codec_id,
            codec_tag: String::new(),
            timebase: Timebase::new(1, 3),
            metadata: BTreeMap::new(),
            start_time: 10,
            raw_duration: 100,
            width: 640,
            height: 360,
            channels: 2,
            sample_rate: 44100,
            sample_count: 0,
            sample_bytes: 0,
            fragment_duration: 0,
        }
    }

    #[test]
    fn test_duration_formula() {
        assert_eq!(duration_ticks(100, 10, Timebase::new(1, 3), 0).unwrap(), 30);
        assert_eq!(duration_ticks(100, 0, Timebase::new(1, 90000), 0).unwrap(), 0);
        // truncation toward zero when the start lies past the end
        assert_eq!(duration_ticks(10, 15, Timebase::new(1, 2), 0).unwrap(), -2);
    }

    #[test]
    fn test_non_positive_denominator() {
        for den in [0, -1] {
            let err = duration_ticks(100, 10, Timebase::new(1, den), 4).unwrap_err();
            match err {
                DemuxError::InvalidTimebase { index, denominator } => {
                    assert_eq!(index, 4);
                    assert_eq!(denominator, den);
                }
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[test]
    fn test_describe_video() {
        let describer = StreamDescriber::default();
        let d = describer
            .describe(&handle(1, StreamKind::Video, CodecId::H264))
            .unwrap();
        assert_eq!(d.codec_name, "h264");
        assert_eq!(d.language, None);
        assert_eq!(
            d.params,
            StreamParams::Video(VideoParams {
                width: 640,
                height: 360,
                start_pts: 10,
                duration_ticks: 30,
                bit_rate: None,
            })
        );
    }

    #[test]
    fn test_bitrate_only_when_enabled() {
        let mut h = handle(0, StreamKind::Video, CodecId::Hevc);
        h.timebase = Timebase::new(1, 1000);
        h.fragment_duration = 2000;
        h.sample_bytes = 1000;

        let plain = StreamDescriber::default().describe(&h).unwrap();
        let with_rate = StreamDescriber::new(&ProbeOptions::default().with_bitrate(true))
            .describe(&h)
            .unwrap();
        match (plain.params, with_rate.params) {
            (StreamParams::Video(a), StreamParams::Video(b)) => {
                assert_eq!(a.bit_rate, None);
                assert_eq!(b.bit_rate, Some(4000));
            }
            other => panic!("unexpected params: {:?}", other),
        }
    }

    #[test]
    fn test_describe_audio_and_subtitle_language() {
        let mut audio = handle(0, StreamKind::Audio, CodecId::Aac);
        audio
            .metadata
            .insert("language".to_string(), "fre".to_string());
        let d = StreamDescriber::default().describe(&audio).unwrap();
        assert_eq!(d.language.as_deref(), Some("fre"));
        assert_eq!(
            d.params,
            StreamParams::Audio(AudioParams {
                channels: 2,
                sample_rate_hz: 44100,
            })
        );

        let d = StreamDescriber::default()
            .describe(&handle(2, StreamKind::Subtitle, CodecId::WebVtt))
            .unwrap();
        assert_eq!(d.params, StreamParams::None);
        assert_eq!(d.codec_name, "webvtt");
    }

    #[test]
    fn test_order_kept_and_other_streams_not_dropped() {
        let handles = vec![
            handle(0, StreamKind::Audio, CodecId::Aac),
            handle(1, StreamKind::Other, CodecId::None),
            handle(2, StreamKind::Video, CodecId::Av1),
        ];
        let descriptors = StreamDescriber::default().describe_all(&handles).unwrap();
        let kinds: Vec<StreamKind> = descriptors.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![StreamKind::Audio, StreamKind::Other, StreamKind::Video]
        );
        assert_eq!(descriptors[1].codec_name, "none");
        assert_eq!(descriptors[1].params, StreamParams::None);
    }

    #[test]
    fn test_invalid_timebase_only_matters_for_video() {
        let mut audio = handle(0, StreamKind::Audio, CodecId::Aac);
        audio.timebase = Timebase::new(1, 0);
        assert!(StreamDescriber::default().describe(&audio).is_ok());

        let mut video = handle(1, StreamKind::Video, CodecId::H264);
        video.timebase = Timebase::new(1, 0);
        assert!(StreamDescriber::default().describe_all(&[audio, video]).is_err());
    }
}
