use super::types::{ProbeResult, StreamDescriptor, StreamKind, StreamParams};

/// One human-readable line for a stream
pub fn format_descriptor(d: &StreamDescriptor) -> String {
    // left empty when the track declares none
    let lang = d.language.as_deref().unwrap_or_default();
    match &d.params {
        StreamParams::Video(v) => {
            let mut line = format!(
                "stream {}: {} video, {}x{}, pts {}, duration {}",
                d.index, d.codec_name, v.width, v.height, v.start_pts, v.duration_ticks
            );
            if let Some(rate) = v.bit_rate {
                line.push_str(&format!(", {} b/s", rate));
            }
            line
        }
        StreamParams::Audio(a) => format!(
            "stream {}: {} {} audio, {} channels, {} Hz",
            d.index, lang, d.codec_name, a.channels, a.sample_rate_hz
        ),
        StreamParams::None => match d.kind {
            StreamKind::Subtitle => {
                format!("stream {}: {} {} subtitle", d.index, lang, d.codec_name)
            }
            _ => format!("stream {}: {} {}", d.index, d.codec_name, d.kind.name()),
        },
    }
}

/// Text report, one line per stream in index order
pub fn render_text(result: &ProbeResult) -> String {
    result
        .streams
        .iter()
        .map(|d| format_descriptor(d) + "\n")
        .collect()
}

pub fn render_json(result: &ProbeResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
