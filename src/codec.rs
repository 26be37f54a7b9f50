//! Codec descriptor lookup.
//!
//! Maps an ISO-BMFF sample entry code (plus the MPEG-4 object type for
//! `mp4a`/`mp4v` entries) to a codec id with a short human-readable name.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecId {
    H264,
    Hevc,
    Av1,
    Vp8,
    Vp9,
    Mpeg4,
    Aac,
    Mp3,
    Ac3,
    Eac3,
    Opus,
    Flac,
    Alac,
    MovText,
    WebVtt,
    Ttml,
    None,
}

impl CodecId {
    /// Resolve a sample entry. `object_type` is the esds `objectTypeIndication` when present.
    pub fn from_sample_entry(fourcc: &[u8; 4], object_type: Option<u8>) -> Self {
        match fourcc {
            b"avc1" | b"avc2" | b"avc3" | b"avc4" => CodecId::H264,
            b"hvc1" | b"hev1" => CodecId::Hevc,
            b"av01" => CodecId::Av1,
            b"vp08" => CodecId::Vp8,
            b"vp09" => CodecId::Vp9,
            b"mp4v" => match object_type {
                Some(0x21) => CodecId::H264,
                _ => CodecId::Mpeg4,
            },
            b"mp4a" => match object_type {
                Some(0x69) | Some(0x6B) => CodecId::Mp3,
                Some(0xA5) => CodecId::Ac3,
                Some(0xA6) => CodecId::Eac3,
                Some(0xAD) => CodecId::Opus,
                _ => CodecId::Aac,
            },
            b".mp3" => CodecId::Mp3,
            b"ac-3" => CodecId::Ac3,
            b"ec-3" => CodecId::Eac3,
            b"Opus" => CodecId::Opus,
            b"fLaC" => CodecId::Flac,
            b"alac" => CodecId::Alac,
            b"tx3g" | b"text" => CodecId::MovText,
            b"wvtt" => CodecId::WebVtt,
            b"stpp" => CodecId::Ttml,
            _ => CodecId::None,
        }
    }

    /// Short codec name, e.g. `h264` or `aac`.
    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn descriptor(&self) -> &'static CodecDescriptor {
        CODEC_DESCRIPTORS
            .iter()
            .find(|d| d.id == *self)
            .unwrap_or(&UNKNOWN_DESCRIPTOR)
    }
}

/// Static information about a codec.
#[derive(Debug, PartialEq, Eq)]
pub struct CodecDescriptor {
    pub id: CodecId,
    pub name: &'static str,
    pub long_name: &'static str,
}

static UNKNOWN_DESCRIPTOR: CodecDescriptor = CodecDescriptor {
    id: CodecId::None,
    name: "none",
    long_name: "unknown codec",
};

static CODEC_DESCRIPTORS: &[CodecDescriptor] = &[
    CodecDescriptor {
        id: CodecId::H264,
        name: "h264",
        long_name: "H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10",
    },
    CodecDescriptor {
        id: CodecId::Hevc,
        name: "hevc",
        long_name: "H.265 / HEVC (High Efficiency Video Coding)",
    },
    CodecDescriptor {
        id: CodecId::Av1,
        name: "av1",
        long_name: "Alliance for Open Media AV1",
    },
    CodecDescriptor {
        id: CodecId::Vp8,
        name: "vp8",
        long_name: "On2 VP8",
    },
    CodecDescriptor {
        id: CodecId::Vp9,
        name: "vp9",
        long_name: "Google VP9",
    },
    CodecDescriptor {
        id: CodecId::Mpeg4,
        name: "mpeg4",
        long_name: "MPEG-4 part 2",
    },
    CodecDescriptor {
        id: CodecId::Aac,
        name: "aac",
        long_name: "AAC (Advanced Audio Coding)",
    },
    CodecDescriptor {
        id: CodecId::Mp3,
        name: "mp3",
        long_name: "MP3 (MPEG audio layer 3)",
    },
    CodecDescriptor {
        id: CodecId::Ac3,
        name: "ac3",
        long_name: "ATSC A/52A (AC-3)",
    },
    CodecDescriptor {
        id: CodecId::Eac3,
        name: "eac3",
        long_name: "ATSC A/52B (AC-3, E-AC-3)",
    },
    CodecDescriptor {
        id: CodecId::Opus,
        name: "opus",
        long_name: "Opus (Opus Interactive Audio Codec)",
    },
    CodecDescriptor {
        id: CodecId::Flac,
        name: "flac",
        long_name: "FLAC (Free Lossless Audio Codec)",
    },
    CodecDescriptor {
        id: CodecId::Alac,
        name: "alac",
        long_name: "ALAC (Apple Lossless Audio Codec)",
    },
    CodecDescriptor {
        id: CodecId::MovText,
        name: "mov_text",
        long_name: "3GPP Timed Text subtitle",
    },
    CodecDescriptor {
        id: CodecId::WebVtt,
        name: "webvtt",
        long_name: "WebVTT subtitle",
    },
    CodecDescriptor {
        id: CodecId::Ttml,
        name: "ttml",
        long_name: "Timed Text Markup Language",
    },
];
