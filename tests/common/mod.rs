//! Synthetic fMP4 segments for integration tests.
#![allow(dead_code)]

use std::io::Write;
use std::path::Path;

pub fn make_box(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(name);
    out.extend_from_slice(payload);
    out
}

pub fn full_box(name: &[u8; 4], version: u8, flags: u32, body: &[u8]) -> Vec<u8> {
    let mut payload = vec![version];
    payload.extend_from_slice(&flags.to_be_bytes()[1..]);
    payload.extend_from_slice(body);
    make_box(name, &payload)
}

/// Packed ISO-639-2/T language code as stored in mdhd, "" for unspecified
fn language_code(lang: &str) -> u16 {
    if lang.is_empty() {
        return 0x7FFF;
    }
    lang.bytes()
        .fold(0u16, |acc, c| (acc << 5) | (c - 0x60) as u16)
}

pub enum Entry {
    Video { fourcc: [u8; 4], width: u16, height: u16 },
    Audio { channels: u16, sample_rate: u32, object_type: u8 },
    Subtitle { fourcc: [u8; 4] },
    Data,
}

pub struct TrackSpec {
    pub track_id: u32,
    pub timescale: u32,
    pub duration: u32,
    pub language: &'static str,
    pub entry: Entry,
}

impl TrackSpec {
    fn handler(&self) -> &'static [u8; 4] {
        match self.entry {
            Entry::Video { .. } => b"vide",
            Entry::Audio { .. } => b"soun",
            Entry::Subtitle { .. } => b"subt",
            Entry::Data => b"meta",
        }
    }

    fn sample_entry(&self) -> Vec<u8> {
        let mut body = vec![0u8; 6];
        body.extend_from_slice(&1u16.to_be_bytes());
        match &self.entry {
            Entry::Video {
                fourcc,
                width,
                height,
            } => {
                body.extend_from_slice(&[0u8; 16]);
                body.extend_from_slice(&width.to_be_bytes());
                body.extend_from_slice(&height.to_be_bytes());
                body.resize(78, 0);
                make_box(fourcc, &body)
            }
            Entry::Audio {
                channels,
                sample_rate,
                object_type,
            } => {
                body.extend_from_slice(&[0u8; 8]);
                body.extend_from_slice(&channels.to_be_bytes());
                body.extend_from_slice(&16u16.to_be_bytes());
                body.extend_from_slice(&[0u8; 4]);
                body.extend_from_slice(&(sample_rate << 16).to_be_bytes());
                let esds = [
                    0x03, 0x19, 0x00, 0x01, 0x00, // ES_Descriptor
                    0x04, 0x11, *object_type, 0x15, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
                ];
                body.extend_from_slice(&full_box(b"esds", 0, 0, &esds));
                make_box(b"mp4a", &body)
            }
            Entry::Subtitle { fourcc } => make_box(fourcc, &body),
            Entry::Data => make_box(b"mett", &body),
        }
    }

    fn trak(&self) -> Vec<u8> {
        let mut tkhd = vec![0u8; 8];
        tkhd.extend_from_slice(&self.track_id.to_be_bytes());
        tkhd.resize(80, 0);

        let mut mdhd = vec![0u8; 8];
        mdhd.extend_from_slice(&self.timescale.to_be_bytes());
        mdhd.extend_from_slice(&self.duration.to_be_bytes());
        mdhd.extend_from_slice(&language_code(self.language).to_be_bytes());
        mdhd.extend_from_slice(&[0, 0]);

        let mut hdlr = vec![0u8; 4];
        hdlr.extend_from_slice(self.handler());
        hdlr.extend_from_slice(&[0u8; 12]);
        hdlr.extend_from_slice(b"SegmentHandler\0");

        let mut stsd = 1u32.to_be_bytes().to_vec();
        stsd.extend_from_slice(&self.sample_entry());
        let stbl = make_box(b"stbl", &full_box(b"stsd", 0, 0, &stsd));

        let mdia = [
            full_box(b"mdhd", 0, 0, &mdhd),
            full_box(b"hdlr", 0, 0, &hdlr),
            make_box(b"minf", &stbl),
        ]
        .concat();
        make_box(
            b"trak",
            &[full_box(b"tkhd", 0, 3, &tkhd), make_box(b"mdia", &mdia)].concat(),
        )
    }
}

/// ftyp + moov(mvhd, trak..., mvex(trex...))
pub fn init_segment(tracks: &[TrackSpec], default_duration: u32) -> Vec<u8> {
    let mut ftyp = b"cmfc".to_vec();
    ftyp.extend_from_slice(&0u32.to_be_bytes());
    ftyp.extend_from_slice(b"iso6cmfc");

    let mut moov = full_box(b"mvhd", 0, 0, &[0u8; 96]);
    let mut mvex = Vec::new();
    for track in tracks {
        moov.extend_from_slice(&track.trak());
        let mut trex = Vec::new();
        for v in [track.track_id, 1, default_duration, 0, 0] {
            trex.extend_from_slice(&v.to_be_bytes());
        }
        mvex.extend_from_slice(&full_box(b"trex", 0, 0, &trex));
    }
    moov.extend_from_slice(&make_box(b"mvex", &mvex));

    [make_box(b"ftyp", &ftyp), make_box(b"moov", &moov)].concat()
}

pub struct FragmentSpec {
    pub track_id: u32,
    pub decode_time: u64,
    pub sample_sizes: Vec<u32>,
    pub composition_offset: i32,
}

/// styp + moof(mfhd, traf...) + mdat holding the sample bytes
pub fn media_segment(fragments: &[FragmentSpec]) -> Vec<u8> {
    let mut moof = full_box(b"mfhd", 0, 0, &1u32.to_be_bytes());
    let mut mdat_len = 0usize;
    for fragment in fragments {
        let mut traf = full_box(b"tfhd", 0, 0x020000, &fragment.track_id.to_be_bytes());
        traf.extend_from_slice(&full_box(b"tfdt", 1, 0, &fragment.decode_time.to_be_bytes()));

        let mut trun = (fragment.sample_sizes.len() as u32).to_be_bytes().to_vec();
        for size in &fragment.sample_sizes {
            trun.extend_from_slice(&size.to_be_bytes());
            trun.extend_from_slice(&fragment.composition_offset.to_be_bytes());
            mdat_len += *size as usize;
        }
        traf.extend_from_slice(&full_box(b"trun", 1, 0x000A00, &trun));
        moof.extend_from_slice(&make_box(b"traf", &traf));
    }

    let mut styp = b"msdh".to_vec();
    styp.extend_from_slice(&0u32.to_be_bytes());
    styp.extend_from_slice(b"msdhmsix");
    [
        make_box(b"styp", &styp),
        make_box(b"moof", &moof),
        make_box(b"mdat", &vec![0xAB; mdat_len]),
    ]
    .concat()
}

/// Audio (track 1, eng) followed by video (track 2, 1280x720)
pub fn audio_video_tracks(video_duration: u32) -> Vec<TrackSpec> {
    vec![
        TrackSpec {
            track_id: 1,
            timescale: 48000,
            duration: 0,
            language: "eng",
            entry: Entry::Audio {
                channels: 2,
                sample_rate: 48000,
                object_type: 0x40,
            },
        },
        TrackSpec {
            track_id: 2,
            timescale: 90000,
            duration: video_duration,
            language: "und",
            entry: Entry::Video {
                fourcc: *b"avc1",
                width: 1280,
                height: 720,
            },
        },
    ]
}

pub fn audio_video_fragments() -> Vec<FragmentSpec> {
    vec![
        FragmentSpec {
            track_id: 1,
            decode_time: 0,
            sample_sizes: vec![300; 4],
            composition_offset: 0,
        },
        FragmentSpec {
            track_id: 2,
            decode_time: 90000,
            sample_sizes: vec![4000, 1000, 1000],
            composition_offset: 6000,
        },
    ]
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create segment file");
    file.write_all(bytes).expect("write segment file");
    path
}
