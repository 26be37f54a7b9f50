pub mod r#box;
pub use r#box::{find_box, find_boxes, find_path, read_box_header, BoxHeader};
pub mod ftyp;
pub use ftyp::{detect_format_from_ftyp, parse_ftyp, FileType};
pub mod hdlr;
pub mod mdhd;
pub use mdhd::parse_mdhd;
pub mod moof;
pub use moof::{parse_moof, TrackFragment};
pub mod moov; // Track discovery from the initialization segment
pub use moov::{parse_moov, Movie, Track};
pub mod mvex;
pub use mvex::TrackExtends;
pub mod stsd;
pub use stsd::SampleEntry;
pub mod tkhd;
