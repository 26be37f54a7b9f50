/*
# Demux Module

 Forward-only ISO-BMFF demuxer working on a [`PullStream`](crate::streams::PullStream).

 - `open()` reads top-level boxes until the `moov` box and builds one
   [`StreamHandle`] per `trak`, in `trak` order
 - `Session::probe_streams()` keeps reading `moof`/`mdat` pairs to find start
   times and durations
 - `Session::close()` gives the source back; nothing is read after it

 There is no seeking. Boxes the demuxer has no use for are read and discarded.
*/

mod session;
mod stream;

pub use session::{open, Session};
pub use stream::{StreamHandle, Timebase};
