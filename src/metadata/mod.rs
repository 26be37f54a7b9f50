mod describer;
mod probe;
mod report;
mod types;

pub use describer::{duration_ticks, StreamDescriber};
pub use probe::{probe_buffer, probe_local_segments, probe_segments, read_segment, run_session};
pub use report::{format_descriptor, render_json, render_text};

pub use types::*;
