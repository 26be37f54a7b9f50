use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error};
use segprobe::config::{ProbeOptions, DEFAULT_STAGING_CAPACITY};
use segprobe::errors::{ConfigError, SegProbeError, SegProbeResult};
use segprobe::metadata::{probe_local_segments, render_json, render_text, ProbeResult};

/// Report the streams of an fMP4 initialization + media segment pair
#[derive(Parser, Debug)]
#[command(name = "segprobe", version, about)]
struct Options {
    /// Initialization segment (ftyp + moov)
    #[arg(long, value_name = "file")]
    init: Option<PathBuf>,

    /// Media segment (moof + mdat)
    #[arg(long, value_name = "file")]
    input: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Bytes handed to the demuxer per read callback
    #[arg(long, value_name = "bytes", default_value_t = DEFAULT_STAGING_CAPACITY)]
    staging_capacity: usize,

    /// Log every read callback (at trace level)
    #[arg(long)]
    log_callbacks: bool,

    /// Add a bit rate to video streams
    #[arg(long)]
    bitrate: bool,
}

fn run(options: &Options) -> SegProbeResult<ProbeResult> {
    let init = options
        .init
        .as_ref()
        .ok_or_else(|| ConfigError::new("Missing --init=file"))?;
    let input = options
        .input
        .as_ref()
        .ok_or_else(|| ConfigError::new("Missing --input=file"))?;

    let probe_options = ProbeOptions::default()
        .with_staging_capacity(options.staging_capacity)
        .with_callback_logging(options.log_callbacks)
        .with_bitrate(options.bitrate);
    debug!("{:?}", probe_options);

    probe_local_segments(init, input, &probe_options)
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let options = Options::parse();

    let result = match run(&options) {
        Ok(result) => result,
        Err(err) => {
            error!("{}", err);
            eprintln!("segprobe: {}", err);
            return match err {
                SegProbeError::Config(_) => ExitCode::from(2),
                SegProbeError::Input(_) | SegProbeError::Demux(_) => ExitCode::from(1),
            };
        }
    };

    if options.json {
        match render_json(&result) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("segprobe: cannot render JSON: {}", err);
                return ExitCode::from(1);
            }
        }
    } else {
        print!("{}", render_text(&result));
    }
    ExitCode::SUCCESS
}
