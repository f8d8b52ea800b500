//! Wrap a raw capture in a 16 kHz mono 16-bit WAV container.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use voice_capture_core::models::config::{DEFAULT_RAW_FILENAME, DEFAULT_WAV_FILENAME};
use voice_capture_core::{convert, AlignmentPolicy, CaptureConfiguration, CaptureError};

#[derive(Parser, Debug)]
#[command(name = "voice-convert", about = "Convert a raw PCM capture to WAV")]
struct Args {
    /// Raw capture to read.
    #[arg(short, long, default_value = DEFAULT_RAW_FILENAME)]
    input: PathBuf,

    /// WAV file to write.
    #[arg(short, long, default_value = DEFAULT_WAV_FILENAME)]
    output: PathBuf,

    /// Refuse input that ends in a partial sample.
    #[arg(long)]
    strict: bool,

    /// Also write a `.metadata.json` sidecar.
    #[arg(long)]
    metadata: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let config = CaptureConfiguration {
        raw_path: args.input,
        wav_path: args.output,
        alignment: if args.strict { AlignmentPolicy::Reject } else { AlignmentPolicy::Warn },
        write_metadata: args.metadata,
        ..Default::default()
    };

    match convert(&config) {
        Ok(result) => {
            println!("Conversion complete: {}", result.wav_path.display());
            ExitCode::SUCCESS
        }
        Err(CaptureError::InputNotFound(path)) => {
            eprintln!("error: {} not found", path.display());
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
