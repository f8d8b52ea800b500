//! Record raw PCM bytes streamed by the board over USB serial.
//!
//! Runs until Ctrl-C, then leaves everything received in the raw file.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use voice_capture_core::{CancellationToken, CaptureConfiguration, CaptureError, CaptureSession};
use voice_capture_serial::device_enumerator::{list_ports, rank_candidates};
use voice_capture_serial::signal::cancel_on_ctrl_c;
use voice_capture_serial::{ConsoleProgress, SerialPortSource};

#[derive(Parser, Debug)]
#[command(name = "voice-capture", about = "Capture raw PCM from a serial device until Ctrl-C")]
struct Args {
    /// Serial device path (check `ls /dev/cu.usbmodem*`).
    #[arg(default_value = voice_capture_core::models::config::DEFAULT_DEVICE_PATH)]
    device: String,

    /// Line speed in baud.
    #[arg(short, long, default_value_t = voice_capture_core::models::config::DEFAULT_BAUD_RATE)]
    baud: u32,

    /// Raw capture output file.
    #[arg(short, long, default_value = voice_capture_core::models::config::DEFAULT_RAW_FILENAME)]
    output: PathBuf,

    /// List serial ports and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.list {
        return print_ports();
    }

    let mut config = CaptureConfiguration::default();
    config.serial.device_path = args.device;
    config.serial.baud_rate = args.baud;
    config.raw_path = args.output;

    match capture(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n[error] {}", e);
            if matches!(e, CaptureError::ConnectionFailed { .. }) {
                print_ports();
            }
            ExitCode::FAILURE
        }
    }
}

fn capture(config: CaptureConfiguration) -> Result<(), CaptureError> {
    let mut session = CaptureSession::new(config)?;
    let device_path = session.config().serial.device_path.clone();
    session.set_delegate(Arc::new(ConsoleProgress::new(std::io::stdout(), device_path)));

    let cancel = CancellationToken::new();
    let watcher = cancel_on_ctrl_c(cancel.clone())
        .map_err(|e| CaptureError::ConfigurationFailed(format!("cannot install Ctrl-C handler: {}", e)))?;

    let result = session.run(SerialPortSource::open, &cancel);

    cancel.cancel();
    let _ = watcher.join();

    result.map(|_| ())
}

fn print_ports() -> ExitCode {
    match list_ports() {
        Ok(ports) if ports.is_empty() => {
            eprintln!("No serial ports found.");
            ExitCode::FAILURE
        }
        Ok(ports) => {
            eprintln!("Available serial ports:");
            for port in rank_candidates(ports) {
                match port.product {
                    Some(product) => eprintln!("  {} ({}, {})", port.port_name, port.port_type, product),
                    None => eprintln!("  {} ({})", port.port_name, port.port_type),
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("[error] {}", e);
            ExitCode::FAILURE
        }
    }
}
