//! Serial port enumeration.
//!
//! Used to suggest candidate devices when the configured path cannot be
//! opened (the board's `usbmodem` suffix changes between USB sockets).

use serialport::SerialPortType;

use voice_capture_core::models::error::CaptureError;

/// A serial port visible to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub product: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

impl PortInfo {
    /// USB CDC ports are where the microcontroller shows up.
    pub fn is_usb(&self) -> bool {
        self.port_type == "USB"
    }
}

/// List available serial ports.
///
/// On macOS only `/dev/cu.*` (calling unit) devices are returned; the
/// matching `/dev/tty.*` nodes block on open waiting for carrier detect.
pub fn list_ports() -> Result<Vec<PortInfo>, CaptureError> {
    let ports = serialport::available_ports()
        .map_err(|e| CaptureError::DeviceIo(format!("failed to enumerate ports: {}", e)))?;

    Ok(ports
        .into_iter()
        .filter(|p| is_listed(&p.port_name))
        .map(|p| {
            let (port_type, product, vid, pid) = match p.port_type {
                SerialPortType::UsbPort(info) => ("USB".to_string(), info.product, Some(info.vid), Some(info.pid)),
                SerialPortType::BluetoothPort => ("Bluetooth".to_string(), None, None, None),
                SerialPortType::PciPort => ("PCI".to_string(), None, None, None),
                SerialPortType::Unknown => ("Unknown".to_string(), None, None, None),
            };
            PortInfo {
                port_name: p.port_name,
                port_type,
                product,
                vid,
                pid,
            }
        })
        .collect())
}

fn is_listed(port_name: &str) -> bool {
    if cfg!(target_os = "macos") {
        !port_name.starts_with("/dev/tty.")
    } else {
        true
    }
}

/// Ports ordered with USB devices first, as the likeliest capture targets.
pub fn rank_candidates(mut ports: Vec<PortInfo>) -> Vec<PortInfo> {
    ports.sort_by_key(|p| (!p.is_usb(), !p.port_name.contains("usbmodem"), p.port_name.clone()));
    ports
}
