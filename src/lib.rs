//! vhid: a small virtual input device driver on top of Linux uinput.
//!
//! A process declares which key and absolute-axis codes its device supports,
//! creates it, and then writes key/axis events followed by explicit sync
//! reports. Everything is synchronous and single-device.
//!
//! ```no_run
//! use vhid::{CapabilityDescriptor, DeviceOptions, VirtualDevice};
//!
//! let descriptor = CapabilityDescriptor::new("my pad")
//!     .with_keys([0x130])
//!     .with_axes([0x00, 0x01]);
//! let mut pad = VirtualDevice::initialize(&descriptor, DeviceOptions::default())?;
//! pad.emit_axis(0x00, 12000)?;
//! pad.emit_key(0x130, 1)?;
//! pad.sync()?;
//! pad.destroy();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(target_os = "linux")]
pub mod codes;
#[cfg(target_os = "linux")]
pub mod device;
#[cfg(target_os = "linux")]
pub mod discovery;
#[cfg(target_os = "linux")]
pub mod presets;
#[cfg(target_os = "linux")]
pub mod uinput;

#[cfg(target_os = "linux")]
pub use device::{CapabilityDescriptor, DeviceOptions, ErrorPolicy, IdentityMode, VirtualDevice};
#[cfg(target_os = "linux")]
pub use uinput::{EmitError, EventKind, EventRecord, InitError};
