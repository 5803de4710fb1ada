//! Virtual device lifecycle: initialize, emit, sync, destroy.
//!
//! A [`VirtualDevice`] owns the open uinput node for its whole life. Every
//! early return during [`VirtualDevice::initialize_with`] drops the node, and
//! dropping the node closes it, so no failure path leaks the descriptor.
//! Teardown consumes the handle, which makes a second teardown impossible.
//!
//! Events are not synchronized implicitly: callers must follow a batch of
//! [`emit_key`](VirtualDevice::emit_key) / [`emit_axis`](VirtualDevice::emit_axis)
//! calls with [`sync`](VirtualDevice::sync), otherwise consumers never see the
//! batch.

use crate::uinput::record::BUS_USB;
use crate::uinput::{
    AbsRange, DeviceConfigRecord, EmitError, EventKind, EventRecord, InitError, InputId,
    UinputFile, UinputNode, ABS_CNT, DEFAULT_UINPUT_PATH,
};
use std::io;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

/// Identity written in [`IdentityMode::Legacy`] (Microsoft X-Box 360 pad).
pub const LEGACY_VENDOR_ID: u16 = 0x045e;
pub const LEGACY_PRODUCT_ID: u16 = 0x028e;
pub const DEVICE_VERSION: u16 = 1;

/// What to do when an event write fails after the device is live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Log and carry on. Individual dropped events are rarely actionable.
    #[default]
    BestEffort,
    /// Return an [`EmitError`] to the caller.
    Strict,
}

/// Where the vendor/product pair in the device record comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentityMode {
    /// Always write 0x045e/0x028e, ignoring the descriptor's values.
    /// Existing consumers match on this pair.
    #[default]
    Legacy,
    /// Use the descriptor's vendor and product ids.
    FromDescriptor,
}

#[derive(Clone, Debug)]
pub struct DeviceOptions {
    pub path: PathBuf,
    pub error_policy: ErrorPolicy,
    pub identity: IdentityMode,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_UINPUT_PATH),
            error_policy: ErrorPolicy::default(),
            identity: IdentityMode::default(),
        }
    }
}

impl DeviceOptions {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn with_identity(mut self, identity: IdentityMode) -> Self {
        self.identity = identity;
        self
    }
}

/// The declared shape of a virtual device. Consumed once by initialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub keys: Vec<u16>,
    pub axes: Vec<u16>,
    pub vendor: u16,
    pub product: u16,
}

impl CapabilityDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::new(),
            axes: Vec::new(),
            vendor: LEGACY_VENDOR_ID,
            product: LEGACY_PRODUCT_ID,
        }
    }

    pub fn with_keys(mut self, keys: impl IntoIterator<Item = u16>) -> Self {
        self.keys.extend(keys);
        self
    }

    pub fn with_axes(mut self, axes: impl IntoIterator<Item = u16>) -> Self {
        self.axes.extend(axes);
        self
    }

    pub fn with_identity(mut self, vendor: u16, product: u16) -> Self {
        self.vendor = vendor;
        self.product = product;
        self
    }

    fn input_id(&self, mode: IdentityMode) -> InputId {
        let (vendor, product) = match mode {
            IdentityMode::Legacy => {
                if (self.vendor, self.product) != (LEGACY_VENDOR_ID, LEGACY_PRODUCT_ID) {
                    warn!(
                        "ignoring requested identity {:04x}:{:04x}, writing legacy {:04x}:{:04x}",
                        self.vendor, self.product, LEGACY_VENDOR_ID, LEGACY_PRODUCT_ID
                    );
                }
                (LEGACY_VENDOR_ID, LEGACY_PRODUCT_ID)
            }
            IdentityMode::FromDescriptor => (self.vendor, self.product),
        };
        InputId {
            bustype: BUS_USB,
            vendor,
            product,
            version: DEVICE_VERSION,
        }
    }
}

/// A live, activated uinput device.
#[derive(Debug)]
pub struct VirtualDevice<N: UinputNode = UinputFile> {
    node: Option<N>,
    name: String,
    policy: ErrorPolicy,
}

impl VirtualDevice<UinputFile> {
    /// Create the device through the control node named in `options`.
    pub fn initialize(
        descriptor: &CapabilityDescriptor,
        options: DeviceOptions,
    ) -> Result<Self, InitError> {
        let path = options.path.clone();
        Self::initialize_with(|| UinputFile::open(&path), descriptor, options)
    }
}

impl<N: UinputNode> VirtualDevice<N> {
    /// Create the device on a node produced by `open`.
    ///
    /// Registration is fail-fast: the first rejected code is reported and the
    /// remaining codes are not attempted.
    pub fn initialize_with<F>(
        open: F,
        descriptor: &CapabilityDescriptor,
        options: DeviceOptions,
    ) -> Result<Self, InitError>
    where
        F: FnOnce() -> io::Result<N>,
    {
        let node = open().map_err(InitError::OpenFailed)?;

        let mut record =
            DeviceConfigRecord::new(&descriptor.name, descriptor.input_id(options.identity));

        if !descriptor.keys.is_empty() {
            node.enable_event_type(EventKind::Key)
                .map_err(InitError::KeyCategoryFailed)?;
        }
        for &code in &descriptor.keys {
            node.enable_key(code)
                .map_err(|source| InitError::KeyCodeRejected { code, source })?;
        }

        if !descriptor.axes.is_empty() {
            node.enable_event_type(EventKind::Absolute)
                .map_err(InitError::AxisCategoryFailed)?;
        }
        for &code in &descriptor.axes {
            // No slot in the record for it; don't let the kernel accept it either.
            record = record
                .with_axis(code, AbsRange::FIXED)
                .ok_or_else(|| axis_out_of_range(code))?;
            node.enable_axis(code)
                .map_err(|source| InitError::AxisCodeRejected { code, source })?;
        }

        let bytes = record.to_bytes();
        let written = node
            .write_record(&bytes)
            .map_err(InitError::ConfigWriteFailed)?;
        if written != bytes.len() {
            return Err(InitError::ConfigWriteFailed(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {written} of {} bytes", bytes.len()),
            )));
        }

        node.create().map_err(InitError::ActivationFailed)?;

        info!(
            "created virtual device \"{}\" ({} keys, {} axes)",
            descriptor.name,
            descriptor.keys.len(),
            descriptor.axes.len()
        );

        Ok(Self {
            node: Some(node),
            name: descriptor.name.clone(),
            policy: options.error_policy,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Write one key event. No sync is added.
    pub fn emit_key(&mut self, code: u16, value: i32) -> Result<(), EmitError> {
        self.emit(EventRecord::key(code, value))
    }

    /// Write one absolute-axis event. No sync is added.
    pub fn emit_axis(&mut self, code: u16, value: i32) -> Result<(), EmitError> {
        self.emit(EventRecord::absolute(code, value))
    }

    /// Mark the events written since the last sync as one complete report.
    pub fn sync(&mut self) -> Result<(), EmitError> {
        self.emit(EventRecord::sync_report())
    }

    /// Press every key in `codes`, then sync once.
    pub fn press_keys(&mut self, codes: &[u16]) -> Result<(), EmitError> {
        for &code in codes {
            self.emit_key(code, 1)?;
        }
        self.sync()
    }

    /// Release every key in `codes`, then sync once.
    pub fn release_keys(&mut self, codes: &[u16]) -> Result<(), EmitError> {
        for &code in codes {
            self.emit_key(code, 0)?;
        }
        self.sync()
    }

    /// Write `events` in order followed by a single sync.
    pub fn emit_report(&mut self, events: &[EventRecord]) -> Result<(), EmitError> {
        for event in events {
            self.emit(*event)?;
        }
        self.sync()
    }

    /// Deactivate the device and close the node.
    pub fn destroy(mut self) {
        self.teardown();
    }

    fn emit(&mut self, event: EventRecord) -> Result<(), EmitError> {
        let Some(node) = self.node.as_ref() else {
            return Ok(());
        };
        trace!(kind = %event.kind, code = event.code, value = event.value, "emit");

        let bytes = event.to_bytes();
        let result = match node.write_record(&bytes) {
            Ok(n) if n == bytes.len() => return Ok(()),
            Ok(n) => EmitError::ShortWrite {
                written: n,
                expected: bytes.len(),
            },
            Err(source) => EmitError::Write {
                kind: event.kind,
                code: event.code,
                source,
            },
        };

        match self.policy {
            ErrorPolicy::Strict => Err(result),
            ErrorPolicy::BestEffort => {
                debug!("dropping event on \"{}\": {}", self.name, result);
                Ok(())
            }
        }
    }

    fn teardown(&mut self) {
        if let Some(node) = self.node.take() {
            if let Err(e) = node.destroy() {
                warn!("failed to deactivate \"{}\": {}", self.name, e);
            }
            info!("destroyed virtual device \"{}\"", self.name);
        }
    }
}

fn axis_out_of_range(code: u16) -> InitError {
    InitError::AxisCodeRejected {
        code,
        source: io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("axis code must be below {ABS_CNT}"),
        ),
    }
}

impl<N: UinputNode> Drop for VirtualDevice<N> {
    fn drop(&mut self) {
        self.teardown();
    }
}
