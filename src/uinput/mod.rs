pub mod file;
pub mod ioctl;
pub mod record;

#[cfg(test)]
pub(crate) mod fake;

pub use file::UinputFile;
pub use record::{
    AbsRange, DeviceConfigRecord, EventKind, EventRecord, InputId, ABS_CNT, AXIS_MAX, AXIS_MIN,
    UINPUT_MAX_NAME_SIZE,
};

use std::io;
use thiserror::Error;

pub const DEFAULT_UINPUT_PATH: &str = "/dev/uinput";

/// The control requests issued against an open uinput node.
///
/// Closing the node is tied to `Drop`, so an implementation releases the
/// underlying resource exactly once, however the owner goes away.
pub trait UinputNode {
    /// `UI_SET_EVBIT`: enable a whole event category.
    fn enable_event_type(&self, kind: EventKind) -> io::Result<()>;
    /// `UI_SET_KEYBIT`
    fn enable_key(&self, code: u16) -> io::Result<()>;
    /// `UI_SET_ABSBIT`
    fn enable_axis(&self, code: u16) -> io::Result<()>;
    /// A single `write(2)`; returns the number of bytes accepted.
    fn write_record(&self, bytes: &[u8]) -> io::Result<usize>;
    /// `UI_DEV_CREATE`
    fn create(&self) -> io::Result<()>;
    /// `UI_DEV_DESTROY`
    fn destroy(&self) -> io::Result<()>;
}

/// Failure while bringing a virtual device up. One variant per stage.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("cannot open uinput control node: {0}")]
    OpenFailed(#[source] io::Error),
    #[error("key event category rejected: {0}")]
    KeyCategoryFailed(#[source] io::Error),
    #[error("key code {code} rejected: {source}")]
    KeyCodeRejected {
        code: u16,
        #[source]
        source: io::Error,
    },
    #[error("absolute axis category rejected: {0}")]
    AxisCategoryFailed(#[source] io::Error),
    #[error("axis code {code} rejected: {source}")]
    AxisCodeRejected {
        code: u16,
        #[source]
        source: io::Error,
    },
    #[error("device configuration write failed: {0}")]
    ConfigWriteFailed(#[source] io::Error),
    #[error("device activation failed: {0}")]
    ActivationFailed(#[source] io::Error),
}

impl InitError {
    /// Stable stage name, suitable for log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            InitError::OpenFailed(_) => "open",
            InitError::KeyCategoryFailed(_) => "key-category",
            InitError::KeyCodeRejected { .. } => "key-code",
            InitError::AxisCategoryFailed(_) => "axis-category",
            InitError::AxisCodeRejected { .. } => "axis-code",
            InitError::ConfigWriteFailed(_) => "config-write",
            InitError::ActivationFailed(_) => "activation",
        }
    }
}

/// Failure writing an event after the device is live. Only reported under
/// [`ErrorPolicy::Strict`](crate::device::ErrorPolicy::Strict).
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write {kind} event (code {code}): {source}")]
    Write {
        kind: EventKind,
        code: u16,
        #[source]
        source: io::Error,
    },
    #[error("short event write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}
