pub mod udev_discovery;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub devnode: PathBuf,
}

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("udev error: {0}")]
    Udev(#[source] io::Error),
    #[error("no input device named \"{0}\"")]
    NotFound(String),
}

pub trait DeviceDiscovery {
    /// Event nodes (`/dev/input/eventN`) of every input device called `name`.
    fn find_by_name(name: &str) -> Result<Vec<DeviceInfo>, DiscoveryError>;
}
