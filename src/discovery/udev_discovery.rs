use super::{DeviceDiscovery, DeviceInfo, DiscoveryError};
use crate::uinput::record::kernel_name;
use std::ffi::OsStr;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

pub struct UdevDiscovery;

impl DeviceDiscovery for UdevDiscovery {
    fn find_by_name(name: &str) -> Result<Vec<DeviceInfo>, DiscoveryError> {
        let mut enumerator = udev::Enumerator::new().map_err(DiscoveryError::Udev)?;
        enumerator.match_subsystem("input").map_err(DiscoveryError::Udev)?;
        enumerator.match_sysname("event*").map_err(DiscoveryError::Udev)?;

        let mut results = Vec::new();

        for device in enumerator.scan_devices().map_err(DiscoveryError::Udev)? {
            // eventN nodes carry no name; it lives on the parent inputN device.
            let matches = device
                .parent()
                .and_then(|parent| {
                    parent
                        .attribute_value("name")
                        .map(|value| reported_name_matches(value, name))
                })
                .unwrap_or(false);
            if !matches {
                continue;
            }

            if let Some(devnode) = device.devnode() {
                results.push(DeviceInfo {
                    devnode: PathBuf::from(devnode),
                });
            }
        }

        if results.is_empty() {
            Err(DiscoveryError::NotFound(name.to_string()))
        } else {
            Ok(results)
        }
    }
}

/// The kernel only ever sees the NUL-cut, truncated name.
fn reported_name_matches(reported: &OsStr, requested: &str) -> bool {
    reported.as_bytes() == kernel_name(requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uinput::UINPUT_MAX_NAME_SIZE;

    #[test]
    fn matches_the_name_the_kernel_was_given() {
        assert!(reported_name_matches(OsStr::new("ab"), "ab\0cd"));
        assert!(!reported_name_matches(OsStr::new("ab\0cd"), "ab\0cd"));

        let long = "z".repeat(UINPUT_MAX_NAME_SIZE + 5);
        let reported = &long[..UINPUT_MAX_NAME_SIZE];
        assert!(reported_name_matches(OsStr::new(reported), &long));
        assert!(!reported_name_matches(OsStr::new(&long), &long));
    }
}
