use super::ioctl::{UI_DEV_CREATE, UI_DEV_DESTROY, UI_SET_ABSBIT, UI_SET_EVBIT, UI_SET_KEYBIT};
use super::record::EventKind;
use super::UinputNode;
use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// An open `/dev/uinput` handle. The descriptor is closed when this is dropped.
#[derive(Debug)]
pub struct UinputFile {
    fd: OwnedFd,
}

impl UinputFile {
    /// Open the control node write-only and non-blocking.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;
        Ok(Self {
            fd: OwnedFd::from(file),
        })
    }

    fn ioctl_int(&self, request: libc::c_ulong, arg: libc::c_int) -> io::Result<()> {
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), request, arg) };
        if ret < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }

    fn ioctl_none(&self, request: libc::c_ulong) -> io::Result<()> {
        let ret = unsafe { libc::ioctl(self.fd.as_raw_fd(), request) };
        if ret < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(())
        }
    }
}

impl UinputNode for UinputFile {
    fn enable_event_type(&self, kind: EventKind) -> io::Result<()> {
        self.ioctl_int(UI_SET_EVBIT, libc::c_int::from(kind.raw()))
    }

    fn enable_key(&self, code: u16) -> io::Result<()> {
        self.ioctl_int(UI_SET_KEYBIT, libc::c_int::from(code))
    }

    fn enable_axis(&self, code: u16) -> io::Result<()> {
        self.ioctl_int(UI_SET_ABSBIT, libc::c_int::from(code))
    }

    fn write_record(&self, bytes: &[u8]) -> io::Result<usize> {
        let ret = unsafe {
            libc::write(
                self.fd.as_raw_fd(),
                bytes.as_ptr() as *const libc::c_void,
                bytes.len(),
            )
        };
        if ret < 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(ret as usize)
        }
    }

    fn create(&self) -> io::Result<()> {
        self.ioctl_none(UI_DEV_CREATE)
    }

    fn destroy(&self) -> io::Result<()> {
        self.ioctl_none(UI_DEV_DESTROY)
    }
}
