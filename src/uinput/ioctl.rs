// uinput ioctl numbers computed from the Linux _IOC macro:
//   _IOC(dir, type, nr, size)
//   type = 'U' = 0x55
//   UI_SET_EVBIT   = _IOW('U', 100, int)
//   UI_SET_KEYBIT  = _IOW('U', 101, int)
//   UI_SET_ABSBIT  = _IOW('U', 103, int)
//   UI_DEV_CREATE  = _IO('U', 1)
//   UI_DEV_DESTROY = _IO('U', 2)
//
// _IOC_NONE = 0, _IOC_WRITE = 1
// _IOC(dir, type, nr, size) = (dir << 30) | (size << 16) | (type << 8) | nr

const IOC_NONE: u32 = 0;
const IOC_WRITE: u32 = 1;

const UINPUT_IOCTL_BASE: u32 = b'U' as u32;
const INT_SIZE: u32 = std::mem::size_of::<libc::c_int>() as u32;

const fn ioc(dir: u32, ty: u32, nr: u32, size: u32) -> libc::c_ulong {
    ((dir << 30) | (size << 16) | (ty << 8) | nr) as libc::c_ulong
}

pub const UI_DEV_CREATE: libc::c_ulong = ioc(IOC_NONE, UINPUT_IOCTL_BASE, 1, 0);
pub const UI_DEV_DESTROY: libc::c_ulong = ioc(IOC_NONE, UINPUT_IOCTL_BASE, 2, 0);
pub const UI_SET_EVBIT: libc::c_ulong = ioc(IOC_WRITE, UINPUT_IOCTL_BASE, 100, INT_SIZE);
pub const UI_SET_KEYBIT: libc::c_ulong = ioc(IOC_WRITE, UINPUT_IOCTL_BASE, 101, INT_SIZE);
pub const UI_SET_ABSBIT: libc::c_ulong = ioc(IOC_WRITE, UINPUT_IOCTL_BASE, 103, INT_SIZE);
