//! Fixed-layout records written to the uinput node.
//!
//! Both records are serialized by hand in native byte order so that the exact
//! bytes handed to `write(2)` can be inspected in tests. Layouts follow
//! `struct uinput_user_dev` and `struct input_event` from `linux/uinput.h` and
//! `linux/input.h`.

use std::fmt;

pub const UINPUT_MAX_NAME_SIZE: usize = 80;
pub const ABS_CNT: usize = 0x40;

pub const BUS_USB: u16 = 0x03;

/// Every declared absolute axis reports values in `[AXIS_MIN, AXIS_MAX]`.
pub const AXIS_MIN: i32 = -32767;
pub const AXIS_MAX: i32 = 32767;

pub const SYN_REPORT: u16 = 0;

/// `name` + `input_id` + `ff_effects_max` + four `[i32; ABS_CNT]` tables.
pub const CONFIG_RECORD_SIZE: usize = UINPUT_MAX_NAME_SIZE + 8 + 4 + 4 * ABS_CNT * 4;

/// `timeval` + `type` + `code` + `value`.
pub const EVENT_RECORD_SIZE: usize = std::mem::size_of::<libc::timeval>() + 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputId {
    pub bustype: u16,
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AbsRange {
    pub min: i32,
    pub max: i32,
    pub fuzz: i32,
    pub flat: i32,
}

impl AbsRange {
    /// The only range this driver ever declares.
    pub const FIXED: AbsRange = AbsRange {
        min: AXIS_MIN,
        max: AXIS_MAX,
        fuzz: 0,
        flat: 0,
    };
}

/// The bytes of `name` the kernel will see: everything before the first NUL,
/// cut to at most [`UINPUT_MAX_NAME_SIZE`] bytes. A name of exactly that length
/// leaves the record's buffer without a terminator.
pub fn kernel_name(name: &str) -> &[u8] {
    let bytes = name.as_bytes();
    let end = bytes
        .iter()
        .position(|b| *b == 0)
        .unwrap_or(bytes.len())
        .min(UINPUT_MAX_NAME_SIZE);
    &bytes[..end]
}

/// Device description transmitted once before `UI_DEV_CREATE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceConfigRecord {
    name: [u8; UINPUT_MAX_NAME_SIZE],
    id: InputId,
    axes: [AbsRange; ABS_CNT],
}

impl DeviceConfigRecord {
    /// The name is stored as [`kernel_name`] returns it, zero padded.
    pub fn new(name: &str, id: InputId) -> Self {
        let mut buf = [0u8; UINPUT_MAX_NAME_SIZE];
        let bytes = kernel_name(name);
        buf[..bytes.len()].copy_from_slice(bytes);

        Self {
            name: buf,
            id,
            axes: [AbsRange::default(); ABS_CNT],
        }
    }

    /// Returns `None` when `code` has no slot in the record.
    pub fn with_axis(mut self, code: u16, range: AbsRange) -> Option<Self> {
        let slot = self.axes.get_mut(code as usize)?;
        *slot = range;
        Some(self)
    }

    pub fn name_bytes(&self) -> &[u8; UINPUT_MAX_NAME_SIZE] {
        &self.name
    }

    pub fn id(&self) -> InputId {
        self.id
    }

    pub fn axis(&self, code: u16) -> Option<AbsRange> {
        self.axes.get(code as usize).copied()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(CONFIG_RECORD_SIZE);
        out.extend_from_slice(&self.name);
        for field in [
            self.id.bustype,
            self.id.vendor,
            self.id.product,
            self.id.version,
        ] {
            out.extend_from_slice(&field.to_ne_bytes());
        }
        // ff_effects_max
        out.extend_from_slice(&0u32.to_ne_bytes());

        // Kernel order is absmax, absmin, absfuzz, absflat.
        let tables: [fn(&AbsRange) -> i32; 4] = [|r| r.max, |r| r.min, |r| r.fuzz, |r| r.flat];
        for pick in tables {
            for range in &self.axes {
                out.extend_from_slice(&pick(range).to_ne_bytes());
            }
        }
        out
    }

    #[cfg(test)]
    pub(crate) fn parse(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != CONFIG_RECORD_SIZE {
            return None;
        }
        let u16_at = |off: usize| u16::from_ne_bytes([bytes[off], bytes[off + 1]]);
        let i32_at = |off: usize| {
            i32::from_ne_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]])
        };

        let mut name = [0u8; UINPUT_MAX_NAME_SIZE];
        name.copy_from_slice(&bytes[..UINPUT_MAX_NAME_SIZE]);
        let id_off = UINPUT_MAX_NAME_SIZE;
        let id = InputId {
            bustype: u16_at(id_off),
            vendor: u16_at(id_off + 2),
            product: u16_at(id_off + 4),
            version: u16_at(id_off + 6),
        };

        let tables = id_off + 8 + 4;
        let table = |n: usize, code: usize| i32_at(tables + (n * ABS_CNT + code) * 4);
        let mut axes = [AbsRange::default(); ABS_CNT];
        for (code, range) in axes.iter_mut().enumerate() {
            *range = AbsRange {
                max: table(0, code),
                min: table(1, code),
                fuzz: table(2, code),
                flat: table(3, code),
            };
        }

        Some(Self { name, id, axes })
    }
}

/// Event category, using the kernel's `EV_*` numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Sync,
    Key,
    Absolute,
}

impl EventKind {
    pub const fn raw(self) -> u16 {
        match self {
            EventKind::Sync => 0x00,
            EventKind::Key => 0x01,
            EventKind::Absolute => 0x03,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Sync => write!(f, "sync"),
            EventKind::Key => write!(f, "key"),
            EventKind::Absolute => write!(f, "absolute axis"),
        }
    }
}

/// A single `input_event`. The timestamp is always zero; the kernel fills it in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl EventRecord {
    pub const fn key(code: u16, value: i32) -> Self {
        Self {
            kind: EventKind::Key,
            code,
            value,
        }
    }

    pub const fn absolute(code: u16, value: i32) -> Self {
        Self {
            kind: EventKind::Absolute,
            code,
            value,
        }
    }

    pub const fn sync_report() -> Self {
        Self {
            kind: EventKind::Sync,
            code: SYN_REPORT,
            value: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; EVENT_RECORD_SIZE] {
        let mut out = [0u8; EVENT_RECORD_SIZE];
        let off = EVENT_RECORD_SIZE - 8;
        out[off..off + 2].copy_from_slice(&self.kind.raw().to_ne_bytes());
        out[off + 2..off + 4].copy_from_slice(&self.code.to_ne_bytes());
        out[off + 4..].copy_from_slice(&self.value.to_ne_bytes());
        out
    }

    #[cfg(test)]
    pub(crate) fn parse(bytes: &[u8]) -> Option<Self> {
        let off = EVENT_RECORD_SIZE - 8;
        if bytes.len() != EVENT_RECORD_SIZE || bytes[..off].iter().any(|b| *b != 0) {
            return None;
        }
        let kind = match u16::from_ne_bytes([bytes[off], bytes[off + 1]]) {
            0x00 => EventKind::Sync,
            0x01 => EventKind::Key,
            0x03 => EventKind::Absolute,
            _ => return None,
        };
        Some(Self {
            kind,
            code: u16::from_ne_bytes([bytes[off + 2], bytes[off + 3]]),
            value: i32::from_ne_bytes([
                bytes[off + 4],
                bytes[off + 5],
                bytes[off + 6],
                bytes[off + 7],
            ]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: InputId = InputId {
        bustype: BUS_USB,
        vendor: 0x1234,
        product: 0x5678,
        version: 1,
    };

    #[test]
    fn config_record_has_kernel_size() {
        assert_eq!(CONFIG_RECORD_SIZE, 1116);
        assert_eq!(DeviceConfigRecord::new("pad", ID).to_bytes().len(), 1116);
    }

    #[test]
    fn identity_follows_name_buffer() {
        let bytes = DeviceConfigRecord::new("pad", ID).to_bytes();
        assert_eq!(&bytes[..3], b"pad");
        assert!(bytes[3..UINPUT_MAX_NAME_SIZE].iter().all(|b| *b == 0));
        assert_eq!(&bytes[80..82], &BUS_USB.to_ne_bytes());
        assert_eq!(&bytes[82..84], &0x1234u16.to_ne_bytes());
        assert_eq!(&bytes[84..86], &0x5678u16.to_ne_bytes());
        assert_eq!(&bytes[86..88], &1u16.to_ne_bytes());
        assert_eq!(&bytes[88..92], &[0, 0, 0, 0]);
    }

    #[test]
    fn axis_tables_are_max_min_fuzz_flat() {
        let record = DeviceConfigRecord::new("pad", ID)
            .with_axis(2, AbsRange::FIXED)
            .unwrap();
        let bytes = record.to_bytes();
        let at = |table: usize, code: usize| {
            let off = 92 + (table * ABS_CNT + code) * 4;
            i32::from_ne_bytes(bytes[off..off + 4].try_into().unwrap())
        };
        assert_eq!(at(0, 2), AXIS_MAX);
        assert_eq!(at(1, 2), AXIS_MIN);
        assert_eq!(at(2, 2), 0);
        assert_eq!(at(3, 2), 0);
        assert_eq!(at(0, 1), 0);
        assert_eq!(at(1, 3), 0);
    }

    #[test]
    fn axis_outside_record_is_refused() {
        assert!(DeviceConfigRecord::new("pad", ID)
            .with_axis(ABS_CNT as u16, AbsRange::FIXED)
            .is_none());
    }

    #[test]
    fn event_timestamp_is_zero() {
        let bytes = EventRecord::absolute(0x01, -500).to_bytes();
        let off = EVENT_RECORD_SIZE - 8;
        assert!(bytes[..off].iter().all(|b| *b == 0));
        assert_eq!(&bytes[off..off + 2], &3u16.to_ne_bytes());
        assert_eq!(&bytes[off + 2..off + 4], &1u16.to_ne_bytes());
        assert_eq!(&bytes[off + 4..], &(-500i32).to_ne_bytes());
    }
}
