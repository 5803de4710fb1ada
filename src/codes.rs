//! Key and absolute-axis code names, taken from `evdev`'s tables.
//!
//! Lookups accept either a symbolic name (`KEY_Q`, `BTN_SOUTH`, `ABS_X`) or a
//! plain number (`16`, `0x130`).

use crate::uinput::ABS_CNT;
use evdev::{AbsoluteAxisType, Key};

pub const KEY_MAX: u16 = 0x2ff;

/// Symbolic name for a key or button code, if the kernel headers define one.
pub fn key_name(code: u16) -> Option<String> {
    let name = format!("{:?}", Key::new(code));
    (name.starts_with("KEY_") || name.starts_with("BTN_")).then_some(name)
}

/// Symbolic name for an absolute axis code.
pub fn axis_name(code: u16) -> Option<String> {
    let name = format!("{:?}", AbsoluteAxisType(code));
    name.starts_with("ABS_").then_some(name)
}

pub fn key_code(name: &str) -> Option<u16> {
    parse_number(name)
        .filter(|code| *code <= KEY_MAX)
        .or_else(|| named_keys().find(|(_, n)| n == name).map(|(code, _)| code))
}

pub fn axis_code(name: &str) -> Option<u16> {
    parse_number(name)
        .filter(|code| usize::from(*code) < ABS_CNT)
        .or_else(|| named_axes().find(|(_, n)| n == name).map(|(code, _)| code))
}

/// Every named key and button code, in ascending order.
pub fn named_keys() -> impl Iterator<Item = (u16, String)> {
    (0..=KEY_MAX).filter_map(|code| key_name(code).map(|name| (code, name)))
}

/// Every named absolute axis code, in ascending order.
pub fn named_axes() -> impl Iterator<Item = (u16, String)> {
    (0..ABS_CNT as u16).filter_map(|code| axis_name(code).map(|name| (code, name)))
}

fn parse_number(s: &str) -> Option<u16> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uinput::record::SYN_REPORT;
    use crate::uinput::EventKind;
    use evdev::{EventType, Synchronization};

    #[test]
    fn names_round_trip() {
        assert_eq!(key_code("KEY_Q"), Some(Key::KEY_Q.code()));
        assert_eq!(key_name(Key::KEY_Q.code()).as_deref(), Some("KEY_Q"));
        assert_eq!(axis_code("ABS_X"), Some(AbsoluteAxisType::ABS_X.0));
        assert_eq!(axis_name(AbsoluteAxisType::ABS_HAT0Y.0).as_deref(), Some("ABS_HAT0Y"));
    }

    #[test]
    fn numbers_are_accepted() {
        assert_eq!(key_code("16"), Some(16));
        assert_eq!(key_code("0x130"), Some(0x130));
        assert_eq!(axis_code("0x10"), Some(0x10));
        assert_eq!(axis_code("64"), None);
        assert_eq!(key_code("KEY_DOES_NOT_EXIST"), None);
    }

    #[test]
    fn unnamed_codes_have_no_name() {
        assert_eq!(axis_name(0x0b), None);
        assert!(named_axes().all(|(code, _)| usize::from(code) < ABS_CNT));
    }

    #[test]
    fn event_numbering_matches_evdev() {
        assert_eq!(EventKind::Sync.raw(), EventType::SYNCHRONIZATION.0);
        assert_eq!(EventKind::Key.raw(), EventType::KEY.0);
        assert_eq!(EventKind::Absolute.raw(), EventType::ABSOLUTE.0);
        assert_eq!(SYN_REPORT, Synchronization::SYN_REPORT.0);
    }
}
