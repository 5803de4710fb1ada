use crate::codes;
use crate::device::{CapabilityDescriptor, LEGACY_PRODUCT_ID, LEGACY_VENDOR_ID};
use evdev::{AbsoluteAxisType, Key};

pub const XBOX360_NAME: &str = "Microsoft X-Box 360 pad";
pub const KEYBOARD_NAME: &str = "vhid virtual keyboard";

pub const XBOX360_BUTTONS: [Key; 11] = [
    Key::BTN_START,
    Key::BTN_MODE,
    Key::BTN_SELECT,
    Key::BTN_SOUTH,
    Key::BTN_EAST,
    Key::BTN_NORTH,
    Key::BTN_WEST,
    Key::BTN_TL,
    Key::BTN_TR,
    Key::BTN_THUMBL,
    Key::BTN_THUMBR,
];

pub const XBOX360_AXES: [AbsoluteAxisType; 8] = [
    AbsoluteAxisType::ABS_X,
    AbsoluteAxisType::ABS_Y,
    AbsoluteAxisType::ABS_RX,
    AbsoluteAxisType::ABS_RY,
    AbsoluteAxisType::ABS_Z,
    AbsoluteAxisType::ABS_RZ,
    AbsoluteAxisType::ABS_HAT0X,
    AbsoluteAxisType::ABS_HAT0Y,
];

/// Two sticks, two triggers, a d-pad hat and eleven buttons. Every axis
/// reports over the driver's fixed range, triggers and hat included.
pub fn xbox360() -> CapabilityDescriptor {
    CapabilityDescriptor::new(XBOX360_NAME)
        .with_keys(XBOX360_BUTTONS.iter().map(|key| key.code()))
        .with_axes(XBOX360_AXES.iter().map(|axis| axis.0))
        .with_identity(LEGACY_VENDOR_ID, LEGACY_PRODUCT_ID)
}

/// A keyboard declaring every named `KEY_*` code. Buttons (`BTN_*`) are left
/// out so desktops don't classify the device as a pointer or joystick.
pub fn keyboard() -> CapabilityDescriptor {
    CapabilityDescriptor::new(KEYBOARD_NAME).with_keys(
        codes::named_keys()
            .filter(|(code, name)| *code != 0 && name.starts_with("KEY_"))
            .map(|(code, _)| code),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xbox360_shape() {
        let pad = xbox360();
        assert_eq!(pad.name, XBOX360_NAME);
        assert_eq!(pad.keys.len(), 11);
        assert_eq!(pad.axes.len(), 8);
        assert!(pad.keys.contains(&Key::BTN_SOUTH.code()));
        assert!(pad.axes.contains(&AbsoluteAxisType::ABS_HAT0Y.0));
        assert_eq!((pad.vendor, pad.product), (0x045e, 0x028e));
    }

    #[test]
    fn keyboard_has_letters_but_no_buttons() {
        let kbd = keyboard();
        assert!(kbd.axes.is_empty());
        assert!(kbd.keys.contains(&Key::KEY_Q.code()));
        assert!(kbd.keys.contains(&Key::KEY_ENTER.code()));
        assert!(!kbd.keys.contains(&Key::BTN_LEFT.code()));
        assert!(!kbd.keys.contains(&0));
    }
}
