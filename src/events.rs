use crate::button::{Source, VirtualButton};

/// Raw platform input, shaped after the SDL2 events the engine understands.
///
/// Codes are the platform's own numbers: SDL keycodes for keys, SDL game
/// controller button/axis enums, raw joystick indices and SDL hat bitmasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    KeyDown { keycode: i32 },
    KeyUp { keycode: i32 },
    ControllerButtonDown { button: u8 },
    ControllerButtonUp { button: u8 },
    ControllerAxisMotion { axis: u8, value: i16 },
    JoyButtonDown { button: u8 },
    JoyButtonUp { button: u8 },
    JoyAxisMotion { axis: u8, value: i16 },
    JoyHatMotion { hat: u8, value: u8 },
    /// Anything the engine does not consume (quit, window, mouse...).
    Other,
}

/// A normalized press or release of a virtual button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub button: VirtualButton,
    pub pressed: bool,
    pub source: Source,
    pub raw_code: i32,
}

impl Event {
    pub fn press(button: VirtualButton, source: Source, raw_code: i32) -> Self {
        Self {
            button,
            pressed: true,
            source,
            raw_code,
        }
    }

    pub fn release(button: VirtualButton, source: Source, raw_code: i32) -> Self {
        Self {
            button,
            pressed: false,
            source,
            raw_code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComboKind {
    /// Buttons held together
    Chord,
    /// Buttons pressed in order
    Sequence,
}

/// Emitted when a registered combo triggers, or when a held chord is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboEvent {
    pub combo_id: String,
    pub kind: ComboKind,
    pub buttons: Vec<VirtualButton>,
    /// false only for chord releases
    pub triggered: bool,
}
