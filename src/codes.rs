//! SDL2 numeric codes used by the built-in mapping and by log output.
//!
//! These are the values SDL reports on the wire, so mapping files written
//! against SDL stay valid here.

/// SDL keycodes (`SDL_Keycode`).
pub mod keycode {
    pub const RETURN: i32 = 13;
    pub const SPACE: i32 = 32;
    pub const SEMICOLON: i32 = 59;
    pub const A: i32 = 97;
    pub const B: i32 = 98;
    pub const H: i32 = 104;
    pub const L: i32 = 108;
    pub const R: i32 = 114;
    pub const T: i32 = 116;
    pub const X: i32 = 120;
    pub const Y: i32 = 121;
    pub const RIGHT: i32 = 0x4000_004F;
    pub const LEFT: i32 = 0x4000_0050;
    pub const DOWN: i32 = 0x4000_0051;
    pub const UP: i32 = 0x4000_0052;
}

/// SDL game controller buttons (`SDL_GameControllerButton`).
pub mod controller_button {
    pub const A: u8 = 0;
    pub const B: u8 = 1;
    pub const X: u8 = 2;
    pub const Y: u8 = 3;
    pub const BACK: u8 = 4;
    pub const GUIDE: u8 = 5;
    pub const START: u8 = 6;
    pub const LEFT_STICK: u8 = 7;
    pub const RIGHT_STICK: u8 = 8;
    pub const LEFT_SHOULDER: u8 = 9;
    pub const RIGHT_SHOULDER: u8 = 10;
    pub const DPAD_UP: u8 = 11;
    pub const DPAD_DOWN: u8 = 12;
    pub const DPAD_LEFT: u8 = 13;
    pub const DPAD_RIGHT: u8 = 14;
}

/// SDL hat positions (`SDL_HAT_*`), a bitmask of the four cardinal directions.
pub mod hat {
    pub const CENTERED: u8 = 0x00;
    pub const UP: u8 = 0x01;
    pub const RIGHT: u8 = 0x02;
    pub const DOWN: u8 = 0x04;
    pub const LEFT: u8 = 0x08;
    pub const RIGHT_UP: u8 = RIGHT | UP;
    pub const RIGHT_DOWN: u8 = RIGHT | DOWN;
    pub const LEFT_UP: u8 = LEFT | UP;
    pub const LEFT_DOWN: u8 = LEFT | DOWN;
}

pub fn hat_direction_name(value: u8) -> &'static str {
    match value {
        hat::CENTERED => "Hat Centered",
        hat::UP => "Hat Up",
        hat::DOWN => "Hat Down",
        hat::LEFT => "Hat Left",
        hat::RIGHT => "Hat Right",
        hat::LEFT_UP => "Hat Left Up",
        hat::LEFT_DOWN => "Hat Left Down",
        hat::RIGHT_UP => "Hat Right Up",
        hat::RIGHT_DOWN => "Hat Right Down",
        _ => "Hat Unknown",
    }
}
