//! The virtual button vocabulary every physical input is mapped onto.

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Abstract button, independent of the hardware that produced it.
///
/// Serialized as its ordinal, which is also the value used in mapping files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VirtualButton {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    X,
    Y,
    L1,
    L2,
    R1,
    R2,
    Start,
    Select,
    Menu,
    /// No button configured.
    Unassigned,
}

impl VirtualButton {
    /// Every button in ordinal order.
    pub const ALL: [VirtualButton; 16] = [
        VirtualButton::Up,
        VirtualButton::Down,
        VirtualButton::Left,
        VirtualButton::Right,
        VirtualButton::A,
        VirtualButton::B,
        VirtualButton::X,
        VirtualButton::Y,
        VirtualButton::L1,
        VirtualButton::L2,
        VirtualButton::R1,
        VirtualButton::R2,
        VirtualButton::Start,
        VirtualButton::Select,
        VirtualButton::Menu,
        VirtualButton::Unassigned,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            VirtualButton::Up => "Up",
            VirtualButton::Down => "Down",
            VirtualButton::Left => "Left",
            VirtualButton::Right => "Right",
            VirtualButton::A => "A",
            VirtualButton::B => "B",
            VirtualButton::X => "X",
            VirtualButton::Y => "Y",
            VirtualButton::L1 => "L1",
            VirtualButton::L2 => "L2",
            VirtualButton::R1 => "R1",
            VirtualButton::R2 => "R2",
            VirtualButton::Start => "Start",
            VirtualButton::Select => "Select",
            VirtualButton::Menu => "Menu",
            VirtualButton::Unassigned => "Unassigned",
        }
    }

    /// True for the four d-pad directions.
    pub fn is_directional(self) -> bool {
        matches!(
            self,
            VirtualButton::Up | VirtualButton::Down | VirtualButton::Left | VirtualButton::Right
        )
    }

    /// The direction on the same axis pointing the other way, if any.
    pub fn opposite(self) -> Option<VirtualButton> {
        match self {
            VirtualButton::Up => Some(VirtualButton::Down),
            VirtualButton::Down => Some(VirtualButton::Up),
            VirtualButton::Left => Some(VirtualButton::Right),
            VirtualButton::Right => Some(VirtualButton::Left),
            _ => None,
        }
    }
}

impl fmt::Display for VirtualButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for VirtualButton {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(InputError::UnknownButton(value))
    }
}

impl From<VirtualButton> for u8 {
    fn from(button: VirtualButton) -> Self {
        button.ordinal()
    }
}

/// Physical origin of an [`Event`](crate::Event). Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Keyboard,
    Controller,
    Joystick,
    HatSwitch,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Keyboard => "keyboard",
            Source::Controller => "controller",
            Source::Joystick => "joystick",
            Source::HatSwitch => "hat",
        };
        f.write_str(name)
    }
}
