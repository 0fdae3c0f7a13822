//! Physical code → virtual button tables and their JSON wire format.
//!
//! A mapping is built once at startup and never mutated afterwards; the
//! engine holds it behind an `Arc` so widgets may share it freely.

use crate::button::VirtualButton;
use crate::codes::{controller_button, keycode};
use crate::error::{InputError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Two buttons and a deadzone for one analog axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMapping {
    pub positive_button: VirtualButton,
    pub negative_button: VirtualButton,
    pub threshold: i16,
}

/// Which discrete table a lookup goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Keyboard,
    ControllerButton,
    ControllerHat,
    JoystickButton,
    JoystickHat,
}

/// The full set of mapping tables.
///
/// Field names are the JSON keys. Tables are ordered so `to_json` output is
/// stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputMapping {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub keyboard_map: BTreeMap<i32, VirtualButton>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub controller_button_map: BTreeMap<u8, VirtualButton>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub controller_hat_map: BTreeMap<u8, VirtualButton>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub joystick_axis_map: BTreeMap<u8, AxisMapping>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub joystick_button_map: BTreeMap<u8, VirtualButton>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub joystick_hat_map: BTreeMap<u8, VirtualButton>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for InputMapping {
    /// Built-in layout: a standard keyboard plus a generic SDL game controller.
    fn default() -> Self {
        use VirtualButton::*;

        let keyboard_map = BTreeMap::from([
            (keycode::UP, Up),
            (keycode::DOWN, Down),
            (keycode::LEFT, Left),
            (keycode::RIGHT, Right),
            (keycode::A, A),
            (keycode::B, B),
            (keycode::X, X),
            (keycode::Y, Y),
            (keycode::L, L1),
            (keycode::SEMICOLON, L2),
            (keycode::R, R1),
            (keycode::T, R2),
            (keycode::RETURN, Start),
            (keycode::SPACE, Select),
            (keycode::H, Menu),
        ]);

        // Face buttons follow the Nintendo layout: SDL's south button is B.
        let controller_button_map = BTreeMap::from([
            (controller_button::DPAD_UP, Up),
            (controller_button::DPAD_DOWN, Down),
            (controller_button::DPAD_LEFT, Left),
            (controller_button::DPAD_RIGHT, Right),
            (controller_button::A, B),
            (controller_button::B, A),
            (controller_button::X, Y),
            (controller_button::Y, X),
            (controller_button::LEFT_SHOULDER, L1),
            (controller_button::RIGHT_SHOULDER, R1),
            (controller_button::START, Start),
            (controller_button::BACK, Select),
            (controller_button::GUIDE, Menu),
        ]);

        Self {
            keyboard_map,
            controller_button_map,
            ..Self::empty()
        }
    }
}

impl InputMapping {
    /// A mapping with every table empty.
    pub fn empty() -> Self {
        Self {
            keyboard_map: BTreeMap::new(),
            controller_button_map: BTreeMap::new(),
            controller_hat_map: BTreeMap::new(),
            joystick_axis_map: BTreeMap::new(),
            joystick_button_map: BTreeMap::new(),
            joystick_hat_map: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyboard_map.is_empty()
            && self.controller_button_map.is_empty()
            && self.controller_hat_map.is_empty()
            && self.joystick_axis_map.is_empty()
            && self.joystick_button_map.is_empty()
            && self.joystick_hat_map.is_empty()
    }

    /// Parse the JSON wire format. Missing or null tables load as empty.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| InputError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&data)
    }

    /// Serialize to the same wire format `from_bytes` reads.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let data = self.to_json()?;
        std::fs::write(path, data).map_err(|source| InputError::IoError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Look up a discrete code. Codes outside a table's key range are simply
    /// not found.
    pub fn lookup(&self, kind: MapKind, code: i32) -> Option<VirtualButton> {
        let small = u8::try_from(code).ok();
        match kind {
            MapKind::Keyboard => self.keyboard_map.get(&code).copied(),
            MapKind::ControllerButton => small.and_then(|c| self.controller_button_map.get(&c).copied()),
            MapKind::ControllerHat => small.and_then(|c| self.controller_hat_map.get(&c).copied()),
            MapKind::JoystickButton => small.and_then(|c| self.joystick_button_map.get(&c).copied()),
            MapKind::JoystickHat => small.and_then(|c| self.joystick_hat_map.get(&c).copied()),
        }
    }

    pub fn lookup_axis(&self, axis: u8) -> Option<AxisMapping> {
        self.joystick_axis_map.get(&axis).copied()
    }

    /// Hat values resolve through the joystick table, then the controller table.
    pub fn lookup_hat(&self, value: u8) -> Option<VirtualButton> {
        self.joystick_hat_map
            .get(&value)
            .or_else(|| self.controller_hat_map.get(&value))
            .copied()
    }
}
