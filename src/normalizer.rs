//! Turns one raw event into zero, one or two virtual button events.
//!
//! Keys and buttons map straight through. Analog axes and hat switches need
//! a little memory: axes are reduced to a direction with a deadzone, and a
//! hat that jumps between two directions in one report yields a release
//! followed by a press.

use crate::button::{Source, VirtualButton};
use crate::codes::{hat, hat_direction_name};
use crate::events::{Event, RawEvent};
use crate::mapping::{InputMapping, MapKind};
use std::collections::HashMap;
use tracing::debug;

/// Where an axis sits relative to its deadzone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisDirection {
    Negative,
    #[default]
    Centered,
    Positive,
}

impl AxisDirection {
    pub fn from_value(value: i16, threshold: i16) -> Self {
        // Widen so a threshold of i16::MIN cannot overflow on negation.
        let (value, threshold) = (i32::from(value), i32::from(threshold));
        if value > threshold {
            AxisDirection::Positive
        } else if value < -threshold {
            AxisDirection::Negative
        } else {
            AxisDirection::Centered
        }
    }
}

/// Result of normalizing one raw event.
///
/// `follow_up` is only set for a hat direction change: it is the press of the
/// new direction and must be delivered after `event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub event: Event,
    pub follow_up: Option<Event>,
}

impl From<Event> for Normalized {
    fn from(event: Event) -> Self {
        Self {
            event,
            follow_up: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Normalizer {
    axis_states: HashMap<u8, AxisDirection>,
    hat_states: HashMap<u8, u8>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn axis_direction(&self, axis: u8) -> AxisDirection {
        self.axis_states.get(&axis).copied().unwrap_or_default()
    }

    pub fn hat_value(&self, hat_index: u8) -> u8 {
        self.hat_states.get(&hat_index).copied().unwrap_or(hat::CENTERED)
    }

    /// Forget all axis and hat positions.
    pub fn reset(&mut self) {
        self.axis_states.clear();
        self.hat_states.clear();
    }

    pub fn normalize(&mut self, mapping: &InputMapping, raw: &RawEvent) -> Option<Normalized> {
        match *raw {
            RawEvent::KeyDown { keycode } => {
                discrete(mapping, MapKind::Keyboard, Source::Keyboard, keycode, true)
            }
            RawEvent::KeyUp { keycode } => {
                discrete(mapping, MapKind::Keyboard, Source::Keyboard, keycode, false)
            }
            RawEvent::ControllerButtonDown { button } => discrete(
                mapping,
                MapKind::ControllerButton,
                Source::Controller,
                i32::from(button),
                true,
            ),
            RawEvent::ControllerButtonUp { button } => discrete(
                mapping,
                MapKind::ControllerButton,
                Source::Controller,
                i32::from(button),
                false,
            ),
            RawEvent::JoyButtonDown { button } => discrete(
                mapping,
                MapKind::JoystickButton,
                Source::Joystick,
                i32::from(button),
                true,
            ),
            RawEvent::JoyButtonUp { button } => discrete(
                mapping,
                MapKind::JoystickButton,
                Source::Joystick,
                i32::from(button),
                false,
            ),
            RawEvent::ControllerAxisMotion { axis, value } => {
                self.axis(mapping, Source::Controller, axis, value)
            }
            RawEvent::JoyAxisMotion { axis, value } => {
                self.axis(mapping, Source::Joystick, axis, value)
            }
            RawEvent::JoyHatMotion { hat: index, value } => self.hat(mapping, index, value),
            RawEvent::Other => None,
        }
    }

    /// At most one event per sample. A direct flip from one side to the other
    /// reports only the release; the state still moves to the new side, so
    /// the matching press is not reported until the axis leaves and re-enters.
    fn axis(
        &mut self,
        mapping: &InputMapping,
        source: Source,
        axis: u8,
        value: i16,
    ) -> Option<Normalized> {
        let Some(config) = mapping.lookup_axis(axis) else {
            debug!(%source, axis, value, "axis not mapped");
            return None;
        };

        let previous = self.axis_direction(axis);
        let current = AxisDirection::from_value(value, config.threshold);
        if current == previous {
            return None;
        }
        self.axis_states.insert(axis, current);

        let raw_code = i32::from(axis);
        let (button, pressed) = match (previous, current) {
            (AxisDirection::Positive, _) => (config.positive_button, false),
            (AxisDirection::Negative, _) => (config.negative_button, false),
            (AxisDirection::Centered, AxisDirection::Positive) => (config.positive_button, true),
            (AxisDirection::Centered, AxisDirection::Negative) => (config.negative_button, true),
            (AxisDirection::Centered, AxisDirection::Centered) => return None,
        };
        if button == VirtualButton::Unassigned {
            return None;
        }

        debug!(
            %source,
            axis,
            value,
            threshold = config.threshold,
            virtual_button = %button,
            pressed,
            "axis crossed threshold"
        );
        Some(
            Event {
                button,
                pressed,
                source,
                raw_code,
            }
            .into(),
        )
    }

    fn hat(&mut self, mapping: &InputMapping, index: u8, value: u8) -> Option<Normalized> {
        let previous = self.hat_value(index);
        self.hat_states.insert(index, value);

        let lookup = |v: u8| mapping.lookup_hat(v).filter(|b| *b != VirtualButton::Unassigned);

        if previous != hat::CENTERED && previous != value {
            if let Some(released) = lookup(previous) {
                debug!(
                    hat = index,
                    direction = hat_direction_name(previous),
                    virtual_button = %released,
                    "hat released"
                );
                let follow_up = if value != hat::CENTERED {
                    lookup(value).map(|pressed| {
                        debug!(
                            hat = index,
                            direction = hat_direction_name(value),
                            virtual_button = %pressed,
                            "hat pressed (queued)"
                        );
                        Event::press(pressed, Source::HatSwitch, i32::from(value))
                    })
                } else {
                    None
                };
                return Some(Normalized {
                    event: Event::release(released, Source::HatSwitch, i32::from(previous)),
                    follow_up,
                });
            }
        }

        if value == hat::CENTERED || value == previous {
            return None;
        }
        match lookup(value) {
            Some(button) => {
                debug!(
                    hat = index,
                    direction = hat_direction_name(value),
                    virtual_button = %button,
                    "hat pressed"
                );
                Some(Event::press(button, Source::HatSwitch, i32::from(value)).into())
            }
            None => {
                debug!(hat = index, direction = hat_direction_name(value), value, "hat not mapped");
                None
            }
        }
    }
}

fn discrete(
    mapping: &InputMapping,
    kind: MapKind,
    source: Source,
    code: i32,
    pressed: bool,
) -> Option<Normalized> {
    match mapping.lookup(kind, code) {
        Some(button) if button != VirtualButton::Unassigned => {
            if pressed {
                debug!(%source, code, virtual_button = %button, "input mapped");
            }
            Some(
                Event {
                    button,
                    pressed,
                    source,
                    raw_code: code,
                }
                .into(),
            )
        }
        _ => {
            debug!(%source, code, "input not mapped");
            None
        }
    }
}
