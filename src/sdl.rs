//! SDL2 backend: device discovery and event translation.

use crate::events::RawEvent;
use sdl2::controller::GameController;
use sdl2::event::Event;
use sdl2::joystick::Joystick;
use sdl2::{GameControllerSubsystem, JoystickSubsystem};
use tracing::{debug, error, info};

/// Translate an SDL event into the engine's raw event.
///
/// Keyboard events without a keycode and everything the engine has no use
/// for become [`RawEvent::Other`].
pub fn raw_event_from_sdl(event: &Event) -> RawEvent {
    match *event {
        Event::KeyDown {
            keycode: Some(keycode),
            ..
        } => RawEvent::KeyDown {
            keycode: keycode as i32,
        },
        Event::KeyUp {
            keycode: Some(keycode),
            ..
        } => RawEvent::KeyUp {
            keycode: keycode as i32,
        },
        Event::ControllerButtonDown { button, .. } => RawEvent::ControllerButtonDown {
            button: button as u8,
        },
        Event::ControllerButtonUp { button, .. } => RawEvent::ControllerButtonUp {
            button: button as u8,
        },
        Event::ControllerAxisMotion { axis, value, .. } => RawEvent::ControllerAxisMotion {
            axis: axis as u8,
            value,
        },
        Event::JoyButtonDown { button_idx, .. } => RawEvent::JoyButtonDown { button: button_idx },
        Event::JoyButtonUp { button_idx, .. } => RawEvent::JoyButtonUp { button: button_idx },
        Event::JoyAxisMotion {
            axis_idx, value, ..
        } => RawEvent::JoyAxisMotion {
            axis: axis_idx,
            value,
        },
        Event::JoyHatMotion { hat_idx, state, .. } => RawEvent::JoyHatMotion {
            hat: hat_idx,
            value: state.to_raw(),
        },
        _ => RawEvent::Other,
    }
}

/// Keeps every attached input device open for as long as it lives.
///
/// Devices SDL has a controller mapping for are opened as game controllers,
/// the rest as raw joysticks.
pub struct ControllerHub {
    controllers: Vec<GameController>,
    joysticks: Vec<Joystick>,
}

impl ControllerHub {
    pub fn open(
        controller_subsystem: &GameControllerSubsystem,
        joystick_subsystem: &JoystickSubsystem,
    ) -> Result<Self, String> {
        let available = controller_subsystem
            .num_joysticks()
            .map_err(|e| format!("can't enumerate joysticks: {}", e))?;
        debug!(joystick_count = available, "Detecting controllers");

        let mut controllers = Vec::new();
        let mut joysticks = Vec::new();

        for id in 0..available {
            if controller_subsystem.is_game_controller(id) {
                match controller_subsystem.open(id) {
                    Ok(c) => {
                        debug!(index = id, name = %c.name(), mapping = %c.mapping(), "Opened game controller");
                        controllers.push(c);
                    }
                    Err(e) => error!(index = id, error = ?e, "Failed to open game controller"),
                }
            } else {
                match joystick_subsystem.open(id) {
                    Ok(j) => {
                        debug!(index = id, name = %j.name(), "Opened raw joystick (not a standard game controller)");
                        joysticks.push(j);
                    }
                    Err(e) => debug!(index = id, error = ?e, "Failed to open raw joystick"),
                }
            }
        }

        info!(
            game_controllers = controllers.len(),
            raw_joysticks = joysticks.len(),
            total_joysticks = available,
            "Controller detection complete"
        );
        Ok(Self {
            controllers,
            joysticks,
        })
    }

    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }

    pub fn joystick_count(&self) -> usize {
        self.joysticks.len()
    }

    pub fn controller_names(&self) -> Vec<String> {
        self.controllers.iter().map(|c| c.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{controller_button, hat, keycode};
    use sdl2::controller::{Axis, Button};
    use sdl2::joystick::HatState;
    use sdl2::keyboard::{Keycode, Mod};

    #[test]
    fn test_keyboard_translation() {
        let event = Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(Keycode::Up),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat: false,
        };
        assert_eq!(
            raw_event_from_sdl(&event),
            RawEvent::KeyDown {
                keycode: keycode::UP
            }
        );
    }

    #[test]
    fn test_controller_translation() {
        let event = Event::ControllerButtonUp {
            timestamp: 0,
            which: 0,
            button: Button::Guide,
        };
        assert_eq!(
            raw_event_from_sdl(&event),
            RawEvent::ControllerButtonUp {
                button: controller_button::GUIDE
            }
        );

        let event = Event::ControllerAxisMotion {
            timestamp: 0,
            which: 0,
            axis: Axis::LeftY,
            value: -1200,
        };
        assert_eq!(
            raw_event_from_sdl(&event),
            RawEvent::ControllerAxisMotion { axis: 1, value: -1200 }
        );
    }

    #[test]
    fn test_hat_translation() {
        let event = Event::JoyHatMotion {
            timestamp: 0,
            which: 0,
            hat_idx: 1,
            state: HatState::LeftUp,
        };
        assert_eq!(
            raw_event_from_sdl(&event),
            RawEvent::JoyHatMotion {
                hat: 1,
                value: hat::LEFT_UP
            }
        );
        assert_eq!(raw_event_from_sdl(&Event::Quit { timestamp: 0 }), RawEvent::Other);
    }
}
