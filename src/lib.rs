//! Input normalization and gesture detection for handheld-device UIs.
//!
//! - [`InputEngine`]: turns raw keyboard/controller/joystick events into
//!   [`Event`]s and reports chord/sequence gestures as [`ComboEvent`]s
//! - [`InputMapping`]: physical code → [`VirtualButton`] tables, JSON in and out
//! - [`EngineConfig`]: picks the active mapping (bytes, file, built-in)
//! - [`DirectionalRepeat`]: held d-pad auto-repeat for list-style widgets

pub mod button;
pub mod clock;
pub mod codes;
pub mod combo;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod mapping;
pub mod normalizer;
pub mod repeat;
#[cfg(feature = "sdl")]
pub mod sdl;

pub use button::{Source, VirtualButton};
pub use clock::{Clock, ManualClock, SystemClock};
pub use combo::{ChordOptions, ComboCallback, ComboDetector, SequenceOptions};
pub use config::{EngineConfig, MappingOrigin, ResolvedMapping, MAPPING_PATH_ENV};
pub use engine::InputEngine;
pub use error::{InputError, Result};
pub use events::{ComboEvent, ComboKind, Event, RawEvent};
pub use mapping::{AxisMapping, InputMapping, MapKind};
pub use normalizer::{AxisDirection, Normalized, Normalizer};
pub use repeat::DirectionalRepeat;
#[cfg(feature = "sdl")]
pub use sdl::{raw_event_from_sdl, ControllerHub};
