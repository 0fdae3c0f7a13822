//! The polling entry point a frame loop talks to.

use crate::button::VirtualButton;
use crate::clock::{Clock, SystemClock};
use crate::combo::{ChordOptions, ComboDetector, SequenceOptions};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::events::{ComboEvent, Event, RawEvent};
use crate::mapping::InputMapping;
use crate::normalizer::Normalizer;
use std::sync::Arc;
use tracing::debug;

/// Normalizer and combo detector behind two pull operations:
/// [`process_event`](Self::process_event) and
/// [`next_combo_event`](Self::next_combo_event).
///
/// Owned by whatever runs the frame loop. Everything happens synchronously on
/// that thread; combo callbacks run inside `process_event`.
pub struct InputEngine<C: Clock = SystemClock> {
    mapping: Arc<InputMapping>,
    normalizer: Normalizer,
    combos: ComboDetector,
    /// Press parked by a hat direction change, delivered before new input.
    pending: Option<Event>,
    clock: C,
}

impl InputEngine<SystemClock> {
    pub fn new(mapping: impl Into<Arc<InputMapping>>) -> Self {
        Self::with_clock(mapping, SystemClock)
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.resolve_mapping().mapping)
    }
}

impl Default for InputEngine<SystemClock> {
    fn default() -> Self {
        Self::new(InputMapping::default())
    }
}

impl<C: Clock> InputEngine<C> {
    pub fn with_clock(mapping: impl Into<Arc<InputMapping>>, clock: C) -> Self {
        Self {
            mapping: mapping.into(),
            normalizer: Normalizer::new(),
            combos: ComboDetector::new(),
            pending: None,
            clock,
        }
    }

    /// Shared, read-only view of the active mapping.
    pub fn mapping(&self) -> &Arc<InputMapping> {
        &self.mapping
    }

    /// Turn one raw event into the next virtual button event, if any.
    ///
    /// A press parked by an earlier hat direction change is returned first,
    /// and `raw` is then not processed at all. Call
    /// [`take_pending`](Self::take_pending) before feeding new input to avoid
    /// losing it.
    pub fn process_event(&mut self, raw: &RawEvent) -> Option<Event> {
        if let Some(event) = self.pending.take() {
            debug!(?raw, "queued event delivered ahead of raw input");
            return Some(event);
        }

        let normalized = self.normalizer.normalize(&self.mapping, raw)?;
        let now = self.clock.now();

        // Combo state sees the release before the press, same as the caller.
        self.combos
            .record(normalized.event.button, normalized.event.pressed, now);
        if let Some(follow_up) = normalized.follow_up {
            self.combos.record(follow_up.button, follow_up.pressed, now);
            self.pending = Some(follow_up);
        }

        Some(normalized.event)
    }

    /// Deliver the parked event without consuming new input.
    pub fn take_pending(&mut self) -> Option<Event> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_combo_event(&mut self) -> Option<ComboEvent> {
        self.combos.next_event()
    }

    pub fn register_chord(
        &mut self,
        id: impl Into<String>,
        buttons: &[VirtualButton],
        options: ChordOptions,
    ) -> Result<()> {
        self.combos.register_chord(id, buttons, options)
    }

    pub fn register_sequence(
        &mut self,
        id: impl Into<String>,
        buttons: &[VirtualButton],
        options: SequenceOptions,
    ) -> Result<()> {
        self.combos.register_sequence(id, buttons, options)
    }

    pub fn unregister_combo(&mut self, id: &str) {
        self.combos.unregister(id);
    }

    pub fn clear_combos(&mut self) {
        self.combos.clear();
    }

    pub fn is_combo_registered(&self, id: &str) -> bool {
        self.combos.is_registered(id)
    }

    /// Whether the button's latest event was a press.
    pub fn is_pressed(&self, button: VirtualButton) -> bool {
        self.combos.is_pressed(button)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
