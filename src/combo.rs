//! Chord and sequence detection over the normalized button stream.
//!
//! The detector keeps the latest transition per button and a short history
//! of presses. Every press re-evaluates all registered combos; every release
//! re-evaluates the chords that are currently held. Results go to a FIFO
//! drained once per frame, and the optional callbacks run synchronously on
//! the polling thread.

use crate::button::VirtualButton;
use crate::error::{InputError, Result};
use crate::events::{ComboEvent, ComboKind};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_CHORD_WINDOW: Duration = Duration::from_millis(100);
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(500);
/// Presses remembered for sequence matching; older ones are dropped.
pub const SEQUENCE_BUFFER_CAPACITY: usize = 20;

/// Invoked with the event that was just queued.
pub type ComboCallback = Box<dyn FnMut(&ComboEvent)>;

pub struct ChordOptions {
    /// Max spread between the first and last press. Zero means the default.
    pub window: Duration,
    pub on_trigger: Option<ComboCallback>,
    pub on_release: Option<ComboCallback>,
}

impl Default for ChordOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_CHORD_WINDOW,
            on_trigger: None,
            on_release: None,
        }
    }
}

impl ChordOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn on_trigger(mut self, callback: impl FnMut(&ComboEvent) + 'static) -> Self {
        self.on_trigger = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_release(mut self, callback: impl FnMut(&ComboEvent) + 'static) -> Self {
        self.on_release = Some(Box::new(callback));
        self
    }
}

pub struct SequenceOptions {
    /// Max gap between consecutive presses. Zero means the default.
    pub timeout: Duration,
    /// Reject the match if any other press happened within
    /// `timeout * len` before it.
    pub strict: bool,
    pub on_trigger: Option<ComboCallback>,
}

impl Default for SequenceOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_SEQUENCE_TIMEOUT,
            strict: false,
            on_trigger: None,
        }
    }
}

impl SequenceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub fn on_trigger(mut self, callback: impl FnMut(&ComboEvent) + 'static) -> Self {
        self.on_trigger = Some(Box::new(callback));
        self
    }
}

/// Latest transition of one button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub changed_at: Instant,
}

#[derive(Debug, Clone, Copy)]
struct SequenceEntry {
    button: VirtualButton,
    time: Instant,
}

enum ComboSpec {
    Chord(ChordOptions),
    Sequence(SequenceOptions),
}

struct RegisteredCombo {
    id: String,
    buttons: Vec<VirtualButton>,
    spec: ComboSpec,
    /// Chords only: fully held and waiting for a release.
    active: bool,
}

#[derive(Default)]
pub struct ComboDetector {
    button_states: HashMap<VirtualButton, ButtonState>,
    combos: Vec<RegisteredCombo>,
    sequence_buffer: VecDeque<SequenceEntry>,
    events: VecDeque<ComboEvent>,
}

impl ComboDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register buttons that must be held together.
    ///
    /// Fails with [`InputError::ValidationError`] for fewer than two buttons.
    /// An existing combo with the same id is replaced.
    pub fn register_chord(
        &mut self,
        id: impl Into<String>,
        buttons: &[VirtualButton],
        mut options: ChordOptions,
    ) -> Result<()> {
        let id = id.into();
        validate(&id, "chord", buttons)?;
        if options.window.is_zero() {
            options.window = DEFAULT_CHORD_WINDOW;
        }
        debug!(combo = %id, ?buttons, window_ms = options.window.as_millis() as u64, "chord registered");
        self.insert(RegisteredCombo {
            id,
            buttons: buttons.to_vec(),
            spec: ComboSpec::Chord(options),
            active: false,
        });
        Ok(())
    }

    /// Register buttons that must be pressed in order.
    ///
    /// Fails with [`InputError::ValidationError`] for fewer than two buttons.
    /// An existing combo with the same id is replaced.
    pub fn register_sequence(
        &mut self,
        id: impl Into<String>,
        buttons: &[VirtualButton],
        mut options: SequenceOptions,
    ) -> Result<()> {
        let id = id.into();
        validate(&id, "sequence", buttons)?;
        if options.timeout.is_zero() {
            options.timeout = DEFAULT_SEQUENCE_TIMEOUT;
        }
        debug!(
            combo = %id,
            ?buttons,
            timeout_ms = options.timeout.as_millis() as u64,
            strict = options.strict,
            "sequence registered"
        );
        self.insert(RegisteredCombo {
            id,
            buttons: buttons.to_vec(),
            spec: ComboSpec::Sequence(options),
            active: false,
        });
        Ok(())
    }

    fn insert(&mut self, combo: RegisteredCombo) {
        match self.combos.iter_mut().find(|c| c.id == combo.id) {
            Some(existing) => *existing = combo,
            None => self.combos.push(combo),
        }
    }

    /// Remove a combo. Unknown ids are ignored.
    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.combos.len();
        self.combos.retain(|c| c.id != id);
        before != self.combos.len()
    }

    /// Remove every combo and forget buffered presses, so nothing registered
    /// later can match against them.
    pub fn clear(&mut self) {
        self.combos.clear();
        self.sequence_buffer.clear();
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.combos.iter().any(|c| c.id == id)
    }

    pub fn combo_count(&self) -> usize {
        self.combos.len()
    }

    pub fn button_state(&self, button: VirtualButton) -> Option<ButtonState> {
        self.button_states.get(&button).copied()
    }

    pub fn is_pressed(&self, button: VirtualButton) -> bool {
        self.button_state(button).is_some_and(|s| s.pressed)
    }

    /// Pop the oldest queued combo event.
    pub fn next_event(&mut self) -> Option<ComboEvent> {
        self.events.pop_front()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Record a button transition and evaluate combos against it.
    pub fn record(&mut self, button: VirtualButton, pressed: bool, now: Instant) {
        self.button_states.insert(
            button,
            ButtonState {
                pressed,
                changed_at: now,
            },
        );

        if pressed {
            self.push_press(button, now);
            self.check_chords();
            self.check_sequences(now);
        } else {
            self.check_chord_releases();
        }
    }

    fn push_press(&mut self, button: VirtualButton, time: Instant) {
        if self.sequence_buffer.len() == SEQUENCE_BUFFER_CAPACITY {
            self.sequence_buffer.pop_front();
        }
        self.sequence_buffer.push_back(SequenceEntry { button, time });
    }

    fn check_chords(&mut self) {
        for combo in &mut self.combos {
            if combo.active {
                continue;
            }
            let ComboSpec::Chord(options) = &combo.spec else {
                continue;
            };
            let Some(spread) = chord_spread(&self.button_states, &combo.buttons) else {
                continue;
            };
            if spread > options.window {
                continue;
            }

            combo.active = true;
            let event = combo_event(&combo.id, &combo.buttons, ComboKind::Chord, true);
            debug!(combo = %combo.id, spread_ms = spread.as_millis() as u64, "chord triggered");
            if let ComboSpec::Chord(ChordOptions {
                on_trigger: Some(callback),
                ..
            }) = &mut combo.spec
            {
                callback(&event);
            }
            self.events.push_back(event);
        }
    }

    fn check_chord_releases(&mut self) {
        for combo in &mut self.combos {
            if !combo.active {
                continue;
            }
            let ComboSpec::Chord(options) = &mut combo.spec else {
                continue;
            };
            let held = combo
                .buttons
                .iter()
                .all(|b| self.button_states.get(b).is_some_and(|s| s.pressed));
            if held {
                continue;
            }

            combo.active = false;
            let event = combo_event(&combo.id, &combo.buttons, ComboKind::Chord, false);
            debug!(combo = %combo.id, "chord released");
            if let Some(callback) = options.on_release.as_mut() {
                callback(&event);
            }
            self.events.push_back(event);
        }
    }

    fn check_sequences(&mut self, now: Instant) {
        for combo in &mut self.combos {
            let ComboSpec::Sequence(options) = &mut combo.spec else {
                continue;
            };
            if !matches_sequence(&self.sequence_buffer, &combo.buttons, options, now) {
                continue;
            }

            let event = combo_event(&combo.id, &combo.buttons, ComboKind::Sequence, true);
            debug!(combo = %combo.id, "sequence triggered");
            if let Some(callback) = options.on_trigger.as_mut() {
                callback(&event);
            }
            self.events.push_back(event);
            // The presses that formed this match must not feed another one.
            self.sequence_buffer.clear();
        }
    }
}

fn combo_event(id: &str, buttons: &[VirtualButton], kind: ComboKind, triggered: bool) -> ComboEvent {
    ComboEvent {
        combo_id: id.to_owned(),
        kind,
        buttons: buttons.to_vec(),
        triggered,
    }
}

fn validate(id: &str, kind: &str, buttons: &[VirtualButton]) -> Result<()> {
    if buttons.len() < 2 {
        return Err(InputError::ValidationError(format!(
            "{kind} '{id}' requires at least 2 buttons, got {}",
            buttons.len()
        )));
    }
    Ok(())
}

/// Time between the earliest and latest press of a fully held chord, or
/// `None` if any of its buttons is up.
fn chord_spread(
    states: &HashMap<VirtualButton, ButtonState>,
    buttons: &[VirtualButton],
) -> Option<Duration> {
    let mut earliest: Option<Instant> = None;
    let mut latest: Option<Instant> = None;
    for button in buttons {
        let state = states.get(button).filter(|s| s.pressed)?;
        earliest = Some(earliest.map_or(state.changed_at, |t| t.min(state.changed_at)));
        latest = Some(latest.map_or(state.changed_at, |t| t.max(state.changed_at)));
    }
    Some(latest?.duration_since(earliest?))
}

fn matches_sequence(
    buffer: &VecDeque<SequenceEntry>,
    buttons: &[VirtualButton],
    options: &SequenceOptions,
    now: Instant,
) -> bool {
    let Some(start) = buffer.len().checked_sub(buttons.len()) else {
        return false;
    };

    let in_order = buffer
        .range(start..)
        .zip(buttons)
        .all(|(entry, button)| entry.button == *button);
    if !in_order {
        return false;
    }

    let within_timeout = buffer
        .range(start..)
        .zip(buffer.range(start + 1..))
        .all(|(prev, next)| next.time.duration_since(prev.time) <= options.timeout);
    if !within_timeout {
        return false;
    }

    if options.strict {
        let steps = u32::try_from(buttons.len()).unwrap_or(u32::MAX);
        let guard = options.timeout.saturating_mul(steps);
        if buffer
            .range(..start)
            .any(|entry| now.saturating_duration_since(entry.time) < guard)
        {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use VirtualButton::*;

    struct Timeline {
        origin: Instant,
    }

    impl Timeline {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
            }
        }

        fn at(&self, ms: u64) -> Instant {
            self.origin + Duration::from_millis(ms)
        }
    }

    fn drain(detector: &mut ComboDetector) -> Vec<ComboEvent> {
        std::iter::from_fn(|| detector.next_event()).collect()
    }

    #[test]
    fn test_registration_requires_two_buttons() {
        let mut detector = ComboDetector::new();
        let err = detector
            .register_chord("solo", &[A], ChordOptions::new())
            .unwrap_err();
        assert!(matches!(err, InputError::ValidationError(_)));
        assert!(detector
            .register_sequence("empty", &[], SequenceOptions::new())
            .is_err());
        assert_eq!(detector.combo_count(), 0);

        detector.register_chord("pair", &[A, B], ChordOptions::new()).unwrap();
        assert!(detector.is_registered("pair"));
        assert!(detector.unregister("pair"));
        assert!(!detector.is_registered("pair"));
        assert!(!detector.unregister("never-registered"));
    }

    #[test]
    fn test_chord_within_window_triggers() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector
            .register_chord("ab", &[A, B], ChordOptions::new().window(Duration::from_millis(100)))
            .unwrap();

        detector.record(A, true, t.at(0));
        assert_eq!(detector.pending_events(), 0);
        detector.record(B, true, t.at(50));

        let events = drain(&mut detector);
        assert_eq!(
            events,
            vec![ComboEvent {
                combo_id: "ab".into(),
                kind: ComboKind::Chord,
                buttons: vec![A, B],
                triggered: true,
            }]
        );
    }

    #[test]
    fn test_chord_outside_window_waits_for_fresh_press() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector.register_chord("ab", &[A, B], ChordOptions::new()).unwrap();

        detector.record(A, true, t.at(0));
        detector.record(B, true, t.at(150));
        assert!(drain(&mut detector).is_empty());

        // Holding both longer does not help; re-pressing A inside the window does.
        detector.record(A, false, t.at(200));
        assert!(drain(&mut detector).is_empty());
        detector.record(A, true, t.at(220));
        let events = drain(&mut detector);
        assert_eq!(events.len(), 1);
        assert!(events[0].triggered);
    }

    #[test]
    fn test_chord_release_and_retrigger() {
        let t = Timeline::new();
        let released = Rc::new(Cell::new(0));
        let triggered = Rc::new(Cell::new(0));
        let mut detector = ComboDetector::new();
        {
            let released = Rc::clone(&released);
            let triggered = Rc::clone(&triggered);
            detector
                .register_chord(
                    "shoulders",
                    &[L1, R1],
                    ChordOptions::new()
                        .on_trigger(move |_| triggered.set(triggered.get() + 1))
                        .on_release(move |e| {
                            assert!(!e.triggered);
                            released.set(released.get() + 1)
                        }),
                )
                .unwrap();
        }

        detector.record(L1, true, t.at(0));
        detector.record(R1, true, t.at(10));
        // Extra presses while held do not re-trigger.
        detector.record(A, true, t.at(20));
        detector.record(R1, true, t.at(30));
        assert_eq!(triggered.get(), 1);

        detector.record(L1, false, t.at(40));
        detector.record(R1, false, t.at(50));
        assert_eq!(released.get(), 1);

        let events = drain(&mut detector);
        assert_eq!(events.len(), 2);
        assert!(events[0].triggered);
        assert!(!events[1].triggered);

        detector.record(R1, true, t.at(500));
        detector.record(L1, true, t.at(520));
        assert_eq!(triggered.get(), 2);
        assert_eq!(drain(&mut detector).len(), 1);
    }

    #[test]
    fn test_sequence_triggers_and_clears_buffer() {
        let t = Timeline::new();
        let count = Rc::new(Cell::new(0));
        let mut detector = ComboDetector::new();
        {
            let count = Rc::clone(&count);
            detector
                .register_sequence(
                    "updown",
                    &[Up, Up, Down, Down],
                    SequenceOptions::new().on_trigger(move |_| count.set(count.get() + 1)),
                )
                .unwrap();
        }

        for (i, button) in [Up, Up, Down, Down].into_iter().enumerate() {
            detector.record(button, true, t.at(i as u64 * 100));
            detector.record(button, false, t.at(i as u64 * 100 + 50));
        }
        assert_eq!(count.get(), 1);
        assert!(detector.sequence_buffer.is_empty());

        // The same four presses again form an independent match.
        for (i, button) in [Up, Up, Down, Down].into_iter().enumerate() {
            detector.record(button, true, t.at(400 + i as u64 * 100));
        }
        assert_eq!(count.get(), 2);

        let events = drain(&mut detector);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == ComboKind::Sequence && e.triggered));
    }

    #[test]
    fn test_sequence_gap_too_long() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector
            .register_sequence("ab", &[A, B], SequenceOptions::new())
            .unwrap();

        detector.record(A, true, t.at(0));
        detector.record(B, true, t.at(501));
        assert!(drain(&mut detector).is_empty());

        detector.record(A, true, t.at(600));
        detector.record(B, true, t.at(1100));
        assert_eq!(drain(&mut detector).len(), 1);
    }

    #[test]
    fn test_sequence_wrong_order() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector
            .register_sequence("ab", &[A, B], SequenceOptions::new())
            .unwrap();

        detector.record(B, true, t.at(0));
        detector.record(A, true, t.at(100));
        assert!(drain(&mut detector).is_empty());
    }

    #[test]
    fn test_strict_sequence_rejects_stray_press() {
        let t = Timeline::new();
        let mut strict = ComboDetector::new();
        let mut lenient = ComboDetector::new();
        strict
            .register_sequence("seq", &[Up, Up, Down, Down], SequenceOptions::new().strict(true))
            .unwrap();
        lenient
            .register_sequence("seq", &[Up, Up, Down, Down], SequenceOptions::new())
            .unwrap();

        for detector in [&mut strict, &mut lenient] {
            detector.record(X, true, t.at(0));
            for (i, button) in [Up, Up, Down, Down].into_iter().enumerate() {
                detector.record(button, true, t.at(100 + i as u64 * 100));
            }
        }
        assert!(drain(&mut strict).is_empty());
        assert_eq!(drain(&mut lenient).len(), 1);
    }

    #[test]
    fn test_strict_sequence_ignores_old_presses() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector
            .register_sequence("seq", &[Up, Down], SequenceOptions::new().strict(true))
            .unwrap();

        detector.record(X, true, t.at(0));
        detector.record(Up, true, t.at(2000));
        detector.record(Down, true, t.at(2100));
        assert_eq!(drain(&mut detector).len(), 1);
    }

    #[test]
    fn test_clear_forgets_buffered_presses() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector.record(Up, true, t.at(0));
        detector.record(Up, true, t.at(100));

        detector.clear();
        detector
            .register_sequence("seq", &[Up, Up, Down, Down], SequenceOptions::new())
            .unwrap();
        detector.record(Down, true, t.at(200));
        detector.record(Down, true, t.at(300));
        assert!(drain(&mut detector).is_empty());
    }

    #[test]
    fn test_duplicate_id_replaces() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector.register_chord("combo", &[A, B], ChordOptions::new()).unwrap();
        detector
            .register_sequence("combo", &[X, Y], SequenceOptions::new())
            .unwrap();
        assert_eq!(detector.combo_count(), 1);

        detector.record(A, true, t.at(0));
        detector.record(B, true, t.at(10));
        assert!(drain(&mut detector).is_empty());

        detector.record(X, true, t.at(20));
        detector.record(Y, true, t.at(30));
        let events = drain(&mut detector);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ComboKind::Sequence);
    }

    #[test]
    fn test_zero_durations_use_defaults() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        detector
            .register_chord("ab", &[A, B], ChordOptions::new().window(Duration::ZERO))
            .unwrap();
        detector.record(A, true, t.at(0));
        detector.record(B, true, t.at(80));
        assert_eq!(drain(&mut detector).len(), 1);
    }

    #[test]
    fn test_sequence_buffer_is_bounded() {
        let t = Timeline::new();
        let mut detector = ComboDetector::new();
        for i in 0..(SEQUENCE_BUFFER_CAPACITY as u64 + 5) {
            detector.record(A, true, t.at(i));
        }
        assert_eq!(detector.sequence_buffer.len(), SEQUENCE_BUFFER_CAPACITY);
        assert!(detector.is_pressed(A));
        assert!(!detector.is_pressed(B));
    }
}
