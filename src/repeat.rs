//! Auto-repeat for a held d-pad direction, as list-style widgets use it.
//!
//! Fed with the engine's events and polled once per frame. The first repeat
//! comes after `delay`, later ones every `interval`.

use crate::button::VirtualButton;
use crate::events::Event;
use std::time::{Duration, Instant};

pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(150);
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
struct Held {
    button: VirtualButton,
    since: Instant,
    repeated: bool,
}

#[derive(Debug, Clone)]
pub struct DirectionalRepeat {
    delay: Duration,
    interval: Duration,
    vertical: Option<Held>,
    horizontal: Option<Held>,
}

impl Default for DirectionalRepeat {
    fn default() -> Self {
        Self::new(DEFAULT_REPEAT_DELAY, DEFAULT_REPEAT_INTERVAL)
    }
}

impl DirectionalRepeat {
    pub fn new(delay: Duration, interval: Duration) -> Self {
        Self {
            delay,
            interval,
            vertical: None,
            horizontal: None,
        }
    }

    /// Track press/release of directional buttons; other buttons are ignored.
    pub fn on_event(&mut self, event: &Event, now: Instant) {
        let Some(slot) = self.slot_mut(event.button) else {
            return;
        };
        if event.pressed {
            // Opposite direction on the same axis replaces the held one.
            *slot = Some(Held {
                button: event.button,
                since: now,
                repeated: false,
            });
        } else if slot.is_some_and(|h| h.button == event.button) {
            *slot = None;
        }
    }

    /// Directions due for a repeat at `now`, vertical first.
    pub fn poll(&mut self, now: Instant) -> Vec<VirtualButton> {
        let (delay, interval) = (self.delay, self.interval);
        [&mut self.vertical, &mut self.horizontal]
            .into_iter()
            .filter_map(|slot| {
                let held = slot.as_mut()?;
                let threshold = if held.repeated { interval } else { delay };
                if now.saturating_duration_since(held.since) < threshold {
                    return None;
                }
                held.since = now;
                held.repeated = true;
                Some(held.button)
            })
            .collect()
    }

    pub fn is_held(&self, button: VirtualButton) -> bool {
        [self.vertical, self.horizontal]
            .iter()
            .flatten()
            .any(|h| h.button == button)
    }

    pub fn reset(&mut self) {
        self.vertical = None;
        self.horizontal = None;
    }

    fn slot_mut(&mut self, button: VirtualButton) -> Option<&mut Option<Held>> {
        match button {
            VirtualButton::Up | VirtualButton::Down => Some(&mut self.vertical),
            VirtualButton::Left | VirtualButton::Right => Some(&mut self.horizontal),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::Source;

    fn ms(origin: Instant, n: u64) -> Instant {
        origin + Duration::from_millis(n)
    }

    #[test]
    fn test_delay_then_interval() {
        let t0 = Instant::now();
        let mut repeat = DirectionalRepeat::default();
        repeat.on_event(&Event::press(VirtualButton::Down, Source::Keyboard, 0), t0);

        assert!(repeat.poll(ms(t0, 100)).is_empty());
        assert_eq!(repeat.poll(ms(t0, 150)), vec![VirtualButton::Down]);
        assert!(repeat.poll(ms(t0, 180)).is_empty());
        assert_eq!(repeat.poll(ms(t0, 200)), vec![VirtualButton::Down]);

        repeat.on_event(&Event::release(VirtualButton::Down, Source::Keyboard, 0), ms(t0, 210));
        assert!(repeat.poll(ms(t0, 400)).is_empty());
    }

    #[test]
    fn test_opposite_direction_replaces() {
        let t0 = Instant::now();
        let mut repeat = DirectionalRepeat::default();
        repeat.on_event(&Event::press(VirtualButton::Up, Source::Keyboard, 0), t0);
        repeat.on_event(&Event::press(VirtualButton::Down, Source::Keyboard, 0), ms(t0, 10));
        assert!(!repeat.is_held(VirtualButton::Up));

        // Releasing the replaced direction leaves the new one held.
        repeat.on_event(&Event::release(VirtualButton::Up, Source::Keyboard, 0), ms(t0, 20));
        assert!(repeat.is_held(VirtualButton::Down));
        assert_eq!(repeat.poll(ms(t0, 160)), vec![VirtualButton::Down]);
    }

    #[test]
    fn test_axes_repeat_independently() {
        let t0 = Instant::now();
        let mut repeat = DirectionalRepeat::default();
        repeat.on_event(&Event::press(VirtualButton::Left, Source::Keyboard, 0), t0);
        repeat.on_event(&Event::press(VirtualButton::Up, Source::Keyboard, 0), t0);
        repeat.on_event(&Event::press(VirtualButton::A, Source::Keyboard, 0), t0);

        assert_eq!(
            repeat.poll(ms(t0, 150)),
            vec![VirtualButton::Up, VirtualButton::Left]
        );
        repeat.reset();
        assert!(repeat.poll(ms(t0, 500)).is_empty());
    }
}
