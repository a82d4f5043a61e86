//! Clock-injected debounce and long-press detection.
//!
//! # Responsibility
//! - Coalesce bursts of input into the latest value after a quiet interval.
//! - Detect press-and-hold gestures on list rows.
//!
//! # Invariants
//! - No internal clock: every operation takes `now`.
//! - A debouncer holds at most one pending value.
//! - A long-press fires at most once per gesture.

use std::time::{Duration, Instant};

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);
pub const DEFAULT_LONG_PRESS_DELAY: Duration = Duration::from_millis(600);
pub const DEFAULT_LONG_PRESS_TOLERANCE_PX: f64 = 12.0;

/// Trailing-edge debouncer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    interval: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replaces any pending value and restarts the quiet interval.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.interval));
    }

    /// Takes the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(_, deadline)| now >= *deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    /// Drops the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPressConfig {
    pub delay: Duration,
    /// Movement allowed on either axis before the gesture is abandoned.
    pub tolerance_px: f64,
}

impl Default for LongPressConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_LONG_PRESS_DELAY,
            tolerance_px: DEFAULT_LONG_PRESS_TOLERANCE_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer-down on a row.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerPress {
    pub pointer_id: u32,
    pub button: PointerButton,
    pub x: f64,
    pub y: f64,
    pub row_id: String,
}

#[derive(Debug, Clone)]
struct ArmedPress {
    pointer_id: u32,
    origin: (f64, f64),
    row_id: String,
    deadline: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct LongPressWatch {
    config: LongPressConfig,
    armed: Option<ArmedPress>,
}

impl LongPressWatch {
    pub fn new(config: LongPressConfig) -> Self {
        Self {
            config,
            armed: None,
        }
    }

    /// Arms on primary-button presses. Any earlier gesture is abandoned.
    pub fn press(&mut self, press: PointerPress, now: Instant) {
        if press.button != PointerButton::Primary {
            self.armed = None;
            return;
        }
        self.armed = Some(ArmedPress {
            pointer_id: press.pointer_id,
            origin: (press.x, press.y),
            row_id: press.row_id,
            deadline: now + self.config.delay,
        });
    }

    /// Cancels when the tracked pointer leaves the tolerance box.
    pub fn move_to(&mut self, pointer_id: u32, x: f64, y: f64) {
        let Some(armed) = &self.armed else {
            return;
        };
        if armed.pointer_id != pointer_id {
            return;
        }
        let (origin_x, origin_y) = armed.origin;
        let tolerance = self.config.tolerance_px;
        if (x - origin_x).abs() > tolerance || (y - origin_y).abs() > tolerance {
            self.armed = None;
        }
    }

    pub fn release(&mut self, pointer_id: u32) {
        if self
            .armed
            .as_ref()
            .is_some_and(|armed| armed.pointer_id == pointer_id)
        {
            self.armed = None;
        }
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Returns the pressed row once the hold delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self
            .armed
            .as_ref()
            .is_some_and(|armed| now >= armed.deadline);
        if !due {
            return None;
        }
        self.armed.take().map(|armed| armed.row_id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Debouncer, LongPressConfig, LongPressWatch, PointerButton, PointerPress};
    use std::time::{Duration, Instant};

    fn press(pointer_id: u32, button: PointerButton) -> PointerPress {
        PointerPress {
            pointer_id,
            button,
            x: 100.0,
            y: 40.0,
            row_id: "w_1".to_string(),
        }
    }

    #[test]
    fn debouncer_yields_latest_value_after_quiet_interval() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));

        debouncer.schedule("h", start);
        debouncer.schedule("ho", start + Duration::from_millis(150));
        assert_eq!(debouncer.poll(start + Duration::from_millis(300)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(350)),
            Some("ho")
        );
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn debouncer_cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(1, start);
        assert_eq!(debouncer.cancel(), Some(1));
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn long_press_fires_once() {
        let start = Instant::now();
        let mut watch = LongPressWatch::new(LongPressConfig::default());
        watch.press(press(1, PointerButton::Primary), start);

        assert_eq!(watch.poll(start + Duration::from_millis(599)), None);
        assert_eq!(
            watch.poll(start + Duration::from_millis(600)).as_deref(),
            Some("w_1")
        );
        assert_eq!(watch.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn long_press_cancelled_by_movement_or_release() {
        let start = Instant::now();
        let late = start + Duration::from_secs(1);
        let mut watch = LongPressWatch::default();

        watch.press(press(1, PointerButton::Primary), start);
        watch.move_to(1, 111.0, 51.0);
        assert!(watch.is_armed());
        watch.move_to(1, 100.0, 52.5);
        assert_eq!(watch.poll(late), None);

        watch.press(press(1, PointerButton::Primary), start);
        watch.release(1);
        assert_eq!(watch.poll(late), None);
    }

    #[test]
    fn long_press_ignores_other_pointers_and_buttons() {
        let start = Instant::now();
        let mut watch = LongPressWatch::default();

        watch.press(press(1, PointerButton::Secondary), start);
        assert!(!watch.is_armed());

        watch.press(press(1, PointerButton::Primary), start);
        watch.move_to(2, 500.0, 500.0);
        watch.release(2);
        assert!(watch.poll(start + Duration::from_millis(700)).is_some());
    }
}
