//! Secret gestures that open the game from the start screen
//!
//! Two ways in: type the secret code, or keep a press held for the configured
//! duration. Terminals that do not report key releases only send repeated
//! presses while a key is held, so a keyboard hold is treated as released
//! once repeats stop arriving.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default gap after which a silent key counts as released
pub const KEY_REPEAT_GAP: Duration = Duration::from_millis(600);

/// Rolling buffer of typed characters matched against the secret code
#[derive(Debug, Clone)]
pub struct SecretCode {
    code: Vec<char>,
    typed: VecDeque<char>,
}

impl SecretCode {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.trim().to_uppercase().chars().collect(),
            typed: VecDeque::new(),
        }
    }

    /// Feed one character; true once the last typed characters spell the code
    pub fn push(&mut self, c: char) -> bool {
        self.typed.extend(c.to_uppercase());
        while self.typed.len() > self.code.len() {
            self.typed.pop_front();
        }
        let matched = !self.code.is_empty() && self.typed.iter().eq(self.code.iter());
        if matched {
            self.typed.clear();
        }
        matched
    }

    pub fn erase(&mut self) {
        self.typed.pop_back();
    }

    pub fn typed_len(&self) -> usize {
        self.typed.len()
    }

    pub fn code_len(&self) -> usize {
        self.code.len()
    }

    pub fn clear(&mut self) {
        self.typed.clear();
    }
}

/// Press-and-hold detector
#[derive(Debug, Clone)]
pub struct LongPress {
    duration: Duration,
    /// Set for sources without release events
    repeat_gap: Option<Duration>,
    pressed_at: Option<Instant>,
    last_seen: Option<Instant>,
}

impl LongPress {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            repeat_gap: None,
            pressed_at: None,
            last_seen: None,
        }
    }

    /// Treat the press as released when no repeat arrives within `gap`
    pub fn with_repeat_gap(mut self, gap: Duration) -> Self {
        self.repeat_gap = Some(gap);
        self
    }

    /// Press or key repeat
    pub fn hold(&mut self, now: Instant) {
        if self.is_stale(now) {
            self.release();
        }
        self.pressed_at.get_or_insert(now);
        self.last_seen = Some(now);
    }

    pub fn release(&mut self) {
        self.pressed_at = None;
        self.last_seen = None;
    }

    /// True once, when the press has been held long enough
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.is_stale(now) {
            self.release();
            return false;
        }
        match self.pressed_at {
            Some(at) if now.saturating_duration_since(at) >= self.duration => {
                self.release();
                true
            }
            _ => false,
        }
    }

    /// Fraction of the hold completed, for the progress bar
    pub fn progress(&self, now: Instant) -> f64 {
        match self.pressed_at {
            Some(at) if !self.duration.is_zero() => {
                (now.saturating_duration_since(at).as_secs_f64() / self.duration.as_secs_f64())
                    .min(1.0)
            }
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    fn is_stale(&self, now: Instant) -> bool {
        match (self.repeat_gap, self.last_seen) {
            (Some(gap), Some(seen)) => now.saturating_duration_since(seen) > gap,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_case_insensitive() {
        let mut secret = SecretCode::new("NIRD");
        assert!(!secret.push('n'));
        assert!(!secret.push('i'));
        assert!(!secret.push('R'));
        assert!(secret.push('d'));
        assert_eq!(secret.typed_len(), 0);
        assert_eq!(secret.code_len(), 4);
    }

    #[test]
    fn test_code_rolling_window() {
        let mut secret = SecretCode::new("NIRD");
        for c in "xxni".chars() {
            assert!(!secret.push(c));
        }
        assert!(!secret.push('x'));
        for c in "nir".chars() {
            assert!(!secret.push(c));
        }
        assert!(secret.push('d'));
    }

    #[test]
    fn test_code_erase() {
        let mut secret = SecretCode::new("NIRD");
        secret.push('n');
        secret.push('i');
        secret.push('x');
        secret.erase();
        secret.push('r');
        assert!(secret.push('d'));
    }

    #[test]
    fn test_long_press_fires_after_duration() {
        let t0 = Instant::now();
        let mut press = LongPress::new(Duration::from_millis(2000));

        press.hold(t0);
        assert!(press.progress(t0 + Duration::from_millis(1)) > 0.0);
        assert!(!press.poll(t0 + Duration::from_millis(1999)));
        assert!((press.progress(t0 + Duration::from_millis(1000)) - 0.5).abs() < 1e-9);
        assert!(press.poll(t0 + Duration::from_millis(2000)));
        // Fires once
        assert!(!press.poll(t0 + Duration::from_millis(2500)));
        assert_eq!(press.progress(t0 + Duration::from_millis(2500)), 0.0);
    }

    #[test]
    fn test_release_cancels() {
        let t0 = Instant::now();
        let mut press = LongPress::new(Duration::from_millis(2000));

        press.hold(t0);
        press.release();
        assert!(!press.poll(t0 + Duration::from_secs(3)));

        // A new press starts the count again
        press.hold(t0 + Duration::from_secs(3));
        assert!(!press.poll(t0 + Duration::from_secs(4)));
        assert!(press.poll(t0 + Duration::from_secs(5)));
    }

    #[test]
    fn test_key_repeats_keep_hold_alive() {
        let t0 = Instant::now();
        let mut press =
            LongPress::new(Duration::from_millis(2000)).with_repeat_gap(KEY_REPEAT_GAP);

        let mut now = t0;
        while now < t0 + Duration::from_millis(2000) {
            press.hold(now);
            now += Duration::from_millis(50);
        }
        assert!(press.poll(t0 + Duration::from_millis(2000)));
    }

    #[test]
    fn test_single_tap_expires() {
        let t0 = Instant::now();
        let mut press =
            LongPress::new(Duration::from_millis(2000)).with_repeat_gap(KEY_REPEAT_GAP);

        press.hold(t0);
        assert!(!press.poll(t0 + Duration::from_millis(2100)));
        assert_eq!(press.progress(t0 + Duration::from_millis(2100)), 0.0);
    }
}
