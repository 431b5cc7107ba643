use super::{Animatable, Repeat, Transition};

/// Result of advancing an animation, indicating whether the value changed
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult<T> {
    /// Value did not change (animation not running or same value)
    NoChange,
    /// Value changed to a new value
    Changed(T),
}

/// A single tween from a start value to a target value.
///
/// Time is supplied by the caller in milliseconds, so the same tween can be
/// driven by a real frame clock or stepped deterministically.
#[derive(Clone, Debug)]
pub struct Tween<T: Animatable> {
    start: T,
    target: T,
    current: T,
    started_at_ms: f64,
    transition: Transition,
    repeat: Repeat,
    yoyo: bool,
    finished: bool,
}

impl<T: Animatable> Tween<T> {
    pub fn new(start: T, target: T, transition: Transition, now_ms: f64) -> Self {
        Self {
            current: start.clone(),
            start,
            target,
            started_at_ms: now_ms,
            transition,
            repeat: Repeat::Never,
            yoyo: false,
            finished: false,
        }
    }

    /// Set how many times the tween repeats
    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Alternate direction on every repeat
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Value the tween rests on once every cycle has played.
    pub fn terminal(&self) -> &T {
        if self.yoyo && self.repeat.yoyo_returns_to_start() {
            &self.start
        } else {
            &self.target
        }
    }

    /// Advance to `now_ms` and return whether the value changed
    pub fn advance(&mut self, now_ms: f64) -> AdvanceResult<T> {
        if self.finished {
            return AdvanceResult::NoChange;
        }

        let elapsed = now_ms - self.started_at_ms - self.transition.delay_ms;
        if elapsed < 0.0 {
            // Still in delay period
            return AdvanceResult::NoChange;
        }

        let duration = self.transition.duration_ms;
        let new_value = if duration <= 0.0 {
            self.finished = self.repeat != Repeat::Forever;
            self.terminal().clone()
        } else {
            let cycle = (elapsed / duration).floor();
            match self.repeat.cycles() {
                Some(total) if cycle >= total as f64 => {
                    self.finished = true;
                    self.terminal().clone()
                }
                _ => {
                    let local = elapsed / duration - cycle;
                    let reversed = self.yoyo && (cycle as u64) % 2 == 1;
                    let progress = if reversed { 1.0 - local } else { local };
                    let eased = self.transition.timing.evaluate(progress);
                    T::lerp(&self.start, &self.target, eased)
                }
            }
        };

        if new_value == self.current {
            return AdvanceResult::NoChange;
        }
        self.current = new_value.clone();
        AdvanceResult::Changed(new_value)
    }

    /// Check if the tween is still running
    pub fn is_animating(&self) -> bool {
        !self.finished
    }

    /// Get current value
    pub fn current(&self) -> &T {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TimingFunction;

    fn linear(duration_ms: f64) -> Transition {
        Transition::new(duration_ms, TimingFunction::Linear)
    }

    #[test]
    fn test_tween_new() {
        let tween = Tween::new(0.0f64, 100.0, linear(300.0), 0.0);

        assert_eq!(*tween.current(), 0.0);
        assert_eq!(*tween.terminal(), 100.0);
        assert!(tween.is_animating());
    }

    #[test]
    fn test_tween_midpoint_and_end() {
        let mut tween = Tween::new(0.0f64, 100.0, linear(300.0), 1000.0);

        assert_eq!(tween.advance(1150.0), AdvanceResult::Changed(50.0));
        assert_eq!(tween.advance(1300.0), AdvanceResult::Changed(100.0));
        assert!(!tween.is_animating());
        assert_eq!(tween.advance(5000.0), AdvanceResult::NoChange);
    }

    #[test]
    fn test_tween_delay() {
        let mut tween = Tween::new(0.0f64, 10.0, linear(100.0).delay(50.0), 0.0);

        assert_eq!(tween.advance(40.0), AdvanceResult::NoChange);
        assert_eq!(*tween.current(), 0.0);
        assert_eq!(tween.advance(100.0), AdvanceResult::Changed(5.0));
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let mut tween = Tween::new(3.0f64, 7.0, Transition::instant(), 0.0);

        assert_eq!(tween.advance(0.0), AdvanceResult::Changed(7.0));
        assert!(!tween.is_animating());
    }

    #[test]
    fn test_yoyo_once_returns_to_start() {
        let mut tween = Tween::new(1.0f64, 2.0, linear(100.0), 0.0)
            .yoyo(true)
            .repeat(Repeat::Times(1));

        assert_eq!(*tween.terminal(), 1.0);
        tween.advance(100.0);
        assert!(tween.is_animating());
        // Halfway back down
        assert_eq!(tween.advance(150.0), AdvanceResult::Changed(1.5));
        tween.advance(200.0);
        assert_eq!(*tween.current(), 1.0);
        assert!(!tween.is_animating());
    }

    #[test]
    fn test_repeat_without_yoyo_ends_on_target() {
        let mut tween = Tween::new(0.0f64, 4.0, linear(10.0), 0.0).repeat(Repeat::Times(2));

        tween.advance(15.0);
        assert_eq!(*tween.current(), 2.0);
        tween.advance(30.0);
        assert_eq!(*tween.current(), 4.0);
        assert!(!tween.is_animating());
    }

    #[test]
    fn test_forever_keeps_running() {
        let mut tween = Tween::new(0.0f64, 6.0, linear(1200.0), 0.0)
            .yoyo(true)
            .repeat(Repeat::Forever);

        tween.advance(600.0);
        assert_eq!(*tween.current(), 3.0);
        tween.advance(1800.0);
        assert_eq!(*tween.current(), 3.0);
        tween.advance(120_000.0);
        assert!(tween.is_animating());
    }
}
