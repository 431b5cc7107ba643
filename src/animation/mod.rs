mod animatable;
mod timing;
mod tween;

pub use animatable::Animatable;
pub use timing::{EaseMode, TimingFunction};
pub use tween::{AdvanceResult, Tween};

/// How many extra cycles an animation plays after the first one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Play once
    #[default]
    Never,
    /// Play `1 + n` cycles
    Times(u32),
    /// Loop until killed
    Forever,
}

impl Repeat {
    /// Total number of cycles, `None` when looping forever
    pub fn cycles(&self) -> Option<u64> {
        match self {
            Repeat::Never => Some(1),
            Repeat::Times(n) => Some(u64::from(*n) + 1),
            Repeat::Forever => None,
        }
    }

    /// Whether a yoyo animation with this repeat count settles back on its
    /// start value (or never settles at all).
    pub fn yoyo_returns_to_start(&self) -> bool {
        match self {
            Repeat::Never => false,
            Repeat::Times(n) => n % 2 == 1,
            Repeat::Forever => true,
        }
    }
}

/// Configuration for how a property should animate when it changes
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Duration of one animation cycle in milliseconds
    pub duration_ms: f64,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before animation starts in milliseconds
    pub delay_ms: f64,
}

impl Transition {
    /// Create a new transition with the given duration and timing function
    pub fn new(duration_ms: f64, timing: TimingFunction) -> Self {
        Self {
            duration_ms,
            timing,
            delay_ms: 0.0,
        }
    }

    /// A zero-length transition that applies values immediately
    pub fn instant() -> Self {
        Self::new(0.0, TimingFunction::Linear)
    }

    /// Set the delay before the animation starts
    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the duration of the animation
    pub fn duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the timing function
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    /// CSS `transition` shorthand covering every property, e.g. `all 0.6s ease-out`
    pub fn css(&self) -> String {
        let mut css = format!("all {}s {}", self.duration_ms / 1000.0, self.timing.css());
        if self.delay_ms > 0.0 {
            css.push_str(&format!(" {}s", self.delay_ms / 1000.0));
        }
        css
    }
}

impl Default for Transition {
    /// 600ms with the CSS `ease` curve
    fn default() -> Self {
        Self::new(600.0, TimingFunction::CSS_EASE)
    }
}
