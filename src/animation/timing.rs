//! Timing functions (easing curves) for animations.
//!
//! Timing functions control the rate of change during an animation, allowing
//! for natural-feeling motion rather than linear interpolation.
//!
//! ## Built-in Easing Functions
//!
//! - [`TimingFunction::Linear`] - Constant speed (no easing)
//! - [`TimingFunction::EaseIn`] - Starts slow, ends fast (acceleration)
//! - [`TimingFunction::EaseOut`] - Starts fast, ends slow (deceleration)
//! - [`TimingFunction::EaseInOut`] - Slow start and end, fast middle
//!
//! ## Tween-library Curves
//!
//! - [`TimingFunction::Power`] - `power1` .. `power4` polynomial curves
//! - [`TimingFunction::Sine`] - Sinusoidal curves
//!
//! ## Advanced Options
//!
//! - [`TimingFunction::CubicBezier`] - CSS-style cubic bezier curve
//! - [`TimingFunction::Custom`] - User-defined function
//!
//! ## Names
//!
//! Change specs refer to curves by name. [`TimingFunction::from_name`] accepts
//! both CSS keywords and tween-library names:
//!
//! ```ignore
//! let ease = TimingFunction::from_name("power2.out").unwrap();
//! assert_eq!(ease.css(), "cubic-bezier(0.215, 0.61, 0.355, 1)");
//! ```

use std::f64::consts::PI;
use std::sync::Arc;

/// Which end of the curve is eased.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EaseMode {
    In,
    Out,
    InOut,
}

/// Timing function that controls the animation curve
#[derive(Clone)]
pub enum TimingFunction {
    /// Linear interpolation (constant speed)
    Linear,
    /// Starts slow, ends fast
    EaseIn,
    /// Starts fast, ends slow
    EaseOut,
    /// Starts slow, speeds up, then slows down
    EaseInOut,
    /// CSS cubic-bezier curve (x1, y1, x2, y2)
    CubicBezier(f64, f64, f64, f64),
    /// Polynomial curve of degree `power + 1` (`power2` is cubic)
    Power(u8, EaseMode),
    /// Quarter sine wave
    Sine(EaseMode),
    /// Custom timing function
    Custom(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl TimingFunction {
    /// The CSS `ease` keyword.
    pub const CSS_EASE: Self = TimingFunction::CubicBezier(0.25, 0.1, 0.25, 1.0);

    /// Evaluate the timing function at time t (0.0 to 1.0)
    /// Returns the interpolation factor (can exceed [0, 1] for overshoot)
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            TimingFunction::Linear => t,
            TimingFunction::EaseIn => ease_in(t),
            TimingFunction::EaseOut => ease_out(t),
            TimingFunction::EaseInOut => ease_in_out(t),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            TimingFunction::Power(power, mode) => power_ease(t, *power, *mode),
            TimingFunction::Sine(mode) => sine_ease(t, *mode),
            TimingFunction::Custom(f) => f(t),
        }
    }

    /// Create a custom timing function from a closure
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        TimingFunction::Custom(Arc::new(f))
    }

    /// Parse an easing name such as `"ease-out"`, `"power2.out"` or `"sine.inOut"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        match name {
            "linear" | "none" => return Some(TimingFunction::Linear),
            "ease" => return Some(Self::CSS_EASE),
            "ease-in" => return Some(TimingFunction::EaseIn),
            "ease-out" => return Some(TimingFunction::EaseOut),
            "ease-in-out" => return Some(TimingFunction::EaseInOut),
            _ => {}
        }

        let (family, mode) = name.split_once('.').unwrap_or((name, "out"));
        let mode = match mode {
            "in" => EaseMode::In,
            "out" => EaseMode::Out,
            "inOut" => EaseMode::InOut,
            _ => return None,
        };
        match family {
            "sine" => Some(TimingFunction::Sine(mode)),
            "power0" => Some(TimingFunction::Linear),
            _ => {
                let power: u8 = family.strip_prefix("power")?.parse().ok()?;
                (1..=4)
                    .contains(&power)
                    .then_some(TimingFunction::Power(power, mode))
            }
        }
    }

    /// CSS `transition-timing-function` value for this curve.
    ///
    /// Power and sine curves map to their usual cubic-bezier approximations.
    pub fn css(&self) -> String {
        let bezier = match self {
            TimingFunction::Linear => return "linear".to_string(),
            TimingFunction::EaseIn => return "ease-in".to_string(),
            TimingFunction::EaseOut => return "ease-out".to_string(),
            TimingFunction::EaseInOut => return "ease-in-out".to_string(),
            TimingFunction::Custom(_) => return "ease".to_string(),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => (*x1, *y1, *x2, *y2),
            TimingFunction::Power(power, mode) => power_bezier(*power, *mode),
            TimingFunction::Sine(mode) => match mode {
                EaseMode::In => (0.47, 0.0, 0.745, 0.715),
                EaseMode::Out => (0.39, 0.575, 0.565, 1.0),
                EaseMode::InOut => (0.445, 0.05, 0.55, 0.95),
            },
        };
        format!(
            "cubic-bezier({}, {}, {}, {})",
            bezier.0, bezier.1, bezier.2, bezier.3
        )
    }
}

impl Default for TimingFunction {
    fn default() -> Self {
        Self::CSS_EASE
    }
}

impl std::fmt::Debug for TimingFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingFunction::Linear => write!(f, "Linear"),
            TimingFunction::EaseIn => write!(f, "EaseIn"),
            TimingFunction::EaseOut => write!(f, "EaseOut"),
            TimingFunction::EaseInOut => write!(f, "EaseInOut"),
            TimingFunction::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            TimingFunction::Power(power, mode) => write!(f, "Power{}({:?})", power, mode),
            TimingFunction::Sine(mode) => write!(f, "Sine({:?})", mode),
            TimingFunction::Custom(_) => write!(f, "Custom"),
        }
    }
}

// Custom closures never compare equal, not even to themselves.
impl PartialEq for TimingFunction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TimingFunction::Linear, TimingFunction::Linear)
            | (TimingFunction::EaseIn, TimingFunction::EaseIn)
            | (TimingFunction::EaseOut, TimingFunction::EaseOut)
            | (TimingFunction::EaseInOut, TimingFunction::EaseInOut) => true,
            (TimingFunction::CubicBezier(a, b, c, d), TimingFunction::CubicBezier(e, f, g, h)) => {
                a == e && b == f && c == g && d == h
            }
            (TimingFunction::Power(p, m), TimingFunction::Power(q, n)) => p == q && m == n,
            (TimingFunction::Sine(m), TimingFunction::Sine(n)) => m == n,
            _ => false,
        }
    }
}

// Easing functions

fn ease_in(t: f64) -> f64 {
    t * t
}

fn ease_out(t: f64) -> f64 {
    t * (2.0 - t)
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

fn power_ease(t: f64, power: u8, mode: EaseMode) -> f64 {
    let exponent = i32::from(power) + 1;
    match mode {
        EaseMode::In => t.powi(exponent),
        EaseMode::Out => 1.0 - (1.0 - t).powi(exponent),
        EaseMode::InOut => {
            if t < 0.5 {
                (2.0 * t).powi(exponent) / 2.0
            } else {
                1.0 - (2.0 * (1.0 - t)).powi(exponent) / 2.0
            }
        }
    }
}

fn power_bezier(power: u8, mode: EaseMode) -> (f64, f64, f64, f64) {
    match (power, mode) {
        (1, EaseMode::In) => (0.55, 0.085, 0.68, 0.53),
        (1, EaseMode::Out) => (0.25, 0.46, 0.45, 0.94),
        (1, EaseMode::InOut) => (0.455, 0.03, 0.515, 0.955),
        (2, EaseMode::In) => (0.55, 0.055, 0.675, 0.19),
        (2, EaseMode::Out) => (0.215, 0.61, 0.355, 1.0),
        (2, EaseMode::InOut) => (0.645, 0.045, 0.355, 1.0),
        (3, EaseMode::In) => (0.895, 0.03, 0.685, 0.22),
        (3, EaseMode::Out) => (0.165, 0.84, 0.44, 1.0),
        (3, EaseMode::InOut) => (0.77, 0.0, 0.175, 1.0),
        (_, EaseMode::In) => (0.755, 0.05, 0.855, 0.06),
        (_, EaseMode::Out) => (0.23, 1.0, 0.32, 1.0),
        (_, EaseMode::InOut) => (0.86, 0.0, 0.07, 1.0),
    }
}

fn sine_ease(t: f64, mode: EaseMode) -> f64 {
    match mode {
        EaseMode::In => 1.0 - (t * PI / 2.0).cos(),
        EaseMode::Out => (t * PI / 2.0).sin(),
        EaseMode::InOut => -((PI * t).cos() - 1.0) / 2.0,
    }
}

/// Cubic bezier curve evaluation
/// Simplified implementation assuming x1, x2 are in [0, 1]
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Use Newton-Raphson to solve for t given x
    let mut current_t = t;
    for _ in 0..8 {
        let current_x = cubic_bezier_x(current_t, x1, x2);
        let current_slope = cubic_bezier_slope(current_t, x1, x2);
        if current_slope.abs() < 1e-6 {
            break;
        }
        current_t -= (current_x - t) / current_slope;
    }
    cubic_bezier_y(current_t, y1, y2)
}

fn cubic_bezier_x(t: f64, x1: f64, x2: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * x1 + 3.0 * mt * t2 * x2 + t3
}

fn cubic_bezier_y(t: f64, y1: f64, y2: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let mt = 1.0 - t;
    let mt2 = mt * mt;
    3.0 * mt2 * t * y1 + 3.0 * mt * t2 * y2 + t3
}

fn cubic_bezier_slope(t: f64, x1: f64, x2: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}
