/// Trait for types that can be animated by interpolating between values
pub trait Animatable: Clone + PartialEq + 'static {
    /// Linear interpolation between two values
    /// t = 0.0 returns `from`, t = 1.0 returns `to`
    /// t can exceed [0, 1] range for overshoot effects
    fn lerp(from: &Self, to: &Self, t: f64) -> Self;
}

impl Animatable for f64 {
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        from + (to - from) * t
    }
}

impl Animatable for (f64, f64) {
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        (f64::lerp(&from.0, &to.0, t), f64::lerp(&from.1, &to.1, t))
    }
}

impl<T: Animatable> Animatable for Option<T> {
    /// Absent endpoints snap to the other side instead of interpolating.
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        match (from, to) {
            (Some(a), Some(b)) => Some(T::lerp(a, b, t)),
            (None, b) => b.clone(),
            (a, None) => a.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f64_lerp() {
        assert_eq!(f64::lerp(&0.0, &10.0, 0.0), 0.0);
        assert_eq!(f64::lerp(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(f64::lerp(&0.0, &10.0, 1.0), 10.0);
        // Overshoot
        assert_eq!(f64::lerp(&0.0, &10.0, 1.5), 15.0);
    }

    #[test]
    fn test_pair_lerp() {
        let mid = <(f64, f64)>::lerp(&(0.0, 100.0), &(10.0, 0.0), 0.5);
        assert_eq!(mid, (5.0, 50.0));
    }

    #[test]
    fn test_option_lerp() {
        assert_eq!(Option::<f64>::lerp(&Some(0.0), &Some(4.0), 0.25), Some(1.0));
        assert_eq!(Option::<f64>::lerp(&None, &Some(4.0), 0.25), Some(4.0));
        assert_eq!(Option::<f64>::lerp(&Some(2.0), &None, 0.25), Some(2.0));
    }
}
