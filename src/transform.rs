use crate::animation::Animatable;

/// 2D transform carried by a scene element.
///
/// Kept as its components rather than a matrix so each one can be animated on
/// its own: a tween on `rotate` must not disturb a running tween on `translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Translation in x and y, in pixels
    pub translate: (f64, f64),
    /// Rotation in degrees (clockwise)
    pub rotate: f64,
    /// Uniform scale (1.0 = no scale)
    pub scale: f64,
    /// Pivot for rotate/scale, as percentages of the element box
    pub origin: (f64, f64),
}

impl Transform {
    /// Identity transform (no transformation)
    pub const IDENTITY: Self = Self {
        translate: (0.0, 0.0),
        rotate: 0.0,
        scale: 1.0,
        origin: (50.0, 50.0),
    };

    /// Create a translation transform
    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate: (x, y),
            ..Self::IDENTITY
        }
    }

    /// Create a rotation transform from degrees
    pub fn rotate(degrees: f64) -> Self {
        Self {
            rotate: degrees,
            ..Self::IDENTITY
        }
    }

    /// Create a uniform scale transform
    pub fn scale(scale: f64) -> Self {
        Self {
            scale,
            ..Self::IDENTITY
        }
    }

    /// Set the transform origin in percent (default is center: 50%, 50%)
    pub fn with_origin(mut self, x_percent: f64, y_percent: f64) -> Self {
        self.origin = (x_percent, y_percent);
        self
    }

    pub fn is_identity(&self) -> bool {
        self.translate == (0.0, 0.0) && self.rotate == 0.0 && self.scale == 1.0
    }

    /// SVG `transform` attribute for an element whose box is `(width, height)`.
    ///
    /// Rotation and scale pivot around the origin point of the box.
    pub fn to_svg(&self, width: f64, height: f64) -> String {
        let pivot_x = width * self.origin.0 / 100.0;
        let pivot_y = height * self.origin.1 / 100.0;
        let mut svg = format!("translate({} {})", self.translate.0, self.translate.1);
        if self.rotate != 0.0 {
            svg.push_str(&format!(" rotate({} {} {})", self.rotate, pivot_x, pivot_y));
        }
        if self.scale != 1.0 {
            svg.push_str(&format!(
                " translate({} {}) scale({}) translate({} {})",
                pivot_x, pivot_y, self.scale, -pivot_x, -pivot_y
            ));
        }
        svg
    }
}

impl Animatable for Transform {
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            translate: <(f64, f64)>::lerp(&from.translate, &to.translate, t),
            rotate: f64::lerp(&from.rotate, &to.rotate, t),
            scale: f64::lerp(&from.scale, &to.scale, t),
            origin: to.origin, // Origin doesn't animate
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
