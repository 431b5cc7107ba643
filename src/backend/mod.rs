//! Animation backends.
//!
//! Every visual update goes through [`AnimationBackend::animate`] with a
//! [`ChangeSpec`]. Two implementations exist:
//!
//! - [`TweenBackend`] plays the change as real tweens (easing, repeats, yoyo),
//!   the way a tweening library would.
//! - [`ManualBackend`] sets a CSS transition and writes the end values at
//!   once, leaving interpolation to the host; loops become one delayed
//!   reversal.
//!
//! Both leave an element in the same terminal state for the same change.
//! The backend is picked once at startup with [`select_backend`].

mod manual;
mod tween;

pub use manual::ManualBackend;
pub use tween::TweenBackend;

use bitflags::bitflags;

use crate::animation::{Animatable, Repeat, TimingFunction, Transition};
use crate::scene::{Element, Scene};
use crate::{Error, Result};

bitflags! {
    /// Properties a change touches
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Props: u8 {
        const X        = 0b0000_0001;
        const Y        = 0b0000_0010;
        const ROTATION = 0b0000_0100;
        const SCALE    = 0b0000_1000;
        const RX       = 0b0001_0000;
        const RY       = 0b0010_0000;
        const OPACITY  = 0b0100_0000;
    }
}

/// Snapshot of every animatable value of an element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualValues {
    pub translate: (f64, f64),
    pub rotation: f64,
    pub scale: f64,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub opacity: f64,
}

impl VisualValues {
    pub fn read(element: &Element) -> Self {
        let transform = element.transform();
        Self {
            translate: transform.translate,
            rotation: transform.rotate,
            scale: transform.scale,
            rx: element.attr_f64("rx"),
            ry: element.attr_f64("ry"),
            opacity: element.opacity(),
        }
    }

    /// Write the properties selected by `props` into `element`
    pub fn write(&self, element: &mut Element, props: Props) {
        let mut transform = element.transform();
        if props.contains(Props::X) {
            transform.translate.0 = self.translate.0;
        }
        if props.contains(Props::Y) {
            transform.translate.1 = self.translate.1;
        }
        if props.contains(Props::ROTATION) {
            transform.rotate = self.rotation;
        }
        if props.contains(Props::SCALE) {
            transform.scale = self.scale;
        }
        element.set_transform(transform);

        if props.contains(Props::RX) {
            if let Some(rx) = self.rx {
                element.set_attr("rx", rx);
            }
        }
        if props.contains(Props::RY) {
            if let Some(ry) = self.ry {
                element.set_attr("ry", ry);
            }
        }
        if props.contains(Props::OPACITY) {
            element.set_opacity(self.opacity);
        }
    }
}

impl Animatable for VisualValues {
    fn lerp(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            translate: <(f64, f64)>::lerp(&from.translate, &to.translate, t),
            rotation: f64::lerp(&from.rotation, &to.rotation, t),
            scale: f64::lerp(&from.scale, &to.scale, t),
            rx: Option::<f64>::lerp(&from.rx, &to.rx, t),
            ry: Option::<f64>::lerp(&from.ry, &to.ry, t),
            opacity: f64::lerp(&from.opacity, &to.opacity, t),
        }
    }
}

/// A requested visual change: target values plus how to get there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChangeSpec {
    pub x: Option<f64>,
    pub y: Option<f64>,
    /// Degrees
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
    pub opacity: Option<f64>,
    /// Transform origin in percent, applied immediately
    pub origin: Option<(f64, f64)>,
    pub transition: Transition,
    pub repeat: Repeat,
    pub yoyo: bool,
}

impl ChangeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn position(self, x: f64, y: f64) -> Self {
        self.x(x).y(y)
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn radii(mut self, rx: f64, ry: f64) -> Self {
        self.rx = Some(rx);
        self.ry = Some(ry);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn origin(mut self, x_percent: f64, y_percent: f64) -> Self {
        self.origin = Some((x_percent, y_percent));
        self
    }

    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.transition.duration_ms = duration_ms;
        self
    }

    pub fn delay_ms(mut self, delay_ms: f64) -> Self {
        self.transition.delay_ms = delay_ms;
        self
    }

    pub fn ease(mut self, timing: TimingFunction) -> Self {
        self.transition.timing = timing;
        self
    }

    /// Set the easing by name. Unknown names keep the current curve.
    pub fn ease_named(self, name: &str) -> Self {
        match TimingFunction::from_name(name) {
            Some(timing) => self.ease(timing),
            None => {
                log::warn!("Unknown easing {:?}, keeping {:?}", name, self.transition.timing);
                self
            }
        }
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Same values, applied with no transition and no looping
    pub fn immediate(&self) -> Self {
        Self {
            transition: Transition::instant(),
            repeat: Repeat::Never,
            yoyo: false,
            ..self.clone()
        }
    }

    pub fn props(&self) -> Props {
        let mut props = Props::empty();
        props.set(Props::X, self.x.is_some());
        props.set(Props::Y, self.y.is_some());
        props.set(Props::ROTATION, self.rotation.is_some());
        props.set(Props::SCALE, self.scale.is_some());
        props.set(Props::RX, self.rx.is_some());
        props.set(Props::RY, self.ry.is_some());
        props.set(Props::OPACITY, self.opacity.is_some());
        props
    }

    /// End values when starting from `start`
    pub fn apply_to(&self, start: &VisualValues) -> VisualValues {
        VisualValues {
            translate: (
                self.x.unwrap_or(start.translate.0),
                self.y.unwrap_or(start.translate.1),
            ),
            rotation: self.rotation.unwrap_or(start.rotation),
            scale: self.scale.unwrap_or(start.scale),
            rx: self.rx.or(start.rx),
            ry: self.ry.or(start.ry),
            opacity: self.opacity.unwrap_or(start.opacity),
        }
    }

    /// Whether the change eventually settles on its start values
    pub fn settles_on_start(&self) -> bool {
        self.yoyo && self.repeat.yoyo_returns_to_start()
    }

    pub fn validate(&self, target: &str) -> Result<()> {
        let malformed = |reason: &str| Error::MalformedChange {
            target: target.to_string(),
            reason: reason.to_string(),
        };

        if self.props().is_empty() {
            return Err(malformed("no properties to change"));
        }
        let values = [
            self.x,
            self.y,
            self.rotation,
            self.scale,
            self.rx,
            self.ry,
            self.opacity,
        ];
        if values.iter().flatten().any(|value| !value.is_finite()) {
            return Err(malformed("non-finite value"));
        }
        if self.rx.is_some_and(|rx| rx < 0.0) || self.ry.is_some_and(|ry| ry < 0.0) {
            return Err(malformed("negative radius"));
        }
        let Transition {
            duration_ms,
            delay_ms,
            ..
        } = self.transition;
        if !duration_ms.is_finite() || duration_ms < 0.0 || !delay_ms.is_finite() || delay_ms < 0.0
        {
            return Err(malformed("duration and delay must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Applies visual changes to scene elements.
pub trait AnimationBackend {
    fn name(&self) -> &'static str;

    /// Start moving `target` towards the values in `change`.
    ///
    /// Fails with [`Error::MissingTarget`] when the element does not exist and
    /// [`Error::MalformedChange`] when the change is unusable. On failure the
    /// scene is left untouched.
    fn animate(
        &mut self,
        scene: &mut Scene,
        target: &str,
        change: &ChangeSpec,
        now_ms: f64,
    ) -> Result<()>;

    /// Apply the values of `change` right away.
    fn set(
        &mut self,
        scene: &mut Scene,
        target: &str,
        change: &ChangeSpec,
        now_ms: f64,
    ) -> Result<()> {
        self.animate(scene, target, &change.immediate(), now_ms)
    }

    /// Stop everything running or pending on `target`, leaving values where they are
    fn kill_tweens_of(&mut self, target: &str);

    /// Advance running animations to `now_ms`
    fn tick(&mut self, scene: &mut Scene, now_ms: f64);

    fn is_animating(&self, target: &str) -> bool;
}

/// Pick the backend once, based on whether a tweening library is available.
pub fn select_backend(tween_library: bool) -> Box<dyn AnimationBackend> {
    let backend: Box<dyn AnimationBackend> = if tween_library {
        Box::new(TweenBackend::new())
    } else {
        Box::new(ManualBackend::new())
    };
    log::info!("Animation backend: {}", backend.name());
    backend
}

/// Look up `target` or fail with [`Error::MissingTarget`]
fn target_mut<'a>(scene: &'a mut Scene, target: &str) -> Result<&'a mut Element> {
    scene
        .get_mut(target)
        .ok_or_else(|| Error::MissingTarget(target.to_string()))
}

/// Apply the transform origin of `change`, if any
fn apply_origin(element: &mut Element, change: &ChangeSpec) {
    if let Some((x, y)) = change.origin {
        element.set_transform(element.transform().with_origin(x, y));
    }
}
