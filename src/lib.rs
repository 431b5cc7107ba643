//! Temperature-driven Meissner levitation stage.
//!
//! A slider reading goes through [`engine::TemperatureEngine`], which emits
//! render commands; [`render::Renderer`] applies them to a retained
//! [`scene::Scene`] through an [`backend::AnimationBackend`], either the tween
//! backend or the manual CSS-transition fallback.

pub mod animation;
pub mod audio;
pub mod backend;
pub mod engine;
mod error;
pub mod notification;
pub mod reactive;
pub mod render;
pub mod scene;
pub mod scheduler;
pub mod snapshot;
pub mod stage;
pub mod transform;

pub use error::{Error, Result};

use animation::{EaseMode, TimingFunction, Transition};

pub mod prelude {
    pub use crate::animation::{Repeat, TimingFunction, Transition};
    pub use crate::audio::{AssetProbe, AssetStatus, AudioOutput, FsProbe, ToggleOutcome};
    pub use crate::backend::{
        select_backend, AnimationBackend, ChangeSpec, ManualBackend, TweenBackend,
    };
    pub use crate::engine::{Phase, RenderCommand, SimulationState, TemperatureEngine};
    pub use crate::reactive::{create_effect, create_signal, Effect, Signal};
    pub use crate::scene::{ids, Element, Scene, Tag};
    pub use crate::stage::Stage;
    pub use crate::{Error, Result, StageConfig};
}

/// Start-up options for a [`stage::Stage`].
#[derive(Clone, Debug)]
pub struct StageConfig {
    /// Whether a tweening library is available; otherwise the manual backend is used
    pub tween_library: bool,
    /// Resting position of the disc group
    pub disc_anchor: (f64, f64),
    pub disc_transition: Transition,
    pub shadow_transition: Transition,
    /// Rotation amplitude in degrees while levitating
    pub oscillation_amplitude: f64,
    pub oscillation_period_ms: f64,
    /// Distance in °C to the nearest checkpoint under which the state card pulses
    pub pulse_window: f64,
    pub pulse_scale: f64,
    /// Full out-and-back duration of the pulse
    pub pulse_duration_ms: f64,
    pub notification_hide_ms: f64,
    pub audio_source: String,
    pub audio_volume: f64,
    /// Delay before un-muting after a muted playback retry
    pub unmute_delay_ms: f64,
    /// Fade the stage in on start-up
    pub intro: bool,
    pub intro_duration_ms: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            tween_library: true,
            disc_anchor: (210.0, 160.0),
            disc_transition: Transition::new(600.0, TimingFunction::Power(2, EaseMode::Out)),
            shadow_transition: Transition::new(450.0, TimingFunction::CSS_EASE),
            oscillation_amplitude: 6.0,
            oscillation_period_ms: 1200.0,
            pulse_window: 0.6,
            pulse_scale: 1.02,
            pulse_duration_ms: 350.0,
            notification_hide_ms: 6000.0,
            audio_source: "Alone.mp3".to_string(),
            audio_volume: 0.35,
            unmute_delay_ms: 300.0,
            intro: true,
            intro_duration_ms: 900.0,
        }
    }
}

impl StageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tween_library(mut self, available: bool) -> Self {
        self.tween_library = available;
        self
    }

    pub fn disc_anchor(mut self, x: f64, y: f64) -> Self {
        self.disc_anchor = (x, y);
        self
    }

    pub fn disc_transition(mut self, transition: Transition) -> Self {
        self.disc_transition = transition;
        self
    }

    pub fn shadow_transition(mut self, transition: Transition) -> Self {
        self.shadow_transition = transition;
        self
    }

    pub fn oscillation(mut self, amplitude: f64, period_ms: f64) -> Self {
        self.oscillation_amplitude = amplitude;
        self.oscillation_period_ms = period_ms;
        self
    }

    pub fn pulse(mut self, window: f64, scale: f64, duration_ms: f64) -> Self {
        self.pulse_window = window;
        self.pulse_scale = scale;
        self.pulse_duration_ms = duration_ms;
        self
    }

    pub fn notification_hide_ms(mut self, delay_ms: f64) -> Self {
        self.notification_hide_ms = delay_ms;
        self
    }

    pub fn audio_source(mut self, source: impl Into<String>) -> Self {
        self.audio_source = source.into();
        self
    }

    pub fn audio_volume(mut self, volume: f64) -> Self {
        self.audio_volume = volume;
        self
    }

    pub fn unmute_delay_ms(mut self, delay_ms: f64) -> Self {
        self.unmute_delay_ms = delay_ms;
        self
    }

    pub fn intro(mut self, enabled: bool) -> Self {
        self.intro = enabled;
        self
    }
}
