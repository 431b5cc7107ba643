//! Temperature to visual state mapping.
//!
//! A temperature in `[-200, 25]` °C drives everything on the stage:
//!
//! - the disc rises linearly from rest (`0`) at 25 °C to [`Y_LEVITATE`] at -200 °C,
//! - the shadow shrinks and fades as the disc rises,
//! - the phase text is picked by half-open threshold bands,
//! - the levitation band runs a small rotation swing and fires a one-shot
//!   notification the first time it is reached.
//!
//! The engine only computes; it emits [`RenderCommand`]s for the renderer.

use crate::{Error, Result};

/// Coldest temperature on the slider
pub const T_MIN: f64 = -200.0;
/// Warmest temperature on the slider
pub const T_MAX: f64 = 25.0;
/// Vertical offset of the resting disc
pub const Y_REST: f64 = 0.0;
/// Vertical offset of the fully levitating disc
pub const Y_LEVITATE: f64 = -54.0;

const SHADOW_BASE: (f64, f64) = (50.0, 12.0);
const SHADOW_FLOOR: (f64, f64) = (18.0, 6.0);
const SHADOW_MAX_OPACITY: f64 = 0.35;
const SHADOW_MIN_OPACITY: f64 = 0.08;

/// Physical regime of the sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not superconducting yet
    Normal,
    /// Cooper pairs start forming
    Cooling,
    /// Critical temperature reached
    PhaseTransition,
    /// Field expelled, the magnet levitates
    Levitation,
}

impl Phase {
    /// Classify a temperature by threshold bands, warmest first.
    ///
    /// Bands are closed on their warm side: -150 is already cooling, -181 is
    /// already the transition and -195.8 already levitates.
    pub fn classify(temperature: f64) -> Self {
        if temperature > -150.0 {
            Phase::Normal
        } else if temperature > -181.0 {
            Phase::Cooling
        } else if temperature > -195.8 {
            Phase::PhaseTransition
        } else {
            Phase::Levitation
        }
    }

    pub fn checkpoint(&self) -> &'static Checkpoint {
        match self {
            Phase::Normal => &CHECKPOINTS[0],
            Phase::Cooling => &CHECKPOINTS[1],
            Phase::PhaseTransition => &CHECKPOINTS[2],
            Phase::Levitation => &CHECKPOINTS[3],
        }
    }
}

/// A named regime marker on the temperature scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Checkpoint {
    pub temperature: f64,
    pub phase: Phase,
    pub title: &'static str,
    pub description: &'static str,
}

pub const CHECKPOINTS: [Checkpoint; 4] = [
    Checkpoint {
        temperature: 25.0,
        phase: Phase::Normal,
        title: "State: Normal",
        description: "The material is not superconducting yet; electrical resistance is present.",
    },
    Checkpoint {
        temperature: -150.0,
        phase: Phase::Cooling,
        title: "Cooling",
        description: "Electrons begin to bind into Cooper pairs.",
    },
    Checkpoint {
        temperature: -181.0,
        phase: Phase::PhaseTransition,
        title: "Phase transition",
        description: "The material reaches its critical temperature and becomes a superconductor.",
    },
    Checkpoint {
        temperature: -195.8,
        phase: Phase::Levitation,
        title: "Quantum levitation",
        description: "The internal magnetic field is expelled. The superconductor enters quantum levitation.",
    },
];

/// Checkpoint closest to `temperature`; ties go to the warmer one.
pub fn nearest_checkpoint(temperature: f64) -> &'static Checkpoint {
    let mut closest = &CHECKPOINTS[0];
    for checkpoint in &CHECKPOINTS[1..] {
        if (temperature - checkpoint.temperature).abs() < (temperature - closest.temperature).abs() {
            closest = checkpoint;
        }
    }
    closest
}

pub fn clamp_temperature(temperature: f64) -> f64 {
    temperature.clamp(T_MIN, T_MAX)
}

/// Position of a (clamped) temperature on the scale: 0 at the cold end, 1 at the warm end
pub fn normalize(temperature: f64) -> f64 {
    (clamp_temperature(temperature) - T_MIN) / (T_MAX - T_MIN)
}

/// Vertical disc offset for a temperature: 0 at 25 °C, -54 at -200 °C
pub fn vertical_offset(temperature: f64) -> f64 {
    Y_LEVITATE + normalize(temperature) * (Y_REST - Y_LEVITATE)
}

/// Shadow under the disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowGeometry {
    pub scale: f64,
    pub rx: f64,
    pub ry: f64,
    pub opacity: f64,
}

impl ShadowGeometry {
    pub fn for_offset(offset: f64) -> Self {
        let lift = (Y_REST - offset) / Y_LEVITATE.abs();
        let scale = 1.0 - lift * 0.5;
        Self {
            scale,
            rx: SHADOW_FLOOR.0.max(SHADOW_BASE.0 * scale),
            ry: SHADOW_FLOOR.1.max(SHADOW_BASE.1 * scale),
            opacity: SHADOW_MIN_OPACITY.max(SHADOW_MAX_OPACITY * (1.0 - lift * 0.85)),
        }
    }
}

/// Everything derived from one temperature reading.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationState {
    /// Clamped temperature
    pub temperature: f64,
    pub vertical_offset: f64,
    pub shadow: ShadowGeometry,
    pub phase: Phase,
    pub levitation_notified: bool,
}

impl SimulationState {
    pub fn checkpoint(&self) -> &'static Checkpoint {
        self.phase.checkpoint()
    }
}

/// One visual update, in the order the renderer must apply them.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCommand {
    /// Temperature readout, e.g. `-195.8 °C`
    SetTemperatureText(String),
    SetStateText {
        title: &'static str,
        description: &'static str,
    },
    /// Move the disc to `offset` below/above its resting position
    MoveDisc { offset: f64 },
    SetShadow(ShadowGeometry),
    StartOscillation,
    StopOscillation,
    /// Draw attention to the state card near a checkpoint
    PulseStateCard,
    /// First arrival in the levitation band
    NotifyLevitation,
}

/// Format a temperature with one decimal and a degree-Celsius suffix.
pub fn format_temperature(temperature: f64) -> String {
    // Avoid printing "-0.0" for a plain zero
    let temperature = if temperature == 0.0 { 0.0 } else { temperature };
    format!("{:.1} °C", temperature)
}

/// Parse raw slider text into a temperature.
pub fn parse_temperature(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::NonNumericInput(raw.to_string()))?;
    if !value.is_finite() {
        return Err(Error::NonNumericInput(raw.to_string()));
    }
    Ok(value)
}

/// Maps temperatures to render commands.
///
/// The only state kept between updates is the levitation latch (plus the last
/// state, for inspection).
#[derive(Clone, Debug)]
pub struct TemperatureEngine {
    levitation_notified: bool,
    pulse_window: f64,
    last: Option<SimulationState>,
}

impl TemperatureEngine {
    pub fn new() -> Self {
        Self {
            levitation_notified: false,
            pulse_window: 0.6,
            last: None,
        }
    }

    /// Distance to the nearest checkpoint under which the state card pulses
    pub fn with_pulse_window(mut self, window: f64) -> Self {
        self.pulse_window = window;
        self
    }

    pub fn levitation_notified(&self) -> bool {
        self.levitation_notified
    }

    /// State from the last accepted update
    pub fn state(&self) -> Option<&SimulationState> {
        self.last.as_ref()
    }

    /// Compute the state for `temperature` without touching the latch
    pub fn evaluate(&self, temperature: f64) -> SimulationState {
        let temperature = clamp_temperature(temperature);
        let vertical_offset = vertical_offset(temperature);
        SimulationState {
            temperature,
            vertical_offset,
            shadow: ShadowGeometry::for_offset(vertical_offset),
            phase: Phase::classify(temperature),
            levitation_notified: self.levitation_notified,
        }
    }

    /// Run the pipeline for one reading.
    ///
    /// Non-finite readings are rejected and leave the engine as it was.
    pub fn update(&mut self, temperature: f64) -> Result<Vec<RenderCommand>> {
        if !temperature.is_finite() {
            return Err(Error::NonNumericInput(temperature.to_string()));
        }

        let mut state = self.evaluate(temperature);
        let checkpoint = state.checkpoint();
        let mut commands = vec![
            RenderCommand::SetTemperatureText(format_temperature(state.temperature)),
            RenderCommand::SetStateText {
                title: checkpoint.title,
                description: checkpoint.description,
            },
            RenderCommand::MoveDisc {
                offset: state.vertical_offset,
            },
            RenderCommand::SetShadow(state.shadow),
        ];

        let levitating = state.phase == Phase::Levitation;
        commands.push(if levitating {
            RenderCommand::StartOscillation
        } else {
            RenderCommand::StopOscillation
        });

        let near = nearest_checkpoint(state.temperature);
        if (state.temperature - near.temperature).abs() < self.pulse_window {
            commands.push(RenderCommand::PulseStateCard);
        }

        if levitating && !self.levitation_notified {
            self.levitation_notified = true;
            state.levitation_notified = true;
            commands.push(RenderCommand::NotifyLevitation);
        }

        log::debug!(
            "{:.1} °C -> {:?}, offset {:.2}, shadow {:.1}x{:.1} @ {:.3}",
            state.temperature,
            state.phase,
            state.vertical_offset,
            state.shadow.rx,
            state.shadow.ry,
            state.shadow.opacity
        );
        self.last = Some(state);
        Ok(commands)
    }

    /// Parse raw slider text and run the pipeline.
    pub fn update_from_str(&mut self, raw: &str) -> Result<Vec<RenderCommand>> {
        let temperature = parse_temperature(raw)?;
        self.update(temperature)
    }
}

impl Default for TemperatureEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_offset_endpoints_and_midpoint() {
        assert_eq!(vertical_offset(25.0), 0.0);
        assert_eq!(vertical_offset(-200.0), -54.0);
        assert_relative_eq!(vertical_offset(-87.5), -27.0);
    }

    #[test]
    fn test_offset_clamps_out_of_range() {
        assert_eq!(vertical_offset(80.0), 0.0);
        assert_eq!(vertical_offset(-400.0), -54.0);
    }

    #[test]
    fn test_offset_is_monotonic() {
        let mut previous = vertical_offset(T_MAX);
        let mut t = T_MAX;
        while t >= T_MIN {
            let offset = vertical_offset(t);
            assert!(offset <= previous, "offset rose at {}", t);
            previous = offset;
            t -= 0.1;
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(Phase::classify(25.0), Phase::Normal);
        assert_eq!(Phase::classify(-149.9), Phase::Normal);
        assert_eq!(Phase::classify(-150.0), Phase::Cooling);
        assert_eq!(Phase::classify(-180.9), Phase::Cooling);
        assert_eq!(Phase::classify(-181.0), Phase::PhaseTransition);
        assert_eq!(Phase::classify(-195.7), Phase::PhaseTransition);
        assert_eq!(Phase::classify(-195.8), Phase::Levitation);
        assert_eq!(Phase::classify(-200.0), Phase::Levitation);
    }

    #[test]
    fn test_bands_cover_every_reading() {
        let mut t = T_MIN;
        while t <= T_MAX {
            let phase = Phase::classify(t);
            let matching = [
                t > -150.0,
                t <= -150.0 && t > -181.0,
                t <= -181.0 && t > -195.8,
                t <= -195.8,
            ];
            assert_eq!(matching.iter().filter(|m| **m).count(), 1);
            assert_eq!(phase.checkpoint().phase, phase);
            t += 0.05;
        }
    }

    #[test]
    fn test_shadow_never_degenerates() {
        let mut t = T_MIN;
        while t <= T_MAX {
            let shadow = ShadowGeometry::for_offset(vertical_offset(t));
            assert!(shadow.rx >= 18.0);
            assert!(shadow.ry >= 6.0);
            assert!(shadow.opacity >= 0.08 && shadow.opacity <= 0.35);
            t += 0.25;
        }
    }

    #[test]
    fn test_shadow_values() {
        let rest = ShadowGeometry::for_offset(0.0);
        assert_eq!((rest.rx, rest.ry, rest.opacity, rest.scale), (50.0, 12.0, 0.35, 1.0));

        let lifted = ShadowGeometry::for_offset(-54.0);
        assert_relative_eq!(lifted.scale, 0.5);
        assert_relative_eq!(lifted.rx, 25.0);
        assert_relative_eq!(lifted.ry, 6.0);
        // 0.35 * 0.15 falls under the floor
        assert_relative_eq!(lifted.opacity, 0.08);
    }

    #[test]
    fn test_nearest_checkpoint() {
        assert_eq!(nearest_checkpoint(-60.0).phase, Phase::Normal);
        assert_eq!(nearest_checkpoint(-170.0).phase, Phase::PhaseTransition);
        assert_eq!(nearest_checkpoint(-190.0).phase, Phase::Levitation);
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(25.0), "25.0 °C");
        assert_eq!(format_temperature(-195.8), "-195.8 °C");
        assert_eq!(format_temperature(-0.0), "0.0 °C");
        assert_eq!(format_temperature(-87.46), "-87.5 °C");
    }

    #[test]
    fn test_update_emits_commands_in_order() {
        let mut engine = TemperatureEngine::new();
        let commands = engine.update(-100.0).unwrap();
        assert_eq!(commands.len(), 5);
        assert_eq!(
            commands[0],
            RenderCommand::SetTemperatureText("-100.0 °C".to_string())
        );
        assert!(matches!(
            commands[1],
            RenderCommand::SetStateText { title: "State: Normal", .. }
        ));
        assert!(matches!(commands[2], RenderCommand::MoveDisc { .. }));
        assert!(matches!(commands[3], RenderCommand::SetShadow(_)));
        assert_eq!(commands[4], RenderCommand::StopOscillation);
    }

    #[test]
    fn test_update_clamps_before_mapping() {
        let mut engine = TemperatureEngine::new();
        let commands = engine.update(-500.0).unwrap();
        assert_eq!(
            commands[0],
            RenderCommand::SetTemperatureText("-200.0 °C".to_string())
        );
        assert_eq!(engine.state().unwrap().vertical_offset, -54.0);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut engine = TemperatureEngine::new();
        engine.update(-120.0).unwrap();
        let first = *engine.state().unwrap();
        let commands = engine.update(-120.0).unwrap();
        assert_eq!(*engine.state().unwrap(), first);
        assert_eq!(engine.update(-120.0).unwrap(), commands);
    }

    #[test]
    fn test_levitation_latch_fires_once() {
        let mut engine = TemperatureEngine::new();
        let mut notified = 0;
        for t in [25.0, -190.0, -196.0, -199.0, -140.0, 0.0, -197.0, -200.0] {
            let commands = engine.update(t).unwrap();
            notified += commands
                .iter()
                .filter(|c| **c == RenderCommand::NotifyLevitation)
                .count();
        }
        assert_eq!(notified, 1);
        assert!(engine.levitation_notified());
        assert!(engine.state().unwrap().levitation_notified);
    }

    #[test]
    fn test_oscillation_follows_band() {
        let mut engine = TemperatureEngine::new();
        assert!(engine
            .update(-195.8)
            .unwrap()
            .contains(&RenderCommand::StartOscillation));
        assert!(engine
            .update(-195.7)
            .unwrap()
            .contains(&RenderCommand::StopOscillation));
    }

    #[test]
    fn test_pulse_near_checkpoint() {
        let mut engine = TemperatureEngine::new();
        assert!(engine
            .update(-150.3)
            .unwrap()
            .contains(&RenderCommand::PulseStateCard));
        assert!(!engine
            .update(-160.0)
            .unwrap()
            .contains(&RenderCommand::PulseStateCard));
    }

    #[test]
    fn test_non_numeric_input_is_rejected() {
        let mut engine = TemperatureEngine::new();
        engine.update(-50.0).unwrap();
        let before = *engine.state().unwrap();

        for raw in ["", "abc", "NaN", "inf", "-12,5"] {
            let result = engine.update_from_str(raw);
            assert!(matches!(result, Err(Error::NonNumericInput(_))), "{:?}", raw);
        }
        assert!(engine.update(f64::NAN).is_err());
        assert_eq!(*engine.state().unwrap(), before);
    }

    #[test]
    fn test_update_from_str_accepts_padded_numbers() {
        let mut engine = TemperatureEngine::new();
        engine.update_from_str(" -87.5 ").unwrap();
        assert_relative_eq!(engine.state().unwrap().vertical_offset, -27.0);
    }
}
