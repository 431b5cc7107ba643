//! Applies engine output to the scene through the selected backend.

use crate::animation::Repeat;
use crate::backend::{AnimationBackend, ChangeSpec};
use crate::engine::{RenderCommand, ShadowGeometry};
use crate::notification::LevitationCard;
use crate::scene::{ids, Scene};
use crate::{Error, Result, StageConfig};

/// Everything a render pass writes to.
pub struct RenderContext<'a> {
    pub scene: &'a mut Scene,
    pub backend: &'a mut dyn AnimationBackend,
    pub card: &'a mut LevitationCard,
    pub now_ms: f64,
}

/// Outcome of one render pass
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub applied: usize,
    pub failed: usize,
}

/// Turns [`RenderCommand`]s into text writes and backend changes.
#[derive(Clone, Debug)]
pub struct Renderer {
    config: StageConfig,
}

impl Renderer {
    pub fn new(config: &StageConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn disc_change(&self, offset: f64) -> ChangeSpec {
        let (x, y) = self.config.disc_anchor;
        ChangeSpec {
            transition: self.config.disc_transition.clone(),
            ..ChangeSpec::new().position(x, y + offset)
        }
    }

    pub fn shadow_change(&self, shadow: &ShadowGeometry) -> ChangeSpec {
        ChangeSpec {
            transition: self.config.shadow_transition.clone(),
            ..ChangeSpec::new()
                .radii(shadow.rx, shadow.ry)
                .opacity(shadow.opacity)
        }
    }

    pub fn oscillation_change(&self) -> ChangeSpec {
        ChangeSpec::new()
            .rotation(self.config.oscillation_amplitude)
            .origin(50.0, 50.0)
            .duration_ms(self.config.oscillation_period_ms)
            .ease_named("sine.inOut")
            .yoyo(true)
            .repeat(Repeat::Forever)
    }

    pub fn pulse_change(&self) -> ChangeSpec {
        ChangeSpec::new()
            .scale(self.config.pulse_scale)
            .duration_ms(self.config.pulse_duration_ms / 2.0)
            .ease_named("ease-out")
            .yoyo(true)
            .repeat(Repeat::Times(1))
    }

    /// Apply `commands` in order. A failing command is logged and skipped;
    /// the rest still run.
    pub fn apply(&self, commands: &[RenderCommand], ctx: &mut RenderContext<'_>) -> RenderReport {
        let mut report = RenderReport::default();
        for command in commands {
            match self.apply_one(command, ctx) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    log::warn!("Skipping {:?}: {}", command, err);
                    report.failed += 1;
                }
            }
        }
        report
    }

    fn apply_one(&self, command: &RenderCommand, ctx: &mut RenderContext<'_>) -> Result<()> {
        let now_ms = ctx.now_ms;
        match command {
            RenderCommand::SetTemperatureText(text) => set_text(ctx.scene, ids::TEMP_VALUE, text),
            RenderCommand::SetStateText { title, description } => {
                // Write both even if one is missing
                let title = set_text(ctx.scene, ids::STATE_TITLE, title);
                let description = set_text(ctx.scene, ids::STATE_DESC, description);
                title.and(description)
            }
            RenderCommand::MoveDisc { offset } => {
                ctx.backend
                    .animate(ctx.scene, ids::DISC_SIM, &self.disc_change(*offset), now_ms)
            }
            RenderCommand::SetShadow(shadow) => {
                ctx.backend
                    .animate(ctx.scene, ids::DISC_SHADOW, &self.shadow_change(shadow), now_ms)
            }
            RenderCommand::StartOscillation => ctx.backend.animate(
                ctx.scene,
                ids::DISC_CIRCLE,
                &self.oscillation_change(),
                now_ms,
            ),
            RenderCommand::StopOscillation => {
                // A running tween would keep writing over the reset
                ctx.backend.kill_tweens_of(ids::DISC_CIRCLE);
                ctx.backend.set(
                    ctx.scene,
                    ids::DISC_CIRCLE,
                    &ChangeSpec::new().rotation(0.0),
                    now_ms,
                )
            }
            RenderCommand::PulseStateCard => {
                ctx.backend
                    .animate(ctx.scene, ids::STATE_CARD, &self.pulse_change(), now_ms)
            }
            RenderCommand::NotifyLevitation => {
                ctx.card.show(ctx.scene, now_ms);
                Ok(())
            }
        }
    }
}

fn set_text(scene: &mut Scene, id: &str, text: &str) -> Result<()> {
    let element = scene
        .get_mut(id)
        .ok_or_else(|| Error::MissingTarget(id.to_string()))?;
    element.set_text(text);
    Ok(())
}
