use super::{apply_origin, target_mut, AnimationBackend, ChangeSpec, Props, VisualValues};
use crate::scene::Scene;
use crate::scheduler::Scheduler;
use crate::Result;

/// Swing back to the start values, scheduled for when the forward leg ends
struct Reversal {
    target: String,
    props: Props,
    values: VisualValues,
    change: ChangeSpec,
}

/// Fallback backend used when no tweening library is available.
///
/// Each change sets a CSS `transition` on the element and writes the end
/// values straight away; the host's style engine does the interpolation.
/// Yoyo changes that settle back on their start values get a single delayed
/// reversal, which is also the only approximation of an endless loop.
#[derive(Default)]
pub struct ManualBackend {
    reversals: Scheduler<Reversal>,
}

impl ManualBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reversals still waiting to fire
    pub fn pending_reversals(&self) -> usize {
        self.reversals.len()
    }
}

impl AnimationBackend for ManualBackend {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn animate(
        &mut self,
        scene: &mut Scene,
        target: &str,
        change: &ChangeSpec,
        now_ms: f64,
    ) -> Result<()> {
        change.validate(target)?;
        let element = target_mut(scene, target)?;

        if self
            .reversals
            .pending()
            .any(|reversal| reversal.target == target && reversal.change == *change)
        {
            return Ok(());
        }

        let props = change.props();
        self.reversals
            .cancel_where(|reversal| reversal.target == target && reversal.props.intersects(props));

        apply_origin(element, change);
        element.set_transition(Some(change.transition.css()));
        let start = VisualValues::read(element);
        change.apply_to(&start).write(element, props);

        if change.settles_on_start() {
            let due_ms = now_ms + change.transition.delay_ms + change.transition.duration_ms;
            self.reversals.schedule(
                due_ms,
                Reversal {
                    target: target.to_string(),
                    props,
                    values: start,
                    change: change.clone(),
                },
            );
        }
        Ok(())
    }

    fn kill_tweens_of(&mut self, target: &str) {
        self.reversals
            .cancel_where(|reversal| reversal.target == target);
    }

    fn tick(&mut self, scene: &mut Scene, now_ms: f64) {
        for reversal in self.reversals.drain_due(now_ms) {
            match scene.get_mut(&reversal.target) {
                Some(element) => reversal.values.write(element, reversal.props),
                None => log::warn!("Skipping reversal on missing element #{}", reversal.target),
            }
        }
    }

    fn is_animating(&self, target: &str) -> bool {
        self.reversals
            .pending()
            .any(|reversal| reversal.target == target)
    }
}
