use super::{apply_origin, target_mut, AnimationBackend, ChangeSpec, Props, VisualValues};
use crate::animation::{AdvanceResult, Tween};
use crate::scene::Scene;
use crate::Result;

struct ActiveTween {
    target: String,
    /// Properties this tween still owns; newer tweens take theirs away
    props: Props,
    change: ChangeSpec,
    tween: Tween<VisualValues>,
}

/// Backend that plays every change as a tween, advanced on each tick.
///
/// A new tween takes over the properties it shares with older tweens on the
/// same target, so two tweens never fight over one value.
#[derive(Default)]
pub struct TweenBackend {
    tweens: Vec<ActiveTween>,
}

impl TweenBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tweens still running
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }
}

impl AnimationBackend for TweenBackend {
    fn name(&self) -> &'static str {
        "tween"
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

        // Don't restart if we're already running this exact change
        if self
            .tweens
            .iter()
            .any(|active| active.target == target && active.change == *change)
        {
            return Ok(());
        }

        let props = change.props();
        for active in self.tweens.iter_mut().filter(|a| a.target == target) {
            active.props.remove(props);
        }
        self.tweens.retain(|active| !active.props.is_empty());

        apply_origin(element, change);
        let start = VisualValues::read(element);
        let end = change.apply_to(&start);
        let mut tween = Tween::new(start, end, change.transition.clone(), now_ms)
            .repeat(change.repeat)
            .yoyo(change.yoyo);

        if let AdvanceResult::Changed(values) = tween.advance(now_ms) {
            values.write(element, props);
        }
        if tween.is_animating() {
            self.tweens.push(ActiveTween {
                target: target.to_string(),
                props,
                change: change.clone(),
                tween,
            });
        }
        Ok(())
    }

    fn kill_tweens_of(&mut self, target: &str) {
        self.tweens.retain(|active| active.target != target);
    }

    fn tick(&mut self, scene: &mut Scene, now_ms: f64) {
        self.tweens.retain_mut(|active| {
            let Some(element) = scene.get_mut(&active.target) else {
                log::warn!("Dropping tween on missing element #{}", active.target);
                return false;
            };
            if let AdvanceResult::Changed(values) = active.tween.advance(now_ms) {
                values.write(element, active.props);
            }
            active.tween.is_animating()
        });
    }

    fn is_animating(&self, target: &str) -> bool {
        self.tweens.iter().any(|active| active.target == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Repeat, TimingFunction};
    use crate::scene::{Element, Tag};
    use crate::Error;

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.insert(
            Element::new("shadow", Tag::Ellipse)
                .with_attr("rx", 50)
                .with_attr("ry", 12)
                .with_opacity(0.35),
        );
        scene.insert(Element::new("circle", Tag::Circle));
        scene
    }

    #[test]
    fn test_tween_interpolates_over_time() {
        let mut scene = scene();
        let mut backend = TweenBackend::new();
        let change = ChangeSpec::new()
            .radii(30.0, 8.0)
            .duration_ms(400.0)
            .ease(TimingFunction::Linear);

        backend.animate(&mut scene, "shadow", &change, 0.0).unwrap();
        assert_eq!(scene.get("shadow").unwrap().attr_f64("rx"), Some(50.0));

        backend.tick(&mut scene, 200.0);
        assert_eq!(scene.get("shadow").unwrap().attr_f64("rx"), Some(40.0));

        backend.tick(&mut scene, 400.0);
        let shadow = scene.get("shadow").unwrap();
        assert_eq!(shadow.attr_f64("rx"), Some(30.0));
        assert_eq!(shadow.attr_f64("ry"), Some(8.0));
        assert!(!backend.is_animating("shadow"));
    }

    #[test]
    fn test_zero_duration_applies_immediately() {
        let mut scene = scene();
        let mut backend = TweenBackend::new();

        backend
            .set(&mut scene, "circle", &ChangeSpec::new().rotation(12.0), 0.0)
            .unwrap();

        assert_eq!(scene.get("circle").unwrap().transform().rotate, 12.0);
        assert_eq!(backend.active_count(), 0);
    }

    #[test]
    fn test_newer_tween_takes_over_shared_props() {
        let mut scene = scene();
        let mut backend = TweenBackend::new();
        let linear = |change: ChangeSpec| change.duration_ms(100.0).ease(TimingFunction::Linear);

        backend
            .animate(&mut scene, "shadow", &linear(ChangeSpec::new().radii(0.0, 0.0).opacity(0.0)), 0.0)
            .unwrap();
        backend
            .animate(&mut scene, "shadow", &linear(ChangeSpec::new().radii(60.0, 20.0)), 0.0)
            .unwrap();
        backend.tick(&mut scene, 100.0);

        let shadow = scene.get("shadow").unwrap();
        assert_eq!(shadow.attr_f64("rx"), Some(60.0));
        assert_eq!(shadow.attr_f64("ry"), Some(20.0));
        // Opacity stayed with the first tween
        assert_eq!(shadow.opacity(), 0.0);
    }

    #[test]
    fn test_identical_running_tween_is_not_restarted() {
        let mut scene = scene();
        let mut backend = TweenBackend::new();
        let swing = ChangeSpec::new()
            .rotation(6.0)
            .duration_ms(1200.0)
            .ease(TimingFunction::Linear)
            .yoyo(true)
            .repeat(Repeat::Forever);

        backend.animate(&mut scene, "circle", &swing, 0.0).unwrap();
        backend.tick(&mut scene, 600.0);
        backend.animate(&mut scene, "circle", &swing, 600.0).unwrap();
        backend.tick(&mut scene, 1200.0);

        assert_eq!(backend.active_count(), 1);
        assert_eq!(scene.get("circle").unwrap().transform().rotate, 6.0);
    }

    #[test]
    fn test_kill_stops_infinite_tween() {
        let mut scene = scene();
        let mut backend = TweenBackend::new();
        let swing = ChangeSpec::new()
            .rotation(6.0)
            .duration_ms(1200.0)
            .yoyo(true)
            .repeat(Repeat::Forever);

        backend.animate(&mut scene, "circle", &swing, 0.0).unwrap();
        backend.kill_tweens_of("circle");
        backend
            .set(&mut scene, "circle", &ChangeSpec::new().rotation(0.0), 0.0)
            .unwrap();
        backend.tick(&mut scene, 700.0);

        assert!(!backend.is_animating("circle"));
        assert_eq!(scene.get("circle").unwrap().transform().rotate, 0.0);
    }

    #[test]
    fn test_missing_target_is_an_error() {
        let mut scene = scene();
        let mut backend = TweenBackend::new();
        let result = backend.animate(&mut scene, "ghost", &ChangeSpec::new().opacity(1.0), 0.0);
        assert!(matches!(result, Err(Error::MissingTarget(id)) if id == "ghost"));
    }

    #[test]
    fn test_tween_on_removed_element_is_dropped() {
        let mut scene = scene();
        let mut backend = TweenBackend::new();
        backend
            .animate(&mut scene, "shadow", &ChangeSpec::new().opacity(0.0), 0.0)
            .unwrap();
        scene.remove("shadow");
        backend.tick(&mut scene, 100.0);
        assert_eq!(backend.active_count(), 0);
    }
}
