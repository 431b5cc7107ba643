use approx::assert_relative_eq;
use meissner::animation::Repeat;
use meissner::backend::{AnimationBackend, ChangeSpec, ManualBackend, TweenBackend, VisualValues};
use meissner::scene::{Element, Scene, Tag};
use meissner::transform::Transform;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene() -> Scene {
    let mut scene = Scene::new();
    scene.insert(
        Element::new("disc", Tag::Group).with_transform(Transform::translate(210.0, 160.0)),
    );
    scene.insert(
        Element::new("shadow", Tag::Ellipse)
            .with_attr("rx", 50)
            .with_attr("ry", 12)
            .with_opacity(0.35),
    );
    scene.insert(Element::new("card", Tag::Div));
    scene
}

/// Run `change` on a fresh scene and let it play out completely
fn settle(backend: &mut dyn AnimationBackend, target: &str, change: &ChangeSpec) -> VisualValues {
    let mut scene = scene();
    backend.animate(&mut scene, target, change, 0.0).unwrap();

    let transition = &change.transition;
    let cycles = change.repeat.cycles().unwrap_or(1) as f64;
    let end = transition.delay_ms + transition.duration_ms * cycles;
    let mut now = 0.0;
    while now < end + 16.0 {
        now += 16.0;
        backend.tick(&mut scene, now);
    }
    assert!(!backend.is_animating(target));
    VisualValues::read(scene.get(target).unwrap())
}

fn assert_equivalent(target: &str, change: ChangeSpec) {
    let tweened = settle(&mut TweenBackend::new(), target, &change);
    let manual = settle(&mut ManualBackend::new(), target, &change);

    assert_relative_eq!(tweened.translate.0, manual.translate.0, epsilon = 1e-9);
    assert_relative_eq!(tweened.translate.1, manual.translate.1, epsilon = 1e-9);
    assert_relative_eq!(tweened.rotation, manual.rotation, epsilon = 1e-9);
    assert_relative_eq!(tweened.scale, manual.scale, epsilon = 1e-9);
    assert_relative_eq!(tweened.opacity, manual.opacity, epsilon = 1e-9);
    assert_eq!(tweened.rx.is_some(), manual.rx.is_some());
    if let (Some(a), Some(b)) = (tweened.rx, manual.rx) {
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }
    if let (Some(a), Some(b)) = (tweened.ry, manual.ry) {
        assert_relative_eq!(a, b, epsilon = 1e-9);
    }
}

#[test]
fn disc_move() {
    init_logger();
    assert_equivalent(
        "disc",
        ChangeSpec::new()
            .position(210.0, 133.0)
            .duration_ms(600.0)
            .ease_named("power2.out"),
    );
}

#[test]
fn shadow_geometry() {
    init_logger();
    assert_equivalent(
        "shadow",
        ChangeSpec::new()
            .radii(18.0, 6.0)
            .opacity(0.08)
            .duration_ms(450.0)
            .ease_named("ease"),
    );
}

#[test]
fn delayed_rotation() {
    init_logger();
    assert_equivalent(
        "disc",
        ChangeSpec::new()
            .rotation(-6.0)
            .duration_ms(300.0)
            .delay_ms(120.0)
            .ease_named("sine.inOut"),
    );
}

#[test]
fn pulse_returns_to_rest() {
    init_logger();
    let pulse = ChangeSpec::new()
        .scale(1.02)
        .duration_ms(175.0)
        .ease_named("ease-out")
        .yoyo(true)
        .repeat(Repeat::Times(1));
    assert_equivalent("card", pulse.clone());

    let rest = settle(&mut ManualBackend::new(), "card", &pulse);
    assert_relative_eq!(rest.scale, 1.0);
}

#[test]
fn even_yoyo_ends_on_target() {
    init_logger();
    let change = ChangeSpec::new()
        .opacity(0.0)
        .duration_ms(100.0)
        .yoyo(true)
        .repeat(Repeat::Times(2));
    assert_equivalent("shadow", change.clone());

    let end = settle(&mut TweenBackend::new(), "shadow", &change);
    assert_relative_eq!(end.opacity, 0.0);
}

#[test]
fn instant_set() {
    init_logger();
    for backend in [
        Box::new(TweenBackend::new()) as Box<dyn AnimationBackend>,
        Box::new(ManualBackend::new()),
    ] {
        let mut backend = backend;
        let mut scene = scene();
        backend
            .set(&mut scene, "disc", &ChangeSpec::new().rotation(0.0).scale(1.5), 0.0)
            .unwrap();
        let values = VisualValues::read(scene.get("disc").unwrap());
        assert_eq!((values.rotation, values.scale), (0.0, 1.5));
        assert!(!backend.is_animating("disc"));
    }
}

#[test]
fn failures_are_reported_not_applied() {
    init_logger();
    for mut backend in [
        Box::new(TweenBackend::new()) as Box<dyn AnimationBackend>,
        Box::new(ManualBackend::new()),
    ] {
        let mut scene = scene();
        assert!(backend
            .animate(&mut scene, "missing", &ChangeSpec::new().x(1.0), 0.0)
            .is_err());
        assert!(backend
            .animate(&mut scene, "disc", &ChangeSpec::new(), 0.0)
            .is_err());
        assert!(backend
            .animate(&mut scene, "shadow", &ChangeSpec::new().radii(-1.0, 2.0), 0.0)
            .is_err());
        assert_eq!(scene.get("shadow").unwrap().attr_f64("rx"), Some(50.0));
    }
}
