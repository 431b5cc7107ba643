//! The levitation stage: scene, engine, backend and audio wired together.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::audio::{
    AmbientAudio, AssetProbe, AssetStatus, AudioOutput, OutputFactory, SilentOutput,
    ToggleOutcome, PLAYBACK_FAILED,
};
use crate::backend::{select_backend, AnimationBackend, ChangeSpec};
use crate::engine::{
    clamp_temperature, parse_temperature, SimulationState, TemperatureEngine, T_MAX,
};
use crate::notification::LevitationCard;
use crate::reactive::{create_effect, create_signal, Effect, Signal};
use crate::render::{RenderContext, RenderReport, Renderer};
use crate::scene::{ids, Scene, Tag};
use crate::scheduler::Scheduler;
use crate::{Error, Result, StageConfig};

/// Elements the pipeline writes to, created as hidden placeholders if absent
const REQUIRED: [(&str, Tag); 9] = [
    (ids::TEMP_RANGE, Tag::Input),
    (ids::TEMP_VALUE, Tag::Span),
    (ids::STATE_TITLE, Tag::Div),
    (ids::STATE_DESC, Tag::Div),
    (ids::STATE_CARD, Tag::Div),
    (ids::SIM_STAGE, Tag::Div),
    (ids::DISC_SIM, Tag::Group),
    (ids::DISC_CIRCLE, Tag::Circle),
    (ids::DISC_SHADOW, Tag::Ellipse),
];

#[derive(Clone, Copy, Debug, PartialEq)]
enum StageTask {
    Unmute,
}

/// One slider reading. The sequence number makes every input distinct so the
/// pipeline re-runs even when the value repeats.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Reading {
    seq: u64,
    temperature: f64,
}

/// Everything the stage owns, shared with the pipeline effect.
pub struct StageState {
    config: StageConfig,
    scene: Scene,
    engine: TemperatureEngine,
    backend: Box<dyn AnimationBackend>,
    renderer: Renderer,
    card: LevitationCard,
    audio: AmbientAudio,
    tasks: Scheduler<StageTask>,
    now_ms: f64,
    notices: Vec<String>,
    last_report: RenderReport,
}

impl StageState {
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn engine(&self) -> &TemperatureEngine {
        &self.engine
    }

    pub fn backend(&self) -> &dyn AnimationBackend {
        self.backend.as_ref()
    }

    pub fn card(&self) -> &LevitationCard {
        &self.card
    }

    pub fn audio(&self) -> &AmbientAudio {
        &self.audio
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// User-facing messages raised so far
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Outcome of the most recent render pass
    pub fn last_report(&self) -> &RenderReport {
        &self.last_report
    }

    fn run_pipeline(&mut self, temperature: f64) {
        let commands = match self.engine.update(temperature) {
            Ok(commands) => commands,
            Err(err) => {
                log::warn!("Ignoring reading: {}", err);
                return;
            }
        };
        let mut ctx = RenderContext {
            scene: &mut self.scene,
            backend: self.backend.as_mut(),
            card: &mut self.card,
            now_ms: self.now_ms,
        };
        self.last_report = self.renderer.apply(&commands, &mut ctx);
    }

    fn intro(&mut self) {
        let now_ms = self.now_ms;
        let settle = ChangeSpec::new().opacity(0.0);
        let reveal = ChangeSpec::new()
            .y(12.0)
            .opacity(1.0)
            .duration_ms(self.config.intro_duration_ms)
            .ease_named("power2.out");

        let result = self
            .backend
            .set(&mut self.scene, ids::SIM_STAGE, &settle, now_ms)
            .and_then(|()| {
                self.backend
                    .animate(&mut self.scene, ids::SIM_STAGE, &reveal, now_ms)
            });
        if let Err(err) = result {
            log::warn!("Intro skipped: {}", err);
        }
    }
}

/// Interactive levitation stage.
///
/// Time is driven by the host through [`Stage::advance`]. Readings go through
/// a signal; an effect re-runs the engine and renderer for each one.
pub struct Stage {
    state: Rc<RefCell<StageState>>,
    reading: Signal<Reading>,
    _pipeline: Effect,
}

impl Stage {
    /// Stage over the stock page with a silent audio output
    pub fn new(config: StageConfig) -> Self {
        Self::with_scene(config, Scene::page())
    }

    pub fn with_scene(config: StageConfig, scene: Scene) -> Self {
        let factory: OutputFactory =
            Box::new(|source: &str| Box::new(SilentOutput::new(source)) as Box<dyn AudioOutput>);
        Self::with_audio(config, scene, factory)
    }

    pub fn with_audio(config: StageConfig, mut scene: Scene, audio: OutputFactory) -> Self {
        for (id, tag) in REQUIRED {
            scene.ensure(id, tag);
        }
        AmbientAudio::ensure_controls(&mut scene, &config.audio_source);

        let initial = scene
            .get(ids::TEMP_RANGE)
            .and_then(|range| range.attr_f64("value"))
            .filter(|value| value.is_finite())
            .unwrap_or(T_MAX);

        let mut state = StageState {
            engine: TemperatureEngine::new().with_pulse_window(config.pulse_window),
            backend: select_backend(config.tween_library),
            renderer: Renderer::new(&config),
            card: LevitationCard::new(config.notification_hide_ms),
            audio: AmbientAudio::new(config.audio_source.clone(), config.audio_volume, audio),
            tasks: Scheduler::new(),
            now_ms: 0.0,
            notices: Vec::new(),
            last_report: RenderReport::default(),
            scene,
            config,
        };
        if state.config.intro {
            state.intro();
        }

        let state = Rc::new(RefCell::new(state));
        let reading = create_signal(Reading {
            seq: 0,
            temperature: initial,
        });
        let pipeline = create_effect({
            let state = state.clone();
            let reading = reading.clone();
            move || {
                let Reading { temperature, .. } = reading.get();
                state.borrow_mut().run_pipeline(temperature);
            }
        });

        Self {
            state,
            reading,
            _pipeline: pipeline,
        }
    }

    /// Slider input as typed by the host. Rejected readings change nothing.
    pub fn input(&self, raw: &str) -> Result<()> {
        let temperature = parse_temperature(raw).inspect_err(|err| log::warn!("{}", err))?;
        self.push_reading(temperature)
    }

    pub fn set_temperature(&self, temperature: f64) -> Result<()> {
        if !temperature.is_finite() {
            let err = Error::NonNumericInput(temperature.to_string());
            log::warn!("{}", err);
            return Err(err);
        }
        self.push_reading(temperature)
    }

    fn push_reading(&self, temperature: f64) -> Result<()> {
        {
            let Ok(mut state) = self.state.try_borrow_mut() else {
                log::warn!("{}", Error::StageBusy);
                return Err(Error::StageBusy);
            };
            if let Some(range) = state.scene.get_mut(ids::TEMP_RANGE) {
                range.set_attr("value", clamp_temperature(temperature));
            }
        }
        self.reading.update(|reading| {
            reading.seq += 1;
            reading.temperature = temperature;
        });
        Ok(())
    }

    /// Move the clock forward by `dt_ms` and run everything that came due.
    pub fn advance(&self, dt_ms: f64) {
        let mut state = self.state.borrow_mut();
        let StageState {
            scene,
            backend,
            card,
            audio,
            tasks,
            now_ms,
            ..
        } = &mut *state;

        *now_ms += dt_ms.max(0.0);
        backend.tick(scene, *now_ms);
        card.tick(scene, *now_ms);
        for task in tasks.drain_due(*now_ms) {
            match task {
                StageTask::Unmute => audio.unmute(),
            }
        }
    }

    /// Play/pause button
    pub fn toggle_audio(&self) -> ToggleOutcome {
        let mut state = self.state.borrow_mut();
        let StageState {
            scene,
            audio,
            tasks,
            notices,
            now_ms,
            config,
            ..
        } = &mut *state;

        let outcome = audio.toggle(scene);
        match outcome {
            ToggleOutcome::StartedMuted => {
                tasks.schedule(*now_ms + config.unmute_delay_ms, StageTask::Unmute);
            }
            ToggleOutcome::Failed => notices.push(PLAYBACK_FAILED.to_string()),
            ToggleOutcome::Started | ToggleOutcome::Paused => {}
        }
        outcome
    }

    /// Any click, key press or touch on the page
    pub fn user_interaction(&self) {
        self.state.borrow_mut().audio.unlock();
    }

    pub fn check_audio_asset(&self, probe: &dyn AssetProbe) -> AssetStatus {
        let mut state = self.state.borrow_mut();
        let (status, notice) = state.audio.check_asset(probe);
        state.notices.extend(notice);
        status
    }

    /// Close button on the levitation card
    pub fn dismiss_notification(&self) {
        let mut state = self.state.borrow_mut();
        let StageState { scene, card, .. } = &mut *state;
        card.dismiss(scene);
    }

    /// Shared view of the stage.
    ///
    /// Drop the guard before calling any other method: input and clock calls
    /// need the state mutably and fail or panic while a guard is alive.
    pub fn state(&self) -> Ref<'_, StageState> {
        self.state.borrow()
    }

    /// Mutable access, e.g. for a host that removes elements from the page.
    /// The same borrowing rule as [`Stage::state`] applies.
    pub fn state_mut(&self) -> RefMut<'_, StageState> {
        self.state.borrow_mut()
    }

    /// Shared view of the scene; see [`Stage::state`] for the borrowing rule.
    pub fn scene(&self) -> Ref<'_, Scene> {
        Ref::map(self.state.borrow(), |state| &state.scene)
    }

    pub fn simulation(&self) -> Option<SimulationState> {
        self.state.borrow().engine.state().copied()
    }

    pub fn notices(&self) -> Vec<String> {
        self.state.borrow().notices.clone()
    }

    pub fn backend_name(&self) -> &'static str {
        self.state.borrow().backend.name()
    }
}
