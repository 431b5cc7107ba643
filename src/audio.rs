//! Ambient audio: one lazily created, loopable track behind a play/pause button.
//!
//! Playback may be refused by the host (autoplay policies). A refused start is
//! retried muted, with an un-mute scheduled shortly after; if that fails too
//! the user gets a notice.

use std::path::{Path, PathBuf};

use crate::scene::{ids, Element, Scene, Tag};
use crate::{Error, Result};

pub const LABEL_PLAY: &str = "🔊 Ambient sound";
pub const LABEL_STOP: &str = "🔇 Stop sound";
pub const PLAYBACK_FAILED: &str =
    "Audio could not be played. Check the log for errors about the audio file or autoplay policies.";

/// A playable audio resource provided by the host.
pub trait AudioOutput {
    fn is_paused(&self) -> bool;

    /// Start playback. Fails with [`Error::PlaybackDenied`] when the host refuses.
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn is_muted(&self) -> bool;

    fn set_muted(&mut self, muted: bool);

    fn set_volume(&mut self, volume: f64);

    fn set_looping(&mut self, looping: bool);

    /// Re-read the source before playing
    fn reload(&mut self) {}

    /// Human-readable state dump for diagnostics
    fn describe(&self) -> String {
        format!("paused={} muted={}", self.is_paused(), self.is_muted())
    }
}

/// Output that accepts every request; used when no real audio device is wired in.
#[derive(Clone, Debug)]
pub struct SilentOutput {
    source: String,
    paused: bool,
    muted: bool,
    volume: f64,
    looping: bool,
}

impl SilentOutput {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            paused: true,
            muted: false,
            volume: 1.0,
            looping: false,
        }
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl AudioOutput for SilentOutput {
    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<()> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn describe(&self) -> String {
        format!(
            "src={} paused={} muted={} volume={}",
            self.source, self.paused, self.muted, self.volume
        )
    }
}

/// Whether the audio asset can be found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetStatus {
    Available,
    Missing,
    /// The location could not be checked (no access, unsupported scheme, ...)
    Unverifiable,
}

pub trait AssetProbe {
    fn probe(&self, source: &str) -> AssetStatus;
}

/// Looks the asset up relative to a directory on disk.
#[derive(Clone, Debug)]
pub struct FsProbe {
    root: PathBuf,
}

impl FsProbe {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

impl AssetProbe for FsProbe {
    fn probe(&self, source: &str) -> AssetStatus {
        match std::fs::metadata(self.root.join(source)) {
            Ok(metadata) if metadata.is_file() => AssetStatus::Available,
            Ok(_) => AssetStatus::Missing,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => AssetStatus::Missing,
            Err(err) => {
                log::warn!("Could not check {}: {}", source, err);
                AssetStatus::Unverifiable
            }
        }
    }
}

/// Result of pressing the play/pause button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    /// Started muted after the first attempt was refused; un-mute pending
    StartedMuted,
    Paused,
    Failed,
}

pub type OutputFactory = Box<dyn FnMut(&str) -> Box<dyn AudioOutput>>;

/// The page's single ambient track.
pub struct AmbientAudio {
    source: String,
    volume: f64,
    factory: OutputFactory,
    output: Option<Box<dyn AudioOutput>>,
    unlock_attempted: bool,
}

impl AmbientAudio {
    pub fn new(source: impl Into<String>, volume: f64, factory: OutputFactory) -> Self {
        Self {
            source: source.into(),
            volume,
            factory,
            output: None,
            unlock_attempted: false,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_created(&self) -> bool {
        self.output.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.output.as_ref().is_some_and(|output| !output.is_paused())
    }

    /// The audio resource, created on first use
    pub fn output(&mut self) -> &mut dyn AudioOutput {
        let Self {
            output,
            factory,
            source,
            ..
        } = self;
        output
            .get_or_insert_with(|| {
                let mut created = factory(source);
                created.set_looping(true);
                log::info!("Ambient audio created ({})", source);
                created
            })
            .as_mut()
    }

    /// Make sure the page has a play button and an audio element to show state on
    pub fn ensure_controls(scene: &mut Scene, source: &str) {
        if !scene.contains(ids::PLAY_AUDIO) {
            scene.insert(
                Element::new(ids::PLAY_AUDIO, Tag::Button)
                    .with_attr("type", "button")
                    .with_attr("aria-pressed", "false")
                    .with_text(LABEL_PLAY),
            );
            log::info!("Play button created");
        }
        if !scene.contains(ids::AMBIENT_AUDIO) {
            scene.insert(
                Element::new(ids::AMBIENT_AUDIO, Tag::Audio)
                    .with_attr("src", source)
                    .with_attr("loop", "true")
                    .with_attr("preload", "auto")
                    .hidden(),
            );
        }
    }

    /// Play if paused, pause if playing; reflect the result on the button.
    pub fn toggle(&mut self, scene: &mut Scene) -> ToggleOutcome {
        let volume = self.volume;
        let output = self.output();
        output.set_volume(volume);
        output.reload();

        if !output.is_paused() {
            output.pause();
            log::info!("Ambient audio paused");
            set_button(scene, false);
            return ToggleOutcome::Paused;
        }

        match output.play() {
            Ok(()) => {
                log::info!("Ambient audio playing");
                set_button(scene, true);
                return ToggleOutcome::Started;
            }
            Err(err) => log::warn!("Direct play failed: {}", err),
        }

        output.set_muted(true);
        match output.play() {
            Ok(()) => {
                log::info!("Ambient audio playing muted");
                set_button(scene, true);
                ToggleOutcome::StartedMuted
            }
            Err(err) => {
                log::error!("Muted play failed: {}", err);
                log::error!("Audio state: {}", output.describe());
                ToggleOutcome::Failed
            }
        }
    }

    /// Second half of the muted retry
    pub fn unmute(&mut self) {
        if let Some(output) = self.output.as_mut() {
            output.set_muted(false);
        }
    }

    /// First user interaction: prime playback by starting and stopping once.
    pub fn unlock(&mut self) {
        if self.unlock_attempted {
            return;
        }
        self.unlock_attempted = true;
        let output = self.output();
        if !output.is_paused() {
            return;
        }
        match output.play() {
            Ok(()) => {
                output.pause();
                log::debug!("Audio unlocked");
            }
            Err(err) => log::debug!("Audio unlock refused: {}", err),
        }
    }

    /// Check that the asset exists. Returns a user-facing message when it is missing.
    pub fn check_asset(&self, probe: &dyn AssetProbe) -> (AssetStatus, Option<String>) {
        let status = probe.probe(&self.source);
        let notice = match status {
            AssetStatus::Available => {
                log::info!("{} available", self.source);
                None
            }
            AssetStatus::Missing => {
                log::error!("{} not found", self.source);
                Some(format!(
                    "{} was not found. Place it next to the page and reload.",
                    self.source
                ))
            }
            AssetStatus::Unverifiable => {
                log::info!("Could not verify {}; make sure it sits next to the page", self.source);
                None
            }
        };
        (status, notice)
    }
}

fn set_button(scene: &mut Scene, playing: bool) {
    let Some(button) = scene.get_mut(ids::PLAY_AUDIO) else {
        log::warn!("{}", Error::MissingTarget(ids::PLAY_AUDIO.to_string()));
        return;
    };
    button.set_text(if playing { LABEL_STOP } else { LABEL_PLAY });
    button.set_attr("aria-pressed", playing);
}
