use thiserror::Error;

/// Errors produced by the stage pipeline.
///
/// None of these are fatal to the stage: callers log them and carry on with
/// the next command or event.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Non-numeric temperature input: {0:?}")]
    NonNumericInput(String),
    #[error("Target element not found: #{0}")]
    MissingTarget(String),
    #[error("Malformed change for #{target}: {reason}")]
    MalformedChange { target: String, reason: String },
    #[error("Stage is borrowed; drop scene or state guards before sending input")]
    StageBusy,
    #[error("Playback denied: {0}")]
    PlaybackDenied(String),
    #[error("Failed to render snapshot: {0}")]
    Snapshot(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
