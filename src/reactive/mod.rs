//! Minimal signal/effect runtime that drives the stage from its input control.

pub mod effect;
pub mod runtime;
pub mod signal;

pub use effect::{create_effect, Effect};
pub use signal::{create_signal, Signal};
