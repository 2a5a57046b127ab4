//! Caller-facing operations composed from the heuristics, STT and LLM layers.

pub mod context;
pub mod questions;
pub mod summary;
pub mod transcription;

pub use context::*;
pub use questions::*;
pub use summary::*;
pub use transcription::*;
