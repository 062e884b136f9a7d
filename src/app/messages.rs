use crate::lifecycle::GenerationOutcome;
use std::path::PathBuf;

/// Messages from background tasks to the main UI thread
pub enum BackgroundMessage {
    /// A try-on request resolved; applied only if `generation` is still current
    GenerationFinished {
        generation: u64,
        outcome: GenerationOutcome,
    },
    /// The displayed result was written to disk
    ResultSaved { path: PathBuf },
    /// Generic error (e.g. a crashed background task)
    Error(String),
}
