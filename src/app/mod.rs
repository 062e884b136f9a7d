pub mod background;
pub mod input;
pub mod messages;
pub mod runtime;

pub use messages::BackgroundMessage;
pub use runtime::run_tui;

use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;

/// What input handlers need to start background work.
pub struct RuntimeContext<'a, G> {
    pub tx: &'a mpsc::Sender<BackgroundMessage>,
    pub generator: &'a Arc<G>,
    pub output_dir: &'a Path,
}
