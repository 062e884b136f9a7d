//! Background task handling
//!
//! Channel sends use `let _ =`: a send only fails once the UI loop has
//! dropped its receiver during shutdown, and then nobody is listening.

use crate::app::messages::BackgroundMessage;
use crate::app::RuntimeContext;
use crate::customization::CustomizationOptions;
use crate::export;
use crate::generator::ImageGenerator;
use crate::lifecycle::{self, Completion, GeneratedImage, GenerationError, RequestTicket};
use crate::ui::{App, ToastKind};
use crate::util::truncate;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use std::sync::Arc;

pub fn drain_messages(app: &mut App, rx: &mpsc::Receiver<BackgroundMessage>) {
    while let Ok(msg) = rx.try_recv() {
        match msg {
            BackgroundMessage::GenerationFinished {
                generation,
                outcome,
            } => {
                let succeeded = outcome.is_ok();
                if app.complete(generation, outcome) == Completion::Applied && succeeded {
                    app.show_toast("+ Your try-on is ready", ToastKind::Success);
                }
            }
            BackgroundMessage::ResultSaved { path } => {
                app.show_toast(
                    &format!("+ Saved {}", truncate(&path.display().to_string(), 60)),
                    ToastKind::Success,
                );
                app.last_saved = Some(path);
            }
            BackgroundMessage::Error(e) => {
                app.show_toast(&truncate(&e, 80), ToastKind::Error);
            }
        }
    }
}

/// Run one try-on off the UI thread and report its outcome.
///
/// A panic inside the request still produces a completion for its
/// generation, so the UI never stays in `Loading`.
pub fn spawn_generation<G>(ctx: &RuntimeContext<G>, ticket: RequestTicket)
where
    G: ImageGenerator + 'static,
{
    let tx = ctx.tx.clone();
    let generator = Arc::clone(ctx.generator);
    tokio::spawn(async move {
        let generation = ticket.generation;
        let outcome = match AssertUnwindSafe(lifecycle::execute(&ticket, &*generator))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(panic) => {
                let detail = panic_detail(&*panic);
                tracing::error!(generation, detail = %detail, "generation task panicked");
                Err(GenerationError::Crashed(format!(
                    "Image generation crashed unexpectedly: {}",
                    detail
                )))
            }
        };
        let _ = tx.send(BackgroundMessage::GenerationFinished {
            generation,
            outcome,
        });
    });
}

/// Write the displayed result into the output directory.
pub fn spawn_save<G>(
    ctx: &RuntimeContext<G>,
    image: GeneratedImage,
    options: CustomizationOptions,
) {
    let tx = ctx.tx.clone();
    let dir = ctx.output_dir.to_path_buf();
    spawn_background(ctx.tx.clone(), "save_result", async move {
        match export::save_to_dir(&image, &options, &dir).await {
            Ok(path) => {
                let _ = tx.send(BackgroundMessage::ResultSaved { path });
            }
            Err(e) => {
                let _ = tx.send(BackgroundMessage::Error(e.to_string()));
            }
        }
    });
}

pub fn spawn_background<F>(tx: mpsc::Sender<BackgroundMessage>, task_name: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let _ = tx.send(BackgroundMessage::Error(format!(
                "Background task '{}' crashed unexpectedly: {}",
                task_name,
                panic_detail(&*panic)
            )));
        }
    });
}

fn panic_detail(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
