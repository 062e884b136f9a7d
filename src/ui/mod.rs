//! Fitting room UI
//!
//! Layout:
//! ╔══════════════════════════════════════════════════════════════╗
//! ║   Fatemi Tailors - Virtual Saya-Kurta Fitter                 ║
//! ╠═══════════════════════════╦══════════════════════════════════╣
//! ║  YOUR PHOTO               ║  YOUR VIRTUAL FITTING ROOM       ║
//! ║  photo.jpg  image/jpeg    ║                                  ║
//! ╠═══════════════════════════╣  ⠹ Stitching your new look...    ║
//! ║  CUSTOMIZE                ║                                  ║
//! ║  ▸ Fit     ‹ Slim Fit ›   ║                                  ║
//! ║    Color   ‹ White ›      ║                                  ║
//! ║  [ Virtually Try On ]     ║                                  ║
//! ╠═══════════════════════════╩══════════════════════════════════╣
//! ║  o photo  ↑↓ field  ←→ option  ↵ try on  r start over  q quit ║
//! ╚══════════════════════════════════════════════════════════════╝

pub mod helpers;
pub mod render;
pub mod rotator;
pub mod theme;

pub use render::render;

use crate::catalog::{Dimension, LOADING_MESSAGES, LOADING_MESSAGE_INTERVAL_MS};
use crate::lifecycle::{
    Completion, Controller, GenerationOutcome, RequestState, RequestTicket, SubmitError,
};
use crate::upload::{self, FileInputError};
use rotator::StatusRotator;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing the path of a photo to open
    PhotoPath,
}

/// Spinner animation frames (braille pattern)
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// Duration in seconds before toast expires
    pub fn duration_secs(&self) -> u64 {
        match self {
            ToastKind::Info => 3,
            ToastKind::Success => 4,
            ToastKind::Error => 8,
        }
    }
}

/// Toast notification
pub struct Toast {
    pub message: String,
    pub created_at: Instant,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: &str, kind: ToastKind) -> Self {
        Self {
            message: message.to_string(),
            created_at: Instant::now(),
            kind,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs() >= self.kind.duration_secs()
    }
}

/// Everything the render functions read, plus the cosmetic loading state.
pub struct App {
    pub controller: Controller,
    pub focus: Dimension,
    pub input_mode: InputMode,
    pub path_input: String,
    pub toast: Option<Toast>,
    pub loading_frame: usize,
    pub last_saved: Option<PathBuf>,
    pub should_quit: bool,
    rotator: Option<StatusRotator>,
    runtime: Option<Handle>,
}

impl App {
    /// Picks up the current tokio runtime (if any) for the status rotator.
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            focus: Dimension::Fit,
            input_mode: InputMode::Normal,
            path_input: String::new(),
            toast: None,
            loading_frame: 0,
            last_saved: None,
            should_quit: false,
            rotator: None,
            runtime: Handle::try_current().ok(),
        }
    }

    pub fn state(&self) -> &RequestState {
        self.controller.state()
    }

    pub fn is_loading(&self) -> bool {
        self.controller.state().is_loading()
    }

    /// Rotating status line while a try-on is generating.
    pub fn status_message(&self) -> Option<&'static str> {
        if !self.is_loading() {
            return None;
        }
        match &self.rotator {
            Some(rotator) if self.is_rotating() => Some(rotator.message()),
            _ => Some(LOADING_MESSAGES[0]),
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.rotator.as_ref().is_some_and(StatusRotator::is_running)
    }

    /// Advance spinner frame
    pub fn tick_loading(&mut self) {
        if self.is_loading() {
            self.loading_frame = self.loading_frame.wrapping_add(1);
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.loading_frame % SPINNER_FRAMES.len()]
    }

    /// Start the rotator on entering `Loading`, drop it on every other state.
    pub fn sync_loading(&mut self) {
        let loading = self.is_loading();
        if loading && self.rotator.is_none() {
            if let Some(runtime) = &self.runtime {
                self.rotator = Some(StatusRotator::start(
                    runtime,
                    &LOADING_MESSAGES,
                    Duration::from_millis(LOADING_MESSAGE_INTERVAL_MS),
                ));
                tracing::debug!("status rotator started");
            }
        } else if !loading && self.rotator.take().is_some() {
            self.loading_frame = 0;
            tracing::debug!("status rotator stopped");
        }
    }

    pub fn show_toast(&mut self, message: &str, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind));
    }

    pub fn clear_expired_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn open_path_prompt(&mut self) {
        self.input_mode = InputMode::PhotoPath;
        self.path_input.clear();
    }

    pub fn cancel_path_prompt(&mut self) {
        self.input_mode = InputMode::Normal;
        self.path_input.clear();
    }

    pub fn path_push(&mut self, c: char) {
        self.path_input.push(c);
    }

    pub fn path_pop(&mut self) {
        self.path_input.pop();
    }

    /// Leave the prompt and hand back what was typed.
    pub fn take_path_input(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.path_input)
    }

    /// Resolve `raw` and make it the active upload.
    pub fn open_photo(&mut self, raw: &str) -> Result<(), FileInputError> {
        let file = upload::select_file(raw)?;
        self.controller.set_image(file);
        Ok(())
    }

    pub fn select_next_option(&mut self) {
        self.controller.select_next(self.focus);
    }

    pub fn select_previous_option(&mut self) {
        self.controller.select_previous(self.focus);
    }

    pub fn submit(&mut self) -> Result<RequestTicket, SubmitError> {
        let ticket = self.controller.submit();
        if ticket.is_ok() {
            self.last_saved = None;
        }
        self.sync_loading();
        ticket
    }

    pub fn complete(&mut self, generation: u64, outcome: GenerationOutcome) -> Completion {
        let completion = self.controller.complete(generation, outcome);
        self.sync_loading();
        completion
    }

    /// "Start Over": fresh session, rotator stopped.
    pub fn start_over(&mut self) {
        self.controller.reset();
        self.focus = Dimension::Fit;
        self.last_saved = None;
        self.cancel_path_prompt();
        self.sync_loading();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::tests::photo;
    use crate::lifecycle::{GeneratedImage, GenerationError};

    fn app_with_photo(dir: &tempfile::TempDir) -> App {
        let mut app = App::new(Controller::default());
        app.controller.set_image(photo(dir, "photo.jpg"));
        app
    }

    #[test]
    fn test_open_photo_rejects_unsupported_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let mut app = App::new(Controller::default());
        let err = app.open_photo(&path.to_string_lossy()).unwrap_err();
        assert!(matches!(err, FileInputError::UnsupportedType(_)));
        assert!(app.controller.upload().is_none());
    }

    #[test]
    fn test_path_prompt_round_trip() {
        let mut app = App::new(Controller::default());
        app.open_path_prompt();
        for c in "~/me.pngx".chars() {
            app.path_push(c);
        }
        app.path_pop();
        assert_eq!(app.take_path_input(), "~/me.png");
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.path_input.is_empty());
    }

    #[test]
    fn test_options_follow_focus() {
        let mut app = App::new(Controller::default());
        app.focus_next();
        assert_eq!(app.focus, Dimension::Color);
        app.select_next_option();
        assert_eq!(app.controller.options().color, crate::catalog::COLORS[1]);
        assert_eq!(app.controller.options().fit, crate::catalog::FITS[0]);
    }

    #[test]
    fn test_status_message_only_while_loading() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_photo(&dir);
        assert!(app.status_message().is_none());
        app.submit().unwrap();
        // No runtime here, so the first message stays up.
        assert_eq!(app.status_message(), Some(LOADING_MESSAGES[0]));
        assert!(!app.is_rotating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotator_runs_only_while_loading() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_photo(&dir);

        let ticket = app.submit().unwrap();
        assert!(app.is_rotating());

        tokio::time::advance(Duration::from_millis(LOADING_MESSAGE_INTERVAL_MS + 10)).await;
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        assert_eq!(app.status_message(), Some(LOADING_MESSAGES[1]));

        let completion = app.complete(
            ticket.generation,
            Err(GenerationError::Crashed("network down".to_string())),
        );
        assert_eq!(completion, Completion::Applied);
        assert!(!app.is_rotating());
        assert!(app.status_message().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_over_stops_rotator_and_resets() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_photo(&dir);
        app.focus = Dimension::Collar;
        app.select_next_option();
        let ticket = app.submit().unwrap();
        assert!(app.is_rotating());

        app.start_over();
        assert!(!app.is_rotating());
        assert_eq!(app.state(), &RequestState::Idle);
        assert_eq!(app.focus, Dimension::Fit);
        assert!(app.controller.upload().is_none());

        let late = app.complete(ticket.generation, Ok(GeneratedImage::from_payload("QUJD")));
        assert_eq!(late, Completion::Stale);
        assert_eq!(app.state(), &RequestState::Idle);
    }

    #[test]
    fn test_spinner_only_ticks_while_loading() {
        let mut app = App::new(Controller::default());
        app.tick_loading();
        assert_eq!(app.loading_frame, 0);
        assert_eq!(app.spinner(), SPINNER_FRAMES[0]);
    }

    #[test]
    fn test_toast_expiry() {
        let mut app = App::new(Controller::default());
        app.show_toast("+ Saved", ToastKind::Success);
        app.clear_expired_toast();
        assert!(app.toast.is_some());
        app.toast.as_mut().unwrap().created_at = Instant::now() - Duration::from_secs(60);
        app.clear_expired_toast();
        assert!(app.toast.is_none());
    }
}
