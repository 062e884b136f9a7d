//! Key handling for the fitting room
//!
//! Keys are first mapped to an [`Intent`], then dispatched. The mapping
//! depends only on the input mode and request state, so it is testable
//! without a terminal.

use crate::app::{background, RuntimeContext};
use crate::catalog::Dimension;
use crate::generator::ImageGenerator;
use crate::lifecycle::{RequestState, SubmitError};
use crate::ui::{App, InputMode, ToastKind};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
}

/// Everything a user can ask the fitting room to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open the path prompt
    BrowsePhoto,
    OpenPhoto(String),
    Focus(Step),
    Choose(Dimension, Step),
    Submit,
    StartOver,
    SaveResult,
    Quit,
}

/// Main key event handler
pub fn handle_key_event<G>(app: &mut App, key: KeyEvent, ctx: &RuntimeContext<G>) -> Result<()>
where
    G: ImageGenerator + 'static,
{
    if app.input_mode == InputMode::PhotoPath {
        return handle_path_input(app, key, ctx);
    }
    if let Some(intent) = intent_for_key(app, key) {
        dispatch(app, intent, ctx);
    }
    Ok(())
}

fn handle_path_input<G>(app: &mut App, key: KeyEvent, ctx: &RuntimeContext<G>) -> Result<()>
where
    G: ImageGenerator + 'static,
{
    if is_ctrl_c(&key) {
        dispatch(app, Intent::Quit, ctx);
        return Ok(());
    }
    match key.code {
        KeyCode::Esc => app.cancel_path_prompt(),
        KeyCode::Enter => {
            let path = app.take_path_input();
            dispatch(app, Intent::OpenPhoto(path), ctx);
        }
        KeyCode::Backspace => app.path_pop(),
        KeyCode::Char(c) => app.path_push(c),
        _ => {}
    }
    Ok(())
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Normal-mode key mapping
pub fn intent_for_key(app: &App, key: KeyEvent) -> Option<Intent> {
    if is_ctrl_c(&key) {
        return Some(Intent::Quit);
    }
    let intent = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
        KeyCode::Char('o') => Intent::BrowsePhoto,
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => Intent::Focus(Step::Next),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => Intent::Focus(Step::Previous),
        KeyCode::Right | KeyCode::Char('l') => Intent::Choose(app.focus, Step::Next),
        KeyCode::Left | KeyCode::Char('h') => Intent::Choose(app.focus, Step::Previous),
        KeyCode::Enter => Intent::Submit,
        KeyCode::Char('r') if app.state().is_terminal() => Intent::StartOver,
        KeyCode::Char('s') if matches!(app.state(), RequestState::Success(_)) => {
            Intent::SaveResult
        }
        _ => return None,
    };
    Some(intent)
}

pub fn dispatch<G>(app: &mut App, intent: Intent, ctx: &RuntimeContext<G>)
where
    G: ImageGenerator + 'static,
{
    match intent {
        Intent::BrowsePhoto => app.open_path_prompt(),
        Intent::OpenPhoto(raw) => match app.open_photo(&raw) {
            Ok(()) => {}
            Err(e) => {
                tracing::warn!(input = %raw, error = %e, "photo rejected");
                app.show_toast(&e.to_string(), ToastKind::Error);
            }
        },
        Intent::Focus(Step::Next) => app.focus_next(),
        Intent::Focus(Step::Previous) => app.focus_previous(),
        Intent::Choose(dimension, step) => {
            app.focus = dimension;
            match step {
                Step::Next => app.select_next_option(),
                Step::Previous => app.select_previous_option(),
            }
        }
        Intent::Submit => match app.submit() {
            Ok(ticket) => background::spawn_generation(ctx, ticket),
            // Shown inline by the form
            Err(SubmitError::NoImage) => {}
            Err(SubmitError::InFlight) => {
                app.show_toast(&SubmitError::InFlight.to_string(), ToastKind::Info);
            }
        },
        Intent::StartOver => app.start_over(),
        Intent::SaveResult => {
            if let RequestState::Success(image) = app.state() {
                let image = image.clone();
                let options = *app.controller.options();
                background::spawn_save(ctx, image, options);
            }
        }
        Intent::Quit => app.should_quit = true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::BackgroundMessage;
    use crate::lifecycle::tests::{photo, FakeGenerator};
    use crate::lifecycle::{Controller, GeneratedImage, GenerationError};
    use std::sync::atomic::Ordering;
    use std::sync::{mpsc, Arc};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_start_over_only_in_terminal_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Controller::default());
        assert_eq!(intent_for_key(&app, key(KeyCode::Char('r'))), None);

        app.controller.set_image(photo(&dir, "photo.jpg"));
        let ticket = app.submit().unwrap();
        assert_eq!(intent_for_key(&app, key(KeyCode::Char('r'))), None);

        app.complete(ticket.generation, Err(GenerationError::Crashed("x".into())));
        assert_eq!(
            intent_for_key(&app, key(KeyCode::Char('r'))),
            Some(Intent::StartOver)
        );
        assert_eq!(intent_for_key(&app, key(KeyCode::Char('s'))), None);
    }

    #[test]
    fn test_save_only_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(Controller::default());
        app.controller.set_image(photo(&dir, "photo.jpg"));
        let ticket = app.submit().unwrap();
        app.complete(ticket.generation, Ok(GeneratedImage::from_payload("QUJD")));
        assert_eq!(
            intent_for_key(&app, key(KeyCode::Char('s'))),
            Some(Intent::SaveResult)
        );
    }

    #[test]
    fn test_arrows_choose_focused_dimension() {
        let mut app = App::new(Controller::default());
        app.focus = Dimension::Fabric;
        assert_eq!(
            intent_for_key(&app, key(KeyCode::Right)),
            Some(Intent::Choose(Dimension::Fabric, Step::Next))
        );
        assert_eq!(
            intent_for_key(&app, key(KeyCode::BackTab)),
            Some(Intent::Focus(Step::Previous))
        );
        assert_eq!(
            intent_for_key(&app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Intent::Quit)
        );
    }

    #[tokio::test]
    async fn test_submit_without_photo_never_calls_generator() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel::<BackgroundMessage>();
        let generator = Arc::new(FakeGenerator::returning("unused"));
        let ctx = RuntimeContext {
            tx: &tx,
            generator: &generator,
            output_dir: dir.path(),
        };

        let mut app = App::new(Controller::default());
        handle_key_event(&mut app, key(KeyCode::Enter), &ctx).unwrap();
        tokio::task::yield_now().await;

        assert_eq!(app.state(), &RequestState::Idle);
        assert_eq!(
            app.controller.validation_message(),
            Some("Please upload an image first.")
        );
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_path_prompt_opens_photo() {
        let dir = tempfile::tempdir().unwrap();
        let path = photo(&dir, "kurta.png").path;
        let (tx, _rx) = mpsc::channel::<BackgroundMessage>();
        let generator = Arc::new(FakeGenerator::returning("unused"));
        let ctx = RuntimeContext {
            tx: &tx,
            generator: &generator,
            output_dir: dir.path(),
        };

        let mut app = App::new(Controller::default());
        handle_key_event(&mut app, key(KeyCode::Char('o')), &ctx).unwrap();
        assert_eq!(app.input_mode, InputMode::PhotoPath);
        for c in path.to_string_lossy().chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)), &ctx).unwrap();
        }
        // 'q' while typing is text, not quit
        assert!(!app.should_quit);
        handle_key_event(&mut app, key(KeyCode::Enter), &ctx).unwrap();

        assert_eq!(app.input_mode, InputMode::Normal);
        let upload = app.controller.upload().unwrap();
        assert_eq!(upload.file.name, "kurta.png");
        assert_eq!(upload.file.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_path_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel::<BackgroundMessage>();
        let generator = Arc::new(FakeGenerator::returning("unused"));
        let ctx = RuntimeContext {
            tx: &tx,
            generator: &generator,
            output_dir: dir.path(),
        };

        let mut app = App::new(Controller::default());
        handle_key_event(&mut app, key(KeyCode::Char('o')), &ctx).unwrap();
        handle_key_event(&mut app, key(KeyCode::Char('a')), &ctx).unwrap();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &ctx,
        )
        .unwrap();

        assert!(app.should_quit);
        assert_eq!(app.path_input, "a");
    }

    #[tokio::test]
    async fn test_bad_path_shows_error_toast() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, _rx) = mpsc::channel::<BackgroundMessage>();
        let generator = Arc::new(FakeGenerator::returning("unused"));
        let ctx = RuntimeContext {
            tx: &tx,
            generator: &generator,
            output_dir: dir.path(),
        };

        let mut app = App::new(Controller::default());
        dispatch(
            &mut app,
            Intent::OpenPhoto(dir.path().join("missing.jpg").display().to_string()),
            &ctx,
        );
        assert!(app.controller.upload().is_none());
        assert_eq!(app.toast.as_ref().unwrap().kind, ToastKind::Error);
    }
}
