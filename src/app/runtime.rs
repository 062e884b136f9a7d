//! Terminal runtime for the fitting room

use crate::app::messages::BackgroundMessage;
use crate::app::{background, input, RuntimeContext};
use crate::generator::ImageGenerator;
use crate::ui;
use crate::ui::App;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

/// Run the TUI until the user quits
pub async fn run_tui<G>(mut app: App, generator: Arc<G>, output_dir: PathBuf) -> Result<()>
where
    G: ImageGenerator + 'static,
{
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    tracing::info!(output_dir = %output_dir.display(), "fitting room opened");

    let result = run_loop(&mut terminal, &mut app, rx, tx, generator, output_dir);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("fitting room closed");
    result
}

/// Main event loop with background message handling
fn run_loop<B: Backend, G>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<BackgroundMessage>,
    tx: mpsc::Sender<BackgroundMessage>,
    generator: Arc<G>,
    output_dir: PathBuf,
) -> Result<()>
where
    G: ImageGenerator + 'static,
{
    let ctx = RuntimeContext {
        tx: &tx,
        generator: &generator,
        output_dir: &output_dir,
    };

    loop {
        // Clear expired toasts
        app.clear_expired_toast();

        // Advance spinner animation
        app.tick_loading();

        // Check for background messages (non-blocking)
        background::drain_messages(app, &rx);

        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with fast timeout (snappy animations)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                input::handle_key_event(app, key, &ctx)?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
