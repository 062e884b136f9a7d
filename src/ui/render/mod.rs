mod footer;
mod form;
mod header;
mod prompt;
mod result;
mod toast;
mod uploader;

use crate::ui::theme::Theme;
use crate::ui::{App, InputMode};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame,
};

use footer::render_footer;
use form::render_form;
use header::render_header;
use prompt::render_path_prompt;
use result::render_result;
use toast::render_toast;
use uploader::render_uploader;

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Clear with dark background
    frame.render_widget(Block::default().style(Theme::bg()), area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, layout[0], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(layout[1]);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(columns[0]);

    render_uploader(frame, left[0], app);
    render_form(frame, left[1], app);
    render_result(frame, columns[1], app);
    render_footer(frame, layout[2], app);

    if app.input_mode == InputMode::PhotoPath {
        render_path_prompt(frame, &app.path_input);
    }

    if let Some(toast) = &app.toast {
        render_toast(frame, toast);
    }
}
