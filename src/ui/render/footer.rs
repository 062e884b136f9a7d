use crate::ui::helpers::key_hint;
use crate::ui::theme::Theme;
use crate::ui::{App, InputMode};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw("  ")];

    if app.input_mode == InputMode::PhotoPath {
        spans.extend(key_hint("↵", "open"));
        spans.extend(key_hint("esc", "cancel"));
    } else {
        spans.extend(key_hint("o", "photo"));
        spans.extend(key_hint("↑↓", "field"));
        spans.extend(key_hint("←→", "option"));
        if !app.is_loading() {
            spans.extend(key_hint("↵", "try on"));
        }
        // Start Over is only offered once a request has finished.
        if app.state().is_terminal() {
            spans.extend(key_hint("r", "start over"));
        }
        if matches!(app.state(), crate::lifecycle::RequestState::Success(_)) {
            spans.extend(key_hint("s", "save"));
        }
        spans.extend(key_hint("q", "quit"));
    }

    let footer = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Theme::border()),
        )
        .style(Theme::bg());
    frame.render_widget(footer, area);
}
