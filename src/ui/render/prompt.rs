use crate::ui::helpers::centered_box;
use crate::ui::theme::Theme;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub(super) fn render_path_prompt(frame: &mut Frame, input: &str) {
    let area = centered_box(70, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::selected())
        .title(Span::styled(" Open photo (PNG, JPG, or WEBP) ", Theme::title()))
        .style(Theme::bg());

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!(" {} ", Theme::ARROW_RIGHT), Theme::key()),
            Span::styled(input, Theme::text()),
            Span::styled("_", Theme::text_dim()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
