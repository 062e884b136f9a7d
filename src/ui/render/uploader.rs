use crate::ui::helpers::key_hint;
use crate::ui::theme::Theme;
use crate::ui::App;
use crate::upload::format_size;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_uploader(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(" YOUR PHOTO ", Theme::title()));
    let inner_width = area.width.saturating_sub(4) as usize;

    let lines = match app.controller.upload() {
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  Upload Your Photo", Theme::text())),
            Line::from(Span::styled("  PNG, JPG, or WEBP", Theme::text_muted())),
            Line::from(""),
            Line::from(
                std::iter::once(Span::raw("  "))
                    .chain(key_hint("o", "choose a file"))
                    .collect::<Vec<_>>(),
            ),
        ],
        Some(image) => {
            let file = &image.file;
            let name = truncate_to_width(&file.name, inner_width.saturating_sub(16));
            vec![
                Line::from(vec![
                    Span::styled(format!("  {} ", name), Theme::selected()),
                    Span::styled(file.mime_type, Theme::text_muted()),
                ]),
                Line::from(Span::styled(
                    format!("  {}", format_size(file.size_bytes)),
                    Theme::text_muted(),
                )),
                Line::from(Span::styled(
                    format!("  {}", truncate_to_width(&image.preview.url(), inner_width)),
                    Theme::text_dim(),
                )),
                Line::from(""),
                Line::from(
                    std::iter::once(Span::raw("  "))
                        .chain(key_hint("o", "Change Photo"))
                        .collect::<Vec<_>>(),
                ),
            ]
        }
    };

    frame.render_widget(Paragraph::new(lines).block(block).style(Theme::bg()), area);
}
