use crate::lifecycle::RequestState;
use crate::ui::helpers::key_hint;
use crate::ui::theme::Theme;
use crate::ui::App;
use crate::upload::format_size;
use crate::util::truncate_to_width;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub(super) fn render_result(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(" FITTING ROOM ", Theme::title()));
    let inner_width = area.width.saturating_sub(4) as usize;

    let mut lines = vec![Line::from(""), Line::from("")];
    match app.state() {
        RequestState::Idle => {
            lines.push(Line::from(Span::styled(
                "Your Virtual Fitting Room",
                Theme::title(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Upload a photo and customize your garment to see the result here.",
                Theme::text_muted(),
            )));
        }
        RequestState::Loading => {
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", app.spinner()), Theme::selected()),
                Span::styled("Please wait", Theme::title()),
            ]));
            lines.push(Line::from(""));
            if let Some(message) = app.status_message() {
                lines.push(Line::from(Span::styled(message, Theme::text_muted())));
            }
        }
        RequestState::Failure(message) => {
            lines.push(Line::from(Span::styled(
                format!("{} Generation Failed", Theme::CROSS_MARK),
                Theme::error(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(message.as_str(), Theme::text())));
        }
        RequestState::Success(image) => {
            lines.push(Line::from(Span::styled(
                format!("{} Your new look is ready", Theme::CHECK_MARK),
                Theme::success(),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                truncate_to_width(&image.data_uri(), inner_width),
                Theme::text_dim(),
            )));
            lines.push(Line::from(Span::styled(
                format!("{} of PNG data", format_size(image.payload().len() as u64)),
                Theme::text_muted(),
            )));
            lines.push(Line::from(""));
            match &app.last_saved {
                Some(path) => {
                    let shown = truncate_to_width(
                        &path.display().to_string(),
                        inner_width.saturating_sub(9),
                    );
                    lines.push(Line::from(Span::styled(
                        format!("Saved to {}", shown),
                        Theme::success(),
                    )));
                }
                None => lines.push(Line::from(key_hint("s", "save to disk").to_vec())),
            }
        }
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Theme::bg())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
