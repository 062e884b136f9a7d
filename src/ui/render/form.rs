use crate::catalog::Dimension;
use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const LABEL_WIDTH: usize = 15;

pub(super) fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(" CUSTOMIZE ", Theme::title()));

    let options = app.controller.options();
    let mut lines = vec![Line::from("")];

    for dimension in Dimension::ALL {
        let focused = dimension == app.focus;
        let marker = if focused {
            format!("  {} ", Theme::ARROW_RIGHT)
        } else {
            "    ".to_string()
        };
        let position = format!(
            " {}/{}",
            options.index_of(dimension) + 1,
            dimension.count()
        );
        let value_style = if focused {
            Theme::selected()
        } else {
            Theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Theme::selected()),
            Span::styled(
                format!("{:<width$}", dimension.label(), width = LABEL_WIDTH),
                Theme::text_muted(),
            ),
            Span::styled(format!("{} ", Theme::CHEVRON_LEFT), Theme::text_dim()),
            Span::styled(options.value(dimension), value_style),
            Span::styled(format!(" {}", Theme::CHEVRON_RIGHT), Theme::text_dim()),
            Span::styled(position, Theme::text_dim()),
        ]));
    }

    lines.push(Line::from(""));

    let loading = app.is_loading();
    let has_image = app.controller.uploads().has_image();
    let label = if loading {
        format!(" {} Generating... ", app.spinner())
    } else {
        " Virtually Try On ".to_string()
    };
    let button_style = if app.controller.can_submit() {
        Style::default().fg(Theme::GREY_900).bg(Theme::WHITE)
    } else {
        Style::default().fg(Theme::GREY_400).bg(Theme::GREY_700)
    };
    lines.push(Line::from(vec![
        Span::raw("    "),
        Span::styled(label, button_style),
    ]));

    if let Some(message) = app.controller.validation_message() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("    {} {}", Theme::CROSS_MARK, message),
            Theme::error(),
        )));
    } else if !has_image {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "    Please upload a photo to begin.",
            Theme::text_muted(),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .style(Theme::bg())
            .wrap(Wrap { trim: false }),
        area,
    );
}
