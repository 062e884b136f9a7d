use crate::ui::theme::Theme;
use crate::ui::App;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub(super) fn render_header(frame: &mut Frame, area: Rect, _app: &App) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("   {}", Theme::SHOP_TITLE), Theme::title())),
    ];

    let header = Paragraph::new(lines).style(Theme::bg());
    frame.render_widget(header, area);
}
