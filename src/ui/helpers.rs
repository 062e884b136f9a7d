use crate::ui::theme::Theme;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;

/// A box `percent_x` wide and `height` rows tall, centered in `r`
pub fn centered_box(percent_x: u16, height: u16, r: Rect) -> Rect {
    let height = height.min(r.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Footer-style key badge followed by its label
pub fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            format!(" {} ", key),
            Style::default().fg(Theme::GREY_900).bg(Theme::GREY_500),
        ),
        Span::styled(format!(" {}  ", label), Theme::text_muted()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_box() {
        let parent = Rect::new(0, 0, 100, 40);
        let centered = centered_box(60, 3, parent);
        assert_eq!(centered.height, 3);
        assert!(centered.x > 0);
        assert!(centered.y > 0);
        assert!(centered.width < 100);
    }

    #[test]
    fn test_centered_box_clamps_height() {
        let parent = Rect::new(0, 0, 20, 2);
        assert_eq!(centered_box(50, 5, parent).height, 2);
    }
}
