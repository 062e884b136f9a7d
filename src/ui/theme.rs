//! Greyscale theme for tailor-fit
//! High-contrast monochrome with a single accent for success and failure

use ratatui::style::{Color, Modifier, Style};

/// The greyscale color palette
pub struct Theme;

impl Theme {
    // ─────────────────────────────────────────────────────────────────────
    // Core greyscale palette - from brightest to darkest
    // ─────────────────────────────────────────────────────────────────────

    /// Pure white - maximum emphasis
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Near white - headers, selected items
    pub const GREY_50: Color = Color::Rgb(250, 250, 250);

    /// Bright grey - primary text
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);

    /// Medium grey - muted text
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);

    /// Dark grey - disabled controls
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);

    /// Darker grey - borders, separators
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);

    /// Dark grey - overlay backgrounds
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);

    /// True black - deepest background
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    /// Background color alias
    pub const BG: Color = Self::GREY_900;

    // ─────────────────────────────────────────────────────────────────────
    // Accents
    // ─────────────────────────────────────────────────────────────────────

    pub const GREEN: Color = Color::Rgb(100, 200, 100);

    pub const RED: Color = Color::Rgb(200, 100, 100);

    /// Header wordmark
    pub const SHOP_TITLE: &'static str = "Fatemi Tailors - Virtual Saya-Kurta Fitter";

    pub const ARROW_RIGHT: char = '▸';
    pub const CHEVRON_LEFT: char = '‹';
    pub const CHEVRON_RIGHT: char = '›';
    pub const CHECK_MARK: char = '✓';
    pub const CROSS_MARK: char = '✗';

    // ─────────────────────────────────────────────────────────────────────
    // Pre-built styles for common UI elements
    // ─────────────────────────────────────────────────────────────────────

    /// Main background style
    pub fn bg() -> Style {
        Style::default().bg(Self::BG)
    }

    /// Primary text style
    pub fn text() -> Style {
        Style::default().fg(Self::GREY_100)
    }

    /// Secondary/muted text
    pub fn text_muted() -> Style {
        Style::default().fg(Self::GREY_300)
    }

    /// Dimmed text for disabled controls
    pub fn text_dim() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    /// Selected/highlighted item
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style for panels
    pub fn border() -> Style {
        Style::default().fg(Self::GREY_500)
    }

    /// Title style
    pub fn title() -> Style {
        Style::default()
            .fg(Self::GREY_50)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding highlight
    pub fn key() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::GREEN)
    }
}
