//! Reading-room palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

use shelfly_core::BookStatus;

// ── Core Palette ──────────────────────────────────────────────────────

pub const PARCHMENT: Color = Color::Rgb(235, 219, 178); // #ebdbb2
pub const AMBER: Color = Color::Rgb(250, 189, 47); // #fabd2f
pub const SAGE: Color = Color::Rgb(142, 192, 124); // #8ec07c
pub const SUCCESS_GREEN: Color = Color::Rgb(152, 195, 121); // #98c379
pub const ERROR_RED: Color = Color::Rgb(224, 108, 117); // #e06c75
pub const SKY_BLUE: Color = Color::Rgb(131, 165, 152); // #83a598

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(102, 92, 84); // #665c54
pub const BG_HIGHLIGHT: Color = Color::Rgb(60, 56, 54); // #3c3836
pub const BG_DARK: Color = Color::Rgb(40, 40, 40); // #282828

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(AMBER)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(SKY_BLUE)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(AMBER)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(SKY_BLUE).add_modifier(Modifier::BOLD)
}

/// Inline validation error next to a form field.
pub fn field_error() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Circulation-status tag: green for Available, red for Issued,
/// neutral for anything the server invented since.
pub fn status_style(status: &BookStatus) -> Style {
    match status {
        BookStatus::Available => Style::default().fg(SUCCESS_GREEN),
        BookStatus::Issued => Style::default().fg(ERROR_RED),
        BookStatus::Other(_) => Style::default().fg(DIM_WHITE),
    }
}
