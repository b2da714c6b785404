//! Dawn-run palette and semantic styling for the TUI.

use ratatui::style::{Color, Modifier, Style};

// ── Core Palette ──────────────────────────────────────────────────────

pub const TRACK_ORANGE: Color = Color::Rgb(255, 149, 64); // #ff9540
pub const SKY_CYAN: Color = Color::Rgb(126, 220, 226); // #7edce2
pub const SUCCESS_GREEN: Color = Color::Rgb(112, 224, 130); // #70e082
pub const WARN_AMBER: Color = Color::Rgb(240, 206, 110); // #f0ce6e
pub const ERROR_RED: Color = Color::Rgb(240, 100, 100); // #f06464

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(198, 200, 209); // #c6c8d1
pub const BORDER_GRAY: Color = Color::Rgb(96, 106, 134); // #606a86
pub const BG_HIGHLIGHT: Color = Color::Rgb(44, 46, 58); // #2c2e3a
pub const BG_DARK: Color = Color::Rgb(28, 30, 39); // #1c1e27

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(SKY_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(TRACK_ORANGE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(SKY_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(TRACK_ORANGE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(TRACK_ORANGE)
        .add_modifier(Modifier::BOLD)
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
    Style::default().fg(SKY_CYAN).add_modifier(Modifier::BOLD)
}

/// Error banner text.
pub fn error_style() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

/// Success flash text.
pub fn success_style() -> Style {
    Style::default()
        .fg(SUCCESS_GREEN)
        .add_modifier(Modifier::BOLD)
}
