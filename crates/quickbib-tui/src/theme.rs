use ratatui::style::{Color, Modifier, Style};

use quickbib_core::StatusKind;

/// Color theme for the TUI.
pub struct Theme {
    pub success: Color,
    pub not_found: Color,
    pub error: Color,
    pub pending: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub focus_border: Color,
    pub text: Color,
    pub dim: Color,
    pub active: Color,
    pub entry_type: Color,
    pub field_name: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            success: Color::Rgb(0, 210, 0),
            not_found: Color::Yellow,
            error: Color::Red,
            pending: Color::Cyan,

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            focus_border: Color::Rgb(0, 210, 0),
            text: Color::White,
            dim: Color::DarkGray,
            active: Color::Cyan,
            entry_type: Color::Rgb(0, 210, 0),
            field_name: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Modern theme: white text, electric blue accents, dark blue header.
    pub fn modern() -> Self {
        Self {
            success: Color::Rgb(0, 200, 80),
            not_found: Color::Rgb(255, 200, 0),
            error: Color::Rgb(255, 80, 80),
            pending: Color::Rgb(60, 140, 255),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            focus_border: Color::Rgb(60, 140, 255),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            active: Color::Rgb(60, 140, 255),
            entry_type: Color::Rgb(200, 120, 255),
            field_name: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Theme by config/flag name; anything unrecognised gets `hacker`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    pub fn status_color(&self, kind: StatusKind) -> Color {
        match kind {
            StatusKind::Idle | StatusKind::Info => self.dim,
            StatusKind::Pending => self.pending,
            StatusKind::Success => self.success,
            StatusKind::NotFound => self.not_found,
            StatusKind::Error => self.error,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
