use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use quickbib_core::UpdateInfo;

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the "new version available" prompt.
pub fn render(f: &mut Frame, theme: &Theme, info: &UpdateInfo) {
    let popup = centered_rect(64, 8, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "  Version {} is available (you have {}).",
                info.latest,
                quickbib_core::APP_VERSION
            ),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", info.url),
            Style::default().fg(theme.dim),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Enter",
                Style::default()
                    .fg(theme.success)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": open release page   ", Style::default().fg(theme.dim)),
            Span::styled(
                "Esc",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(": later", Style::default().fg(theme.dim)),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.success))
                .title(" Update Available "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
