use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::Theme;
use crate::view::centered_rect;

pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(60, 10, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {}", quickbib_core::APP_NAME),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  version {}", quickbib_core::APP_VERSION),
                Style::default().fg(theme.dim),
            ),
        ]),
        Line::from(Span::styled(
            "  BibTeX from DOIs, arXiv IDs, journal URLs and titles.",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", quickbib_core::HOMEPAGE),
            Style::default().fg(theme.active),
        )),
        Line::from(Span::styled(
            format!("  License: {}", quickbib_core::LICENSE),
            Style::default().fg(theme.dim),
        )),
        Line::from(""),
        Line::from(Span::styled("  Esc: close", Style::default().fg(theme.dim))),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" About "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
