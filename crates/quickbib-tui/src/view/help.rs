use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Identifier forms the resolver accepts, with an example of each.
const EXAMPLES: &[(&str, &str)] = &[
    ("DOI", "10.1038/nphys1170"),
    ("DOI link", "https://doi.org/10.1038/nphys1170"),
    ("arXiv URL", "https://arxiv.org/abs/2411.08091"),
    ("arXiv ID", "arXiv:2411.08091"),
    ("arXiv ID (short)", "2411.08091"),
    ("Old arXiv ID", "hep-th/9901001"),
    (
        "Journal URL",
        "https://journals.aps.org/prl/abstract/10.1103/v6r7-4ph9",
    ),
    ("Title (fuzzy search)", "Projected Topological Branes"),
];

/// Render the how-to-use overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme, can_check_updates: bool) {
    let area = f.area();
    let height = 25 + u16::from(can_check_updates);
    let popup = centered_rect(76, height, area);

    let mut lines = vec![
        Line::from(Span::styled(
            " How to use QuickBib ",
            theme.header_style(),
        )),
        Line::from(""),
        section_header("What to type", theme),
    ];
    for (label, example) in EXAMPLES {
        lines.push(Line::from(vec![
            Span::styled(format!("    {label:<22}"), Style::default().fg(theme.dim)),
            Span::styled(*example, Style::default().fg(theme.text)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section_header("Keys", theme));
    lines.push(key_line("Enter", "Fetch BibTeX for the input", theme));
    lines.push(key_line("Ctrl+Y / y", "Copy the record to the clipboard", theme));
    lines.push(key_line("Tab", "Switch between input and record", theme));
    lines.push(key_line("j / k, PgUp / PgDn", "Scroll the record", theme));
    lines.push(key_line("F1 / ?", "Toggle this help", theme));
    lines.push(key_line("F2", "About QuickBib", theme));
    if can_check_updates {
        lines.push(key_line("F5 / u", "Check for updates", theme));
    }
    lines.push(key_line("q", "Quit (from the record pane)", theme));
    lines.push(key_line("Ctrl+C", "Quit immediately", theme));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<22}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
