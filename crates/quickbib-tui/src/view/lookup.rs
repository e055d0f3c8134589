use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, Focus};
use crate::theme::Theme;
use crate::view::{spinner_char, visible_window};

/// Render the lookup screen. Returns the record pane area (borders included).
pub fn render(f: &mut Frame, app: &App, area: Rect) -> Rect {
    let theme = &app.theme;
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(3), // input
        Constraint::Min(3),    // record
        Constraint::Length(1), // status
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, app, chunks[0]);
    render_input(f, app, chunks[1]);
    render_record(f, app, chunks[2]);
    render_status(f, app, chunks[3]);
    f.render_widget(
        Paragraph::new(footer_line(app)).style(theme.footer_style()),
        chunks[4],
    );

    chunks[2]
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" QUICKBIB ", theme.header_style()),
        Span::styled(
            format!(" v{}", quickbib_core::APP_VERSION),
            Style::default().fg(theme.dim),
        ),
    ];
    let in_flight = app.in_flight();
    if in_flight > 1 {
        spans.push(Span::styled(
            format!("  {} lookups running", in_flight),
            Style::default().fg(theme.pending),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Input && app.overlay.is_none();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(" DOI / arXiv / URL / title ");
    let inner = block.inner(area);

    let cursor_chars = app.input[..app.cursor].chars().count();
    let (visible, col) = visible_window(&app.input, cursor_chars, inner.width as usize);
    f.render_widget(
        Paragraph::new(Span::styled(visible, Style::default().fg(theme.text))).block(block),
        area,
    );

    if focused {
        let x = inner.x + u16::try_from(col).unwrap_or(inner.width);
        f.set_cursor_position(Position::new(x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn render_record(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.focus == Focus::Record && app.overlay.is_none();
    let citation = app.sink.citation();

    let mut title = " BibTeX ".to_string();
    let total = app.record_line_count();
    if total > app.visible_rows {
        title = format!(
            " BibTeX [{}-{}/{}] ",
            app.scroll + 1,
            app.scroll.saturating_add(app.visible_rows).min(total),
            total
        );
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style(focused))
        .title(title);

    let lines: Vec<Line> = if citation.is_empty() {
        vec![Line::from(Span::styled(
            "Enter a DOI, arXiv ID, journal URL or paper title and press Enter.",
            Style::default().fg(theme.dim),
        ))]
    } else {
        citation.lines().map(|l| highlight_line(l, theme)).collect()
    };

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((app.scroll, 0)),
        area,
    );
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let color = theme.status_color(app.sink.status_kind());
    let mut spans = vec![Span::raw(" ")];
    if app.is_busy() {
        spans.push(Span::styled(
            format!("{} ", spinner_char(app.tick)),
            Style::default().fg(theme.pending),
        ));
    }
    spans.push(Span::styled(
        app.sink.status().to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn footer_line(app: &App) -> Line<'static> {
    let mut hints: Vec<(&str, &str)> = match app.focus {
        Focus::Input => vec![
            ("Enter", "fetch"),
            ("Ctrl+Y", "copy"),
            ("Tab", "record"),
            ("F1", "help"),
            ("F2", "about"),
        ],
        Focus::Record => vec![
            ("j/k", "scroll"),
            ("y", "copy"),
            ("Tab", "input"),
            ("?", "help"),
            ("F2", "about"),
        ],
    };
    if app.can_check_updates() {
        hints.push(match app.focus {
            Focus::Input => ("F5", "update"),
            Focus::Record => ("u", "update"),
        });
    }
    hints.push(match app.focus {
        Focus::Input => ("Ctrl+C", "quit"),
        Focus::Record => ("q", "quit"),
    });

    let text = hints
        .iter()
        .map(|(k, d)| format!("{k}:{d}"))
        .collect::<Vec<_>>()
        .join("  ");
    Line::from(format!(" {text}"))
}

/// Colour the entry header and field names of one BibTeX line.
fn highlight_line<'a>(line: &'a str, theme: &Theme) -> Line<'a> {
    let text_style = Style::default().fg(theme.text);
    let trimmed = line.trim_start();

    if trimmed.starts_with('@')
        && let Some(brace) = line.find('{')
    {
        return Line::from(vec![
            Span::styled(
                &line[..=brace],
                Style::default()
                    .fg(theme.entry_type)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&line[brace + 1..], text_style),
        ]);
    }

    if let Some(eq) = line.find('=') {
        let name = &line[..eq];
        let bare = name.trim();
        if !bare.is_empty()
            && bare
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            return Line::from(vec![
                Span::styled(name, Style::default().fg(theme.field_name)),
                Span::styled(&line[eq..], text_style),
            ]);
        }
    }

    Line::from(Span::styled(line, text_style))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_header_is_split_at_brace() {
        let theme = Theme::hacker();
        let line = highlight_line("@article{Smith2020,", &theme);
        assert_eq!(line.spans.len(), 2);
        assert_eq!(line.spans[0].content, "@article{");
        assert_eq!(line.spans[1].content, "Smith2020,");
    }

    #[test]
    fn field_name_is_split_at_equals() {
        let theme = Theme::hacker();
        let line = highlight_line("  title = {A = B},", &theme);
        assert_eq!(line.spans[0].content, "  title ");
        assert_eq!(line.spans[1].content, "= {A = B},");
    }

    #[test]
    fn continuation_lines_are_plain() {
        let theme = Theme::hacker();
        let line = highlight_line("    and more words}", &theme);
        assert_eq!(line.spans.len(), 1);
    }
}
