//! Transcript display widget

use crate::controller::Snapshot;
use crate::markup::{Fragment, Markup};
use crate::transcript::{Speaker, Turn};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Renders the conversation transcript, newest turns anchored to the
/// bottom, with a pending indicator row while a request is in flight.
pub struct TranscriptView<'a> {
    snapshot: Snapshot<'a>,
    show_timestamps: bool,
}

impl<'a> TranscriptView<'a> {
    pub fn new(snapshot: Snapshot<'a>, show_timestamps: bool) -> Self {
        Self {
            snapshot,
            show_timestamps,
        }
    }

    /// Header line above a turn: speaker icon, optional timestamp, rule
    fn header_line(&self, turn: &Turn) -> Line<'static> {
        let icon = match turn.speaker() {
            Speaker::User => "👤",
            Speaker::Assistant => "✨",
        };

        let header = if self.show_timestamps {
            let timestamp = turn
                .timestamp()
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string();
            format!("{} {} {}", icon, timestamp, "─".repeat(20))
        } else {
            format!("{} {}", icon, "─".repeat(20))
        };

        Line::from(vec![Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        )])
    }

    /// Content lines for one turn, wrapped and indented
    fn content_lines(&self, turn: &Turn, width: u16) -> Vec<Line<'static>> {
        let wrap_width = width.saturating_sub(2) as usize;
        let spans = match turn.display_content() {
            Some(markup) => markup_spans(markup),
            // User input may span lines via Shift+Enter.
            None => turn
                .raw_content()
                .split('\n')
                .map(|line| {
                    vec![Span::styled(
                        line.to_string(),
                        Style::default().fg(Color::Blue),
                    )]
                })
                .collect(),
        };

        let mut lines = Vec::new();
        for span_line in spans {
            for mut line in wrap_spans(span_line, wrap_width) {
                line.spans.insert(0, Span::raw("  "));
                lines.push(line);
            }
        }
        lines
    }

    /// Placeholder row shown while the reply is outstanding. The request
    /// started when the user turn was appended, so that turn's timestamp
    /// is the one to show.
    fn pending_lines(&self) -> Vec<Line<'static>> {
        let header = if self.show_timestamps {
            let started = self
                .snapshot
                .turns
                .last()
                .map(|turn| turn.timestamp())
                .unwrap_or_else(chrono::Utc::now);
            let timestamp = started
                .with_timezone(&chrono::Local)
                .format("%H:%M:%S")
                .to_string();
            format!("✨ {} {}", timestamp, "─".repeat(20))
        } else {
            format!("✨ {}", "─".repeat(20))
        };

        vec![
            Line::from(vec![Span::styled(
                header,
                Style::default().fg(Color::DarkGray),
            )]),
            Line::from(vec![
                Span::raw("  "),
                Span::styled("▋", Style::default().fg(Color::Yellow)),
            ]),
        ]
    }
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title("Conversation");

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.snapshot.turns.is_empty() && !self.snapshot.busy {
            let welcome_lines = vec![
                Line::from(vec![Span::styled(
                    "Ask the answering service anything.",
                    Style::default().fg(Color::Green),
                )]),
                Line::from(vec![Span::raw("")]),
                Line::from(vec![Span::styled(
                    "Press Enter to send, Shift+Enter for a new line.",
                    Style::default().fg(Color::DarkGray),
                )]),
            ];

            for (i, line) in welcome_lines.iter().enumerate() {
                if i < inner_area.height as usize {
                    buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
                }
            }
            return;
        }

        let mut all_lines: Vec<Line> = Vec::new();
        for turn in self.snapshot.turns {
            all_lines.push(self.header_line(turn));
            all_lines.extend(self.content_lines(turn, inner_area.width));
            // spacing between turns
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        if self.snapshot.busy {
            all_lines.extend(self.pending_lines());
        }

        // Show the last `height` lines, bottom-anchored.
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);
        let visible = &all_lines[start..];

        for (i, line) in visible.iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

/// Convert markup fragments to styled spans, one `Vec<Span>` per display
/// line. Heading lines get bold+underline, strong spans bold, links an
/// underlined label between visible brackets.
pub fn markup_spans(markup: &Markup) -> Vec<Vec<Span<'static>>> {
    let mut lines: Vec<Vec<Span<'static>>> = vec![Vec::new()];

    for fragment in markup.fragments() {
        match fragment {
            Fragment::LineBreak => lines.push(Vec::new()),
            Fragment::Heading(text) => lines.last_mut().expect("never empty").push(Span::styled(
                text.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Fragment::Text(text) => lines
                .last_mut()
                .expect("never empty")
                .push(Span::styled(text.clone(), Style::default().fg(Color::Green))),
            Fragment::Strong(text) => lines.last_mut().expect("never empty").push(Span::styled(
                text.clone(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Fragment::Link { label, url } => {
                let line = lines.last_mut().expect("never empty");
                line.push(Span::styled("[".to_string(), Style::default().fg(Color::Gray)));
                line.push(Span::styled(
                    label.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                ));
                line.push(Span::styled("]".to_string(), Style::default().fg(Color::Gray)));
                line.push(Span::styled(
                    format!("({url})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
        }
    }

    lines
}

/// Hard-wrap a line of styled spans to the given width, splitting spans
/// at the boundary while keeping their styles.
fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }

    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0usize;

    for span in spans {
        let style = span.style;
        let mut piece = String::new();
        for ch in span.content.chars() {
            if used == width {
                if !piece.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut piece), style));
                }
                lines.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            piece.push(ch);
            used += 1;
        }
        if !piece.is_empty() {
            current.push(Span::styled(piece, style));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(Line::from(current));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup;

    fn line_text(spans: &[Span<'static>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn link_renders_with_visible_brackets() {
        let markup = markup::format("See [docs](https://example.com/x)");
        let lines = markup_spans(&markup);
        assert_eq!(lines.len(), 1);

        let text = line_text(&lines[0]);
        assert_eq!(text, "See [docs](https://example.com/x)");

        // The label span itself is underlined, brackets are separate spans.
        let label = lines[0]
            .iter()
            .find(|s| s.content == "docs")
            .expect("label span present");
        assert!(label.style.add_modifier.contains(Modifier::UNDERLINED));
        assert!(lines[0].iter().any(|s| s.content == "["));
        assert!(lines[0].iter().any(|s| s.content == "]"));
    }

    #[test]
    fn heading_and_strong_get_bold_styling() {
        let markup = markup::format("###Title\nHello **world**");
        let lines = markup_spans(&markup);
        assert_eq!(lines.len(), 2);

        assert!(lines[0][0].style.add_modifier.contains(Modifier::BOLD));
        assert!(lines[0][0].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(line_text(&lines[1]), "Hello world");
        let strong = lines[1]
            .iter()
            .find(|s| s.content == "world")
            .expect("strong span present");
        assert!(strong.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn wrap_splits_long_spans_and_keeps_styles() {
        let style = Style::default().fg(Color::Green);
        let spans = vec![Span::styled("abcdefghij".to_string(), style)];
        let lines = wrap_spans(spans, 4);
        assert_eq!(lines.len(), 3);
        assert_eq!(line_text(&lines[0].spans), "abcd");
        assert_eq!(line_text(&lines[1].spans), "efgh");
        assert_eq!(line_text(&lines[2].spans), "ij");
        assert_eq!(lines[2].spans[0].style, style);
    }

    #[test]
    fn wrap_of_empty_input_yields_one_blank_line() {
        let lines = wrap_spans(Vec::new(), 10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].spans.is_empty());
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn pending_row_shows_the_submitted_turn_timestamp() {
        let turn = Turn::user("q");
        let expected = turn
            .timestamp()
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string();
        let turns = vec![turn];
        let snapshot = Snapshot {
            turns: &turns,
            busy: true,
        };

        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        TranscriptView::new(snapshot, true).render(area, &mut buf);

        let text = buffer_text(&buf);
        // Both the user turn header and the pending row carry the
        // submission time; nothing ticks while waiting.
        assert_eq!(text.matches(&expected).count(), 2);
        assert!(text.contains("▋"));
    }

    #[test]
    fn timestamps_render_in_local_time() {
        let turn = Turn::user("q");
        let local = turn
            .timestamp()
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string();
        let turns = vec![turn];
        let snapshot = Snapshot {
            turns: &turns,
            busy: false,
        };

        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        TranscriptView::new(snapshot, true).render(area, &mut buf);

        assert!(buffer_text(&buf).contains(&local));
    }
}
