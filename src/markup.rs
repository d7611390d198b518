//! Message formatter: raw answer text to display markup.
//!
//! The answering service replies in a lightweight markdown-ish dialect.
//! `format` turns the raw text into an ordered list of typed fragments
//! that the presentation layer renders as styled spans. Four rules apply
//! in a fixed order:
//!
//! 1. `###` header lines become `Heading` fragments
//! 2. `**text**` spans become `Strong` fragments (non-greedy)
//! 3. newlines become `LineBreak` fragments
//! 4. `[label](http(s)://url)` becomes a `Link` fragment; the literal
//!    brackets stay visible around the rendered label
//!
//! Later rules only scan the plain-text runs left over by earlier ones,
//! so a rule can never corrupt a fragment an earlier rule produced.
//! Malformed link syntax (no `http(s)://` prefix) passes through as
//! literal text.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^###\s*(.+)$").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\((https?://[^()\s]+)\)").unwrap());

/// One piece of display markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A whole line rendered as an emphasized heading
    Heading(String),
    /// Plain text run
    Text(String),
    /// Strong-emphasis span
    Strong(String),
    /// Explicit line break
    LineBreak,
    /// Hyperlink; rendered with visible brackets around the label
    Link { label: String, url: String },
}

/// Formatted markup: an ordered sequence of fragments
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup {
    fragments: Vec<Fragment>,
}

impl Markup {
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Flatten back to plain text: headings and strong spans keep their
    /// text, links keep the `[label](url)` form, breaks become newlines.
    #[allow(dead_code)]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Heading(text) | Fragment::Text(text) | Fragment::Strong(text) => {
                    out.push_str(text)
                }
                Fragment::LineBreak => out.push('\n'),
                Fragment::Link { label, url } => {
                    out.push('[');
                    out.push_str(label);
                    out.push_str("](");
                    out.push_str(url);
                    out.push(')');
                }
            }
        }
        out
    }
}

/// Format raw answer text into display markup. Pure and deterministic.
pub fn format(raw: &str) -> Markup {
    let mut fragments = Vec::new();

    for (i, line) in raw.split('\n').enumerate() {
        if i > 0 {
            fragments.push(Fragment::LineBreak);
        }
        if let Some(caps) = HEADER_RE.captures(line) {
            fragments.push(Fragment::Heading(caps[1].to_string()));
        } else {
            push_bold_runs(&mut fragments, line);
        }
    }

    Markup { fragments }
}

/// Split a line at `**...**` pairs, then hand the plain pieces to the
/// link rule.
fn push_bold_runs(out: &mut Vec<Fragment>, line: &str) {
    let mut last = 0;
    for caps in BOLD_RE.captures_iter(line) {
        let whole = caps.get(0).expect("capture 0 always present");
        push_link_runs(out, &line[last..whole.start()]);
        out.push(Fragment::Strong(caps[1].to_string()));
        last = whole.end();
    }
    push_link_runs(out, &line[last..]);
}

fn push_link_runs(out: &mut Vec<Fragment>, text: &str) {
    let mut last = 0;
    for caps in LINK_RE.captures_iter(text) {
        let whole = caps.get(0).expect("capture 0 always present");
        if whole.start() > last {
            out.push(Fragment::Text(text[last..whole.start()].to_string()));
        }
        out.push(Fragment::Link {
            label: caps[1].to_string(),
            url: caps[2].to_string(),
        });
        last = whole.end();
    }
    if last < text.len() {
        out.push(Fragment::Text(text[last..].to_string()));
    }
}
