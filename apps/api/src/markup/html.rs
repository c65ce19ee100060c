//! HTML writer for scanned annotation segments.

use std::borrow::Cow;

use html_escape::encode_quoted_attribute;

use crate::markup::token::{tokenize, Segment, Token, SEPARATOR};
use crate::markup::{ContentPolicy, RenderMode, RenderOptions};

pub const LINE_BREAK: &str = "<br />";

const ADDED_OPEN: &str = r#"<mark class="added">"#;
const ADDED_CLOSE: &str = "</mark>";
const MOVED_OPEN: &str = r#"<span class="moved">"#;
const MOVED_CLOSE: &str = "</span>";
const DELETED_OPEN: &str = "<del>";
const DELETED_CLOSE: &str = "</del>";
const INSERTED_OPEN: &str = "<ins>";
const INSERTED_CLOSE: &str = "</ins>";

/// Renders annotated text into an HTML fragment.
///
/// Clean mode resolves annotations until none are left, so text that only
/// becomes a token once an enclosing one is stripped is resolved as well.
pub fn render_fragment(text: &str, options: RenderOptions) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);

    match options.mode {
        RenderMode::Clean => push_text(&mut out, &accept_all(text), options.content),
        RenderMode::Diff => {
            for segment in tokenize(text) {
                match segment {
                    Segment::Text(literal) => push_text(&mut out, literal, options.content),
                    Segment::Token(token) => push_diff(&mut out, token, options.content),
                }
            }
        }
    }

    out
}

/// Replaces every annotation with its final text, repeating until a scan
/// finds no annotation. Each pass drops at least one delimiter pair.
fn accept_all(text: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(text);

    loop {
        let accepted = {
            let segments = tokenize(&current);
            if !segments.iter().any(|s| matches!(s, Segment::Token(_))) {
                None
            } else {
                Some(
                    segments
                        .iter()
                        .map(|segment| match segment {
                            Segment::Text(literal) => *literal,
                            Segment::Token(token) => token.final_text(),
                        })
                        .collect::<String>(),
                )
            }
        };

        match accepted {
            Some(next) => current = Cow::Owned(next),
            None => return current,
        }
    }
}

fn push_diff(out: &mut String, token: Token<'_>, policy: ContentPolicy) {
    match token {
        Token::Addition(content) => wrap(out, ADDED_OPEN, content, ADDED_CLOSE, policy),
        Token::Moved(content) => wrap(out, MOVED_OPEN, content, MOVED_CLOSE, policy),
        Token::Replacement { old, new } => {
            wrap(out, DELETED_OPEN, old, DELETED_CLOSE, policy);
            out.push(' ');
            out.push(SEPARATOR);
            out.push(' ');
            wrap(out, INSERTED_OPEN, new, INSERTED_CLOSE, policy);
        }
    }
}

fn wrap(out: &mut String, open: &str, content: &str, close: &str, policy: ContentPolicy) {
    out.push_str(open);
    push_text(out, content, policy);
    out.push_str(close);
}

/// Appends text, turning each line break (`\r\n`, `\n` or a lone `\r`) into
/// one `<br />` and escaping under `ContentPolicy::EscapeHtml`.
fn push_text(out: &mut String, text: &str, policy: ContentPolicy) {
    let mut rest = text;
    while let Some(at) = rest.find(|c: char| c == '\r' || c == '\n') {
        push_line(out, &rest[..at], policy);
        out.push_str(LINE_BREAK);
        let width = if rest[at..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[at + width..];
    }
    push_line(out, rest, policy);
}

fn push_line(out: &mut String, line: &str, policy: ContentPolicy) {
    match policy {
        ContentPolicy::Verbatim => out.push_str(line),
        ContentPolicy::EscapeHtml => out.push_str(&encode_quoted_attribute(line)),
    }
}
