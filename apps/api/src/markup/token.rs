//! Annotation scanner: splits generated text into literal runs and edit tokens.
//!
//! Recognized forms:
//!
//! ```text
//! [[+added text]]
//! [[~old text→new text]]
//! [[^moved text]]
//! ```
//!
//! The scan is a single left-to-right pass. Anything that does not close
//! properly is left in the surrounding literal run.

/// Separator between the old and new halves of a replacement.
pub const SEPARATOR: char = '→';

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// A recognized edit annotation. Borrows its content from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Addition(&'a str),
    Replacement { old: &'a str, new: &'a str },
    Moved(&'a str),
}

impl<'a> Token<'a> {
    /// The text that survives once the edit is accepted.
    pub fn final_text(&self) -> &'a str {
        match *self {
            Token::Addition(content) | Token::Moved(content) => content,
            Token::Replacement { new, .. } => new,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Token(Token<'a>),
}

/// Splits `text` into literal and token segments, in source order.
///
/// Adjacent literal text is always merged into a single `Segment::Text`.
pub fn tokenize(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(OPEN) {
        let start = cursor + offset;
        match match_token(&text[start..]) {
            Some((token, consumed)) => {
                if literal_start < start {
                    segments.push(Segment::Text(&text[literal_start..start]));
                }
                segments.push(Segment::Token(token));
                cursor = start + consumed;
                literal_start = cursor;
            }
            // `[` is one byte, so stepping over it keeps `cursor` on a char boundary.
            None => cursor = start + 1,
        }
    }

    if literal_start < text.len() {
        segments.push(Segment::Text(&text[literal_start..]));
    }

    segments
}

/// Tries to read one token at the start of `rest`, which begins with `[[`.
/// Returns the token and the number of bytes it spans.
fn match_token(rest: &str) -> Option<(Token<'_>, usize)> {
    let body = rest.strip_prefix(OPEN)?;
    let header = OPEN.len() + 1;

    if let Some(inner) = body.strip_prefix('+') {
        let (content, used) = closed_span(inner)?;
        return Some((Token::Addition(content), header + used));
    }
    if let Some(inner) = body.strip_prefix('^') {
        let (content, used) = closed_span(inner)?;
        return Some((Token::Moved(content), header + used));
    }
    if let Some(inner) = body.strip_prefix('~') {
        let (old, new, used) = replacement(inner)?;
        return Some((Token::Replacement { old, new }, header + used));
    }

    None
}

/// Reads a non-empty run without `]` that is followed by `]]`.
fn closed_span(inner: &str) -> Option<(&str, usize)> {
    let end = inner.find(']')?;
    let content = &inner[..end];
    if content.is_empty() || !inner[end..].starts_with(CLOSE) {
        return None;
    }
    Some((content, end + CLOSE.len()))
}

/// Reads `old→new]]`. `old` stops at the first separator and may hold a
/// single `]` but never `]]`.
fn replacement(inner: &str) -> Option<(&str, &str, usize)> {
    let split = inner.find(SEPARATOR)?;
    let old = &inner[..split];
    if old.is_empty() || old.contains(CLOSE) {
        return None;
    }

    let after = split + SEPARATOR.len_utf8();
    let (new, used) = closed_span(&inner[after..])?;
    Some((old, new, after + used))
}
