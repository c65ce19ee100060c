//! Markup Transformer: turns the edit annotations embedded in generated resume
//! text into an HTML fragment.
//!
//! Pure and stateless: the caller owns the render mode and re-invokes
//! `render` when it changes. Malformed annotations are never an error; they
//! stay in the output as literal text.
//!
//! Content policy: by default literal text and token content are inserted
//! as-is (`ContentPolicy::Verbatim`), so the fragment is only as trustworthy as
//! its input. `ContentPolicy::EscapeHtml` entity-escapes them so that the tags
//! written here are the only markup in the result.

pub mod html;
pub mod token;

use serde::{Deserialize, Serialize};

use crate::markup::token::{tokenize, Segment, Token};

/// `Diff` shows the edit history inline; `Clean` shows only the final text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Diff,
    Clean,
}

impl From<bool> for RenderMode {
    /// Maps a "show changes" toggle onto a mode.
    fn from(show_changes: bool) -> Self {
        if show_changes {
            RenderMode::Diff
        } else {
            RenderMode::Clean
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentPolicy {
    #[default]
    Verbatim,
    EscapeHtml,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub content: ContentPolicy,
}

impl RenderOptions {
    pub fn with_mode(self, mode: RenderMode) -> Self {
        Self { mode, ..self }
    }
}

/// Renders `text` in `mode` with the default (verbatim) content policy.
#[allow(dead_code)]
pub fn render(text: &str, mode: RenderMode) -> String {
    render_with(text, RenderOptions::default().with_mode(mode))
}

pub fn render_with(text: &str, options: RenderOptions) -> String {
    html::render_fragment(text, options)
}

/// Counts of each annotation kind found in a text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub additions: usize,
    pub replacements: usize,
    pub moves: usize,
}

impl ChangeSummary {
    pub fn total(&self) -> usize {
        self.additions + self.replacements + self.moves
    }
}

/// Counts the well-formed annotations in `text`. Literal near-misses are ignored.
pub fn summarize(text: &str) -> ChangeSummary {
    tokenize(text)
        .into_iter()
        .fold(ChangeSummary::default(), |mut summary, segment| {
            match segment {
                Segment::Token(Token::Addition(_)) => summary.additions += 1,
                Segment::Token(Token::Replacement { .. }) => summary.replacements += 1,
                Segment::Token(Token::Moved(_)) => summary.moves += 1,
                Segment::Text(_) => {}
            }
            summary
        })
}
