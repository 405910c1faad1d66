use serde::{Deserialize, Serialize};

/// Openers tested against the trimmed line, in order.
const COMMENT_OPENERS: &[&str] = &["//", "/*", "*", "#", "--", ";", "%", "\"", "'", "<!--", "{-", "(*"];

/// Stripped along with whitespace so a BOM-prefixed first line classifies
/// like any other.
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Code,
    Comment,
    Blank,
}

/// Classify one line on its own.
///
/// No state is carried between lines, so the body of a block comment that
/// does not start with a recognised opener counts as code.
pub fn classify_line(raw: &str) -> LineKind {
    let trimmed = raw.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK);
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if COMMENT_OPENERS.iter().any(|opener| trimmed.starts_with(opener)) {
        LineKind::Comment
    } else {
        LineKind::Code
    }
}
