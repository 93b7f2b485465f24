//! Line classifier for pasted idea lists.
//!
//! Recognises the shapes people actually paste: `- item`, `* item`, `1. item`,
//! the same markers indented under a parent, indented prose, and plain lines.

/// Classification of a single raw line. Content is always trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Bullet(&'a str),
    Numbered(&'a str),
    NestedBullet(&'a str),
    NestedNumbered(&'a str),
    IndentedText(&'a str),
    PlainText(&'a str),
    Skip,
}

/// Classifies one line. Checks run in order: unindented markers, indented
/// markers, indented text, plain text. First match wins.
pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Skip;
    }

    let body = line.trim_start();
    let indented = body.len() != line.len();

    if indented {
        if let Some(content) = bullet_content(body) {
            return LineKind::NestedBullet(content);
        }
        if let Some(content) = numbered_content(body) {
            return LineKind::NestedNumbered(content);
        }
    } else {
        if let Some(content) = bullet_content(line) {
            return LineKind::Bullet(content);
        }
        if let Some(content) = numbered_content(line) {
            return LineKind::Numbered(content);
        }
    }

    if line.starts_with("  ") {
        return LineKind::IndentedText(trimmed);
    }
    LineKind::PlainText(trimmed)
}

/// `[-*]` + whitespace + non-blank content.
fn bullet_content(s: &str) -> Option<&str> {
    let rest = s.strip_prefix(['-', '*'])?;
    marker_tail(rest)
}

/// One or more digits + `.` + whitespace + non-blank content.
fn numbered_content(s: &str) -> Option<&str> {
    let digits = s.len() - s.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let rest = s[digits..].strip_prefix('.')?;
    marker_tail(rest)
}

fn marker_tail(rest: &str) -> Option<&str> {
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let content = rest.trim();
    (!content.is_empty()).then_some(content)
}
