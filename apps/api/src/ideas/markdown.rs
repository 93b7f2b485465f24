//! Markdown-list parser used by bulk import.
//!
//! Top-level bullets and numbered items open a new idea; nested items and
//! indented prose under them become its description. Plain lines are ideas
//! of their own.

use serde::{Deserialize, Serialize};

use crate::ideas::lines::{classify, LineKind};

/// One parsed idea, prior to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ImportItem {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    fn append_description(&mut self, line: &str) {
        match &mut self.description {
            Some(description) => {
                description.push('\n');
                description.push_str(line);
            }
            None => self.description = Some(line.to_string()),
        }
    }
}

/// Parses pasted text into import items, preserving input order.
///
/// Nested or indented lines that appear before any top-level item have no
/// parent and are dropped.
pub fn parse(text: &str) -> Vec<ImportItem> {
    let mut items = Vec::new();
    let mut current: Option<ImportItem> = None;

    for line in text.split('\n') {
        match classify(line) {
            LineKind::Skip => {}
            LineKind::Bullet(title) | LineKind::Numbered(title) => {
                items.extend(current.take());
                current = Some(ImportItem::titled(title));
            }
            LineKind::NestedBullet(detail)
            | LineKind::NestedNumbered(detail)
            | LineKind::IndentedText(detail) => match current.as_mut() {
                Some(item) => item.append_description(detail),
                None => tracing::debug!("Dropping orphan continuation line: {detail}"),
            },
            LineKind::PlainText(title) => {
                items.extend(current.take());
                items.push(ImportItem::titled(title));
            }
        }
    }

    items.extend(current);
    items
}
