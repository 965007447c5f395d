//! Locating the fenced ```` ```json ```` block embedded in an agent file.
//!
//! Only the first qualifying block is ever considered: the first one after
//! the marker when a marker is given, otherwise the first one in the text.

use crate::diagnostics::FileWarning;
use serde_json::Value;
use std::path::Path;

pub const JSON_FENCE_OPEN: &str = "```json";
pub const FENCE_CLOSE: &str = "```";

/// Byte offsets of a fenced JSON block inside its source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonBlock<'a> {
    /// Offset just past the opening ```` ```json ````.
    pub content_start: usize,
    /// Offset of the closing fence.
    pub content_end: usize,
    /// Trimmed text between the fences; never empty.
    pub payload: &'a str,
}

impl<'a> JsonBlock<'a> {
    pub fn parse(&self) -> serde_json::Result<Value> {
        serde_json::from_str(self.payload)
    }

    /// Replace the block body with `body`, framed by one newline on each
    /// side. Everything outside the fences is left byte-identical.
    pub fn splice(&self, text: &str, body: &str) -> String {
        let before = &text[..self.content_start];
        let after = &text[self.content_end..];
        let mut out = String::with_capacity(before.len() + body.len() + after.len() + 2);
        out.push_str(before);
        out.push('\n');
        out.push_str(body);
        out.push('\n');
        out.push_str(after);
        out
    }
}

/// Find the first fenced JSON block, searching after the end of the first
/// occurrence of `marker` when one is given.
///
/// Returns `None` when the marker, the opening fence or the closing fence is
/// missing, or when the block is blank.
pub fn locate_json_block<'a>(text: &'a str, marker: Option<&str>) -> Option<JsonBlock<'a>> {
    let search_from = match marker {
        Some(marker) => text.find(marker)? + marker.len(),
        None => 0,
    };

    let open = search_from + text[search_from..].find(JSON_FENCE_OPEN)?;
    let content_start = open + JSON_FENCE_OPEN.len();
    let content_end = content_start + text[content_start..].find(FENCE_CLOSE)?;

    let payload = text[content_start..content_end].trim();
    if payload.is_empty() {
        return None;
    }

    Some(JsonBlock {
        content_start,
        content_end,
        payload,
    })
}

/// Locate and parse the JSON block of `source`.
///
/// A missing block is `Ok(None)`. Malformed JSON is logged and returned as a
/// warning naming `source`; callers treat it as "no config".
pub fn extract_json_block(
    text: &str,
    marker: Option<&str>,
    source: &Path,
) -> std::result::Result<Option<Value>, FileWarning> {
    let Some(block) = locate_json_block(text, marker) else {
        return Ok(None);
    };
    block.parse().map(Some).map_err(|e| {
        tracing::warn!(path = %source.display(), error = %e, "failed to parse fenced JSON block");
        FileWarning::new(source, format!("failed to parse JSON: {e}"))
    })
}
