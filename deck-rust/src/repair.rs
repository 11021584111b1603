//! Recovery of JSON arrays from model output.
//!
//! Model responses may wrap the array in prose or a fenced code block, and
//! long responses are often cut off mid-structure when the output token limit
//! is reached. The repair only ever truncates to the last structurally valid
//! boundary; it never invents values.

use crate::{DeckError, DeckResult};
use serde::de::DeserializeOwned;
use slide_sdk::client_utils::{excerpt, RESPONSE_EXCERPT_CHARS};
use tracing::{info, warn};

const FENCE: &str = "```";

/// Inner content of the first closed fenced code block, with an optional
/// language tag such as `json` or `html` removed.
#[must_use]
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find(FENCE)? + FENCE.len();
    let rest = &text[start..];
    let end = rest.find(FENCE)?;
    let inner = &rest[..end];

    let tag_len = inner
        .find(|ch: char| !ch.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let inner = match &inner[tag_len..] {
        // A single word with no body is content, not a language tag.
        after_tag if after_tag.trim().is_empty() => inner,
        after_tag => after_tag,
    };

    Some(inner.trim())
}

/// Slice from the first `[` to the last `]`. An array that never closes is
/// sliced from `[` to the end.
#[must_use]
pub fn slice_array(text: &str) -> &str {
    match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        (Some(start), _) => &text[start..],
        _ => text,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Default,
    InString,
    Escaped,
}

/// Truncation candidates found by [`scan`], as byte offsets.
#[derive(Debug, Default, PartialEq, Eq)]
struct Boundaries {
    /// Closing brace of the last object that closed at array depth one.
    last_closed_object: Option<usize>,
    /// Last comma separating two properties of a top-level object.
    last_property_comma: Option<usize>,
}

fn scan(text: &str) -> Boundaries {
    let mut state = ScanState::Default;
    let mut brace_depth: i32 = 0;
    let mut bracket_depth: i32 = 0;
    let mut boundaries = Boundaries::default();

    for (offset, ch) in text.char_indices() {
        state = match (state, ch) {
            (ScanState::Escaped, _) => ScanState::InString,
            (ScanState::InString, '\\') => ScanState::Escaped,
            (ScanState::InString, '"') => ScanState::Default,
            (ScanState::InString, _) => ScanState::InString,
            (ScanState::Default, '"') => ScanState::InString,
            (ScanState::Default, _) => {
                match ch {
                    '[' => bracket_depth += 1,
                    ']' => bracket_depth -= 1,
                    '{' => brace_depth += 1,
                    '}' => {
                        brace_depth -= 1;
                        // Depth zero covers input whose leading `[` was lost.
                        if brace_depth == 0 && bracket_depth <= 1 {
                            boundaries.last_closed_object = Some(offset);
                        }
                    }
                    ',' if brace_depth == 1 && bracket_depth <= 1 => {
                        boundaries.last_property_comma = Some(offset);
                    }
                    _ => {}
                }
                ScanState::Default
            }
        };
    }

    boundaries
}

fn close_array(mut repaired: String) -> String {
    if !repaired.starts_with('[') {
        repaired.insert(0, '[');
    }
    repaired
}

/// Cut a truncated array back to its last valid boundary and close it.
///
/// Prefers keeping every fully closed object. Without one, the first object
/// is kept up to its last complete property. Returns the input unchanged
/// when neither boundary exists.
#[must_use]
pub fn repair_truncated_array(text: &str) -> String {
    let text = text.trim();
    let boundaries = scan(text);

    if let Some(offset) = boundaries.last_closed_object {
        let kept = text[..=offset].trim_end().trim_end_matches(',');
        return close_array(format!("{kept}]"));
    }

    if let Some(offset) = boundaries.last_property_comma {
        info!(offset, "repairing JSON at last property separator");
        return close_array(format!("{}}}]", &text[..offset]));
    }

    text.to_string()
}

/// Parse a JSON array out of raw model output, repairing truncation when a
/// direct parse fails.
pub fn parse_json_array<T: DeserializeOwned>(raw: &str) -> DeckResult<Vec<T>> {
    let trimmed = raw.trim();
    let unfenced = extract_fenced_block(trimmed).unwrap_or(trimmed);
    let sliced = slice_array(unfenced);

    match serde_json::from_str(sliced) {
        Ok(items) => return Ok(items),
        Err(error) => warn!(error = %error, "direct JSON parse failed, attempting repair"),
    }

    // In a truncated array the last `]` usually closes a nested list, so the
    // repair scans everything from the opening bracket instead.
    let repair_input = unfenced.find('[').map_or(sliced, |start| &unfenced[start..]);
    let repaired = repair_truncated_array(repair_input);
    let items: Vec<T> = serde_json::from_str(&repaired).map_err(|error| DeckError::Parse {
        detail: error.to_string(),
        excerpt: excerpt(sliced, RESPONSE_EXCERPT_CHARS),
    })?;

    info!(items = items.len(), "JSON repaired");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_ignores_structure_inside_strings() {
        let boundaries = scan(r#"[{"a":"},{\"x\",","b":1}"#);
        assert_eq!(boundaries.last_closed_object, Some(23));
        assert_eq!(boundaries.last_property_comma, Some(17));
    }

    #[test]
    fn scan_skips_commas_in_nested_arrays() {
        let boundaries = scan(r#"[{"k":["x","y"]"#);
        assert_eq!(boundaries, Boundaries::default());
    }
}
