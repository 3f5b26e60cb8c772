use serde_json::Value;

/// Locates the first balanced `{...}` span in free-form model output that
/// parses as a JSON object.
///
/// Braces inside JSON string literals (including escaped quotes) are ignored,
/// and balanced spans that are not JSON, such as `{field}` in commentary, are
/// skipped. Returns `None` when no candidate parses.
#[must_use]
pub fn extract_json_object(text: &str) -> Option<&str> {
    balanced_spans(text, &['{']).find(|span| {
        matches!(serde_json::from_str::<Value>(span), Ok(Value::Object(_)))
    })
}

/// Like [`extract_json_object`], but a top-level array of objects is also
/// accepted. Whichever valid candidate starts first wins.
#[must_use]
pub fn extract_json_document(text: &str) -> Option<&str> {
    balanced_spans(text, &['{', '[']).find(|span| match serde_json::from_str::<Value>(span) {
        Ok(Value::Object(_)) => true,
        Ok(Value::Array(items)) => !items.is_empty() && items.iter().all(Value::is_object),
        _ => false,
    })
}

/// Every balanced span opened by one of `openers`, in order of its opening
/// character.
fn balanced_spans<'a>(text: &'a str, openers: &'a [char]) -> impl Iterator<Item = &'a str> + 'a {
    text.char_indices()
        .filter(move |(_, ch)| openers.contains(ch))
        .filter_map(move |(start, open)| {
            matching_close(text, start, open).map(|end| &text[start..=end])
        })
}

/// Byte index of the bracket closing the `open` at `start`.
fn matching_close(text: &str, start: usize, open: char) -> Option<usize> {
    let close = if open == '[' { ']' } else { '}' };
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(start + idx);
            }
        }
    }
    None
}
