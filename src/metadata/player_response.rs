//! Structured player response embedded in the watch page.
//!
//! The page assigns a large JSON object to `ytInitialPlayerResponse` inside a
//! `<script>` tag. The object is followed by arbitrary javascript, so it is cut out
//! with a brace-balanced scan that ignores braces inside string literals.

use serde_json::Value;

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

/// Locate the assignment marker and return the JSON object text that follows it.
pub fn find_player_response(html: &str) -> Option<&str> {
    let mut search_from = 0;

    // the marker also shows up in plain references (`if (ytInitialPlayerResponse) ...`),
    // keep looking until one is followed by an assignment
    while let Some(rel) = html[search_from..].find(PLAYER_RESPONSE_MARKER) {
        let after_marker = search_from + rel + PLAYER_RESPONSE_MARKER.len();
        let rest = &html[after_marker..];
        let trimmed = rest.trim_start_matches(|c: char| c == '"' || c == ']' || c.is_whitespace());

        if let Some(after_eq) = trimmed.strip_prefix('=') {
            let value = after_eq.trim_start();
            if value.starts_with('{') {
                if let Some(object) = balanced_object(value) {
                    return Some(object);
                }
            }
        }

        search_from = after_marker;
    }

    None
}

/// Return the prefix of `text` holding one complete `{...}` object, or `None` if it never closes.
pub fn balanced_object(text: &str) -> Option<&str> {
    if !text.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parsed view over the player response, tolerant of missing or oddly typed fields.
#[derive(Debug, Clone)]
pub struct PlayerResponse {
    root: Value,
}

impl PlayerResponse {
    pub fn from_html(html: &str) -> Option<Self> {
        let text = find_player_response(html)?;
        match serde_json::from_str::<Value>(text) {
            Ok(root) if root.is_object() => Some(Self { root }),
            Ok(_) => None,
            Err(err) => {
                log::debug!("player response is not valid json: {err}");
                None
            }
        }
    }

    pub fn length_seconds(&self) -> Option<u64> {
        positive_seconds(self.root.pointer("/videoDetails/lengthSeconds"))
    }

    pub fn microformat_length_seconds(&self) -> Option<u64> {
        positive_seconds(
            self.root
                .pointer("/microformat/playerMicroformatRenderer/lengthSeconds"),
        )
    }

    pub fn title(&self) -> Option<String> {
        self.root
            .pointer("/videoDetails/title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// `(status, reason)` when the page reports the video cannot be played.
    pub fn unplayable(&self) -> Option<(String, String)> {
        let status = self
            .root
            .pointer("/playabilityStatus/status")
            .and_then(Value::as_str)?;

        if status.eq_ignore_ascii_case("OK") {
            return None;
        }

        let reason = self
            .root
            .pointer("/playabilityStatus/reason")
            .and_then(Value::as_str)
            .unwrap_or_default();

        Some((status.to_string(), reason.to_string()))
    }
}

/// Seconds arrive as `"123"` or `123` depending on the page variant.
fn positive_seconds(value: Option<&Value>) -> Option<u64> {
    let seconds = match value? {
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        Value::Number(n) => n.as_u64()?,
        _ => return None,
    };

    (seconds > 0).then_some(seconds)
}
