//! Recover a JSON fragment from a free-form model reply
//!
//! Models wrap JSON in fences, prefix it with prose, or leave a dangling
//! closing fence. [`recover_json`] cuts out the most likely JSON fragment
//! without parsing it; a malformed fragment is left for the JSON parser to
//! reject.
//!
//! Known limitation: bracket sniffing takes everything from the first `[` or
//! `{` to the end of the text, so trailing prose survives (`"blah [5,6] blah"`
//! recovers to `"[5,6] blah"`) and fails to parse.

const FENCE: &str = "```";
const JSON_FENCE: &str = "```json";

/// Extract the JSON fragment from a model reply
///
/// First match wins:
///
/// 1. a ```` ```json ```` fence: everything up to the next fence (or the end)
/// 2. a pair of untagged fences: the content between them
/// 3. text that already starts with `[` or `{`: the whole text
/// 4. from the first `[` to the end
/// 5. from the first `{` to the end
/// 6. the trimmed text
///
/// A single trailing fence is then stripped. Never fails.
///
/// # Examples
///
/// ```
/// use ecm_extractor::recover_json;
///
/// assert_eq!(recover_json("```json\n[1,2]\n```"), "[1,2]");
/// assert_eq!(recover_json("noise ```[3,4]``` more"), "[3,4]");
/// assert_eq!(recover_json("Here you go: [5,6]"), "[5,6]");
/// ```
pub fn recover_json(raw: &str) -> String {
    let fragment = select_fragment(raw.trim());
    strip_trailing_fence(fragment).to_string()
}

fn select_fragment(text: &str) -> &str {
    if let Some(pos) = text.find(JSON_FENCE) {
        let rest = &text[pos + JSON_FENCE.len()..];
        return match rest.find(FENCE) {
            Some(end) => rest[..end].trim(),
            None => rest.trim(),
        };
    }

    // A lone untagged fence is not a block; fall through to sniffing
    if let Some(pos) = text.find(FENCE) {
        let rest = &text[pos + FENCE.len()..];
        if let Some(end) = rest.find(FENCE) {
            return rest[..end].trim();
        }
    }

    if text.starts_with('[') || text.starts_with('{') {
        return text;
    }

    if let Some(pos) = text.find('[') {
        return text[pos..].trim();
    }

    if let Some(pos) = text.find('{') {
        return text[pos..].trim();
    }

    text
}

fn strip_trailing_fence(fragment: &str) -> &str {
    match fragment.strip_suffix(FENCE) {
        Some(rest) => rest.trim(),
        None => fragment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_fence() {
        assert_eq!(recover_json("```json\n[1,2]\n```"), "[1,2]");
    }

    #[test]
    fn test_json_fence_with_preamble() {
        let reply = "Here are the measures:\n```json\n[{\"a\": 1}]\n```\nLet me know!";
        assert_eq!(recover_json(reply), "[{\"a\": 1}]");
    }

    #[test]
    fn test_unclosed_json_fence() {
        assert_eq!(recover_json("```json\n[1,2]"), "[1,2]");
    }

    #[test]
    fn test_json_fence_wins_over_earlier_plain_fence() {
        let reply = "```\nnot this\n```\n```json\n[7]\n```";
        assert_eq!(recover_json(reply), "[7]");
    }

    #[test]
    fn test_untagged_fence_pair() {
        assert_eq!(recover_json("noise ```[3,4]``` more"), "[3,4]");
    }

    #[test]
    fn test_lone_untagged_fence_falls_through() {
        assert_eq!(recover_json("```\n[1,2]"), "[1,2]");
    }

    #[test]
    fn test_bracket_sniff_keeps_trailing_noise() {
        assert_eq!(recover_json("blah [5,6] blah"), "[5,6] blah");
    }

    #[test]
    fn test_object_sniff() {
        assert_eq!(recover_json("Result: {\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_bare_object_containing_array_is_untouched() {
        let json = r#"{"ecm_detail": {"name": "X", "savings_by_fuel": []}}"#;
        assert_eq!(recover_json(json), json);
    }

    #[test]
    fn test_trailing_fence_stripped() {
        assert_eq!(recover_json("[1]\n```"), "[1]");
    }

    #[test]
    fn test_no_json_returns_trimmed_text() {
        assert_eq!(recover_json("  I could not find any measures.  "), "I could not find any measures.");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(recover_json(""), "");
        assert_eq!(recover_json("   \n"), "");
    }

    #[test]
    fn test_does_not_balance_brackets() {
        assert_eq!(recover_json("[1, 2"), "[1, 2");
    }
}
