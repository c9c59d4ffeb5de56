// Response parsing (model output → two perspectives)
// Author: kelexine (https://github.com/kelexine)

use super::prompt::{BOSS_FIELD, USER_FIELD};
use crate::error::{AppError, Result};
use crate::models::Perspectives;
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Maximum number of characters of the model output echoed in parse errors.
const SNIPPET_CHARS: usize = 200;

static FENCE_OPEN_REGEX: OnceLock<Regex> = OnceLock::new();
static FENCE_CLOSE_REGEX: OnceLock<Regex> = OnceLock::new();
static USER_FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
static BOSS_FIELD_REGEX: OnceLock<Regex> = OnceLock::new();

fn fence_open_regex() -> &'static Regex {
    FENCE_OPEN_REGEX.get_or_init(|| Regex::new(r"^```(?:json)?\s*").expect("Invalid regex pattern"))
}

fn fence_close_regex() -> &'static Regex {
    FENCE_CLOSE_REGEX.get_or_init(|| Regex::new(r"\s*```$").expect("Invalid regex pattern"))
}

/// `"<field>": "<value>"` where the value runs to the first unescaped quote.
fn field_regex(field: &str) -> Regex {
    let pattern = format!(r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#, regex::escape(field));
    Regex::new(&pattern).expect("Invalid regex pattern")
}

/// Parse the model's reply into the two perspectives.
///
/// Tolerates a surrounding code fence. Strict JSON is tried first; when that
/// fails (trailing commas, stray prose) each field is extracted on its own.
pub fn parse_generation(raw: &str) -> Result<Perspectives> {
    let cleaned = strip_code_fence(raw);

    match serde_json::from_str::<Perspectives>(cleaned) {
        Ok(perspectives) => return Ok(perspectives),
        Err(e) => debug!("Strict JSON parse failed, falling back to field extraction: {}", e),
    }

    let user = extract_field(USER_FIELD_REGEX.get_or_init(|| field_regex(USER_FIELD)), cleaned);
    let boss = extract_field(BOSS_FIELD_REGEX.get_or_init(|| field_regex(BOSS_FIELD)), cleaned);

    match (user, boss) {
        (Some(user_really_means), Some(boss_hears)) => Ok(Perspectives {
            user_really_means,
            boss_hears,
        }),
        _ => {
            let snippet = snippet(cleaned);
            warn!("Model output did not contain both fields");
            Err(AppError::ResponseParse(format!(
                "Unable to parse model output: {}",
                snippet
            )))
        }
    }
}

/// Trim and remove a leading ```` ``` ````/```` ```json ```` and a trailing ```` ``` ````.
fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(m) = fence_open_regex().find(text) {
        text = &text[m.end()..];
    }
    if let Some(m) = fence_close_regex().find(text) {
        text = &text[..m.start()];
    }
    text.trim()
}

fn extract_field(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace("\\\"", "\""))
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_valid_json() {
        let result =
            parse_generation(r#"{"user_really_means": "test user", "boss_hears": "test boss"}"#)
                .unwrap();
        assert_eq!(result.user_really_means, "test user");
        assert_eq!(result.boss_hears, "test boss");
    }

    #[test]
    fn test_parse_with_markdown_fence() {
        let raw = "```json\n{\"user_really_means\": \"test\", \"boss_hears\": \"boss\"}\n```";
        let result = parse_generation(raw).unwrap();
        assert_eq!(result.user_really_means, "test");
        assert_eq!(result.boss_hears, "boss");
    }

    #[test]
    fn test_parse_with_bare_fence() {
        let raw = "  ```\n{\"user_really_means\": \"u\", \"boss_hears\": \"b\"}\n```  ";
        let result = parse_generation(raw).unwrap();
        assert_eq!(result.user_really_means, "u");
    }

    #[test]
    fn test_extra_fields_ignored() {
        let raw = r#"{"user_really_means": "u", "boss_hears": "b", "mood": "grim"}"#;
        assert_eq!(parse_generation(raw).unwrap().boss_hears, "b");
    }

    #[test]
    fn test_fallback_on_trailing_comma() {
        let raw = r#"{"user_really_means": "I want a \"refund\"", "boss_hears": "They love it",}"#;
        let result = parse_generation(raw).unwrap();
        assert_eq!(result.user_really_means, r#"I want a "refund""#);
        assert_eq!(result.boss_hears, "They love it");
    }

    #[test]
    fn test_fallback_with_surrounding_prose() {
        let raw = "Sure! Here you go:\n\"user_really_means\": \"never again\"\n\"boss_hears\": \"five stars\"";
        let result = parse_generation(raw).unwrap();
        assert_eq!(result.user_really_means, "never again");
        assert_eq!(result.boss_hears, "five stars");
    }

    #[test]
    fn test_invalid_text_fails() {
        let err = parse_generation("completely invalid text").unwrap_err();
        assert!(matches!(err, AppError::ResponseParse(_)));
        assert!(err.to_string().contains("completely invalid text"));
    }

    #[test]
    fn test_missing_field_fails() {
        assert!(parse_generation(r#"{"user_really_means": "only one"}"#).is_err());
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let raw = r#"{"user_really_means": {"nested": true}, "boss_hears": "b"}"#;
        assert!(matches!(
            parse_generation(raw),
            Err(AppError::ResponseParse(_))
        ));
    }

    #[test]
    fn test_error_snippet_is_truncated() {
        let raw = "x".repeat(500);
        let err = parse_generation(&raw).unwrap_err();
        let AppError::ResponseParse(message) = err else {
            panic!("expected parse error");
        };
        assert_eq!(message.matches('x').count(), SNIPPET_CHARS);
    }

    proptest! {
        #[test]
        fn prop_encoded_perspectives_round_trip(user in ".*", boss in ".*", fenced in any::<bool>()) {
            let expected = Perspectives { user_really_means: user, boss_hears: boss };
            let encoded = serde_json::to_string(&expected).unwrap();
            let raw = if fenced { format!("```json\n{}\n```", encoded) } else { encoded };
            prop_assert_eq!(parse_generation(&raw).unwrap(), expected);
        }
    }
}
