//! Pull a JSON object out of free-form model output.
//!
//! Models wrap their answer in markdown fences, prepend chatter, or append
//! notes. The first fenced block wins; otherwise the span from the first `{`
//! to the last `}` is taken.

use serde::de::DeserializeOwned;

use crate::error::ExtractError;

/// Locate the JSON object inside `text`.
pub fn extract_json_object(text: &str) -> Result<&str, ExtractError> {
    let body = fenced_block(text)
        .filter(|block| block.contains('{'))
        .unwrap_or(text);

    let start = body.find('{').ok_or(ExtractError::NoJsonObject)?;
    let end = body.rfind('}').ok_or(ExtractError::NoJsonObject)?;
    if end < start {
        return Err(ExtractError::NoJsonObject);
    }
    Ok(&body[start..=end])
}

/// Extract and deserialize the JSON object inside `text`.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let json = extract_json_object(text)?;
    Ok(serde_json::from_str(json)?)
}

/// Contents of the first ``` fenced block, minus its language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let mut after = &text[open + 3..];

    if let Some(newline) = after.find('\n') {
        let tag = after[..newline].trim();
        if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            after = &after[newline + 1..];
        }
    }

    let close = after.find("```")?;
    Some(&after[..close])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        message: String,
    }

    #[test]
    fn test_extract_fenced_json() {
        let text = "Here you go:\n```json\n{\"message\": \"hi\"}\n```\nThanks";
        assert_eq!(extract_json_object(text).unwrap(), "{\"message\": \"hi\"}");
    }

    #[test]
    fn test_extract_untagged_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_bare_object_with_chatter() {
        let text = "Sure! {\"a\": {\"b\": 2}} hope that helps";
        assert_eq!(extract_json_object(text).unwrap(), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn test_fence_without_object_falls_back_to_whole_text() {
        let text = "```text\nnothing\n``` but later {\"a\": 1}";
        assert_eq!(extract_json_object(text).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_no_object() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(ExtractError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("} backwards {"),
            Err(ExtractError::NoJsonObject)
        ));
    }

    #[test]
    fn test_parse_json_reports_malformed() {
        let err = parse_json::<Payload>("{\"message\": }").unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));
    }

    #[test]
    fn test_parse_json_fenced() {
        let payload: Payload = parse_json("```json\n{\"message\": \"calm blues\"}\n```").unwrap();
        assert_eq!(payload.message, "calm blues");
    }
}
