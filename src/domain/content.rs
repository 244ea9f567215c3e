//! Card content validation
//!
//! A jott's body is an Adaptive-Card-style JSON document. The core does not
//! interpret the card schema; it only requires that submitted content parses
//! as JSON and that the top-level value is an object. Deeper semantic
//! validation belongs to the downstream renderer.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ContentError {
    #[error("Invalid JSON: {0}")]
    MalformedSyntax(String),

    #[error("Card content must be a JSON object at the top level")]
    InvalidShape,
}

/// Validated, opaque card content
///
/// Construction goes through [`CardContent::parse`], so a value of this type
/// held in memory has passed the shape check. Stored content that was edited
/// out of band is re-checked with [`CardContent::ensure_shape`] before a jott
/// may transition to published.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CardContent(Value);

impl CardContent {
    /// Parses and validates raw card JSON
    pub fn parse(raw: &str) -> Result<Self, ContentError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ContentError::MalformedSyntax(e.to_string()))?;

        if !value.is_object() {
            return Err(ContentError::InvalidShape);
        }

        Ok(Self(value))
    }

    /// Re-checks the shape of already-stored content
    pub fn ensure_shape(&self) -> Result<(), ContentError> {
        if self.0.is_object() {
            Ok(())
        } else {
            Err(ContentError::InvalidShape)
        }
    }

    /// Returns the underlying JSON value
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Serializes the content back to a JSON string
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    /// Pretty-prints the content for display
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

impl From<CardContent> for Value {
    fn from(content: CardContent) -> Self {
        content.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_empty_object() {
        assert!(CardContent::parse("{}").is_ok());
    }

    #[test]
    fn accepts_card_layout() {
        let raw = r#"{
            "type": "AdaptiveCard",
            "version": "1.5",
            "body": [
                {"type": "TextBlock", "text": "Hello"},
                {"type": "Image", "url": "https://example.com/x.png"}
            ]
        }"#;
        let content = CardContent::parse(raw).unwrap();
        assert_eq!(content.as_value()["type"], "AdaptiveCard");
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CardContent::parse("{not json").unwrap_err();
        assert!(matches!(err, ContentError::MalformedSyntax(_)));
    }

    #[test]
    fn rejects_bare_array() {
        assert_eq!(
            CardContent::parse(r#"[1, 2, 3]"#),
            Err(ContentError::InvalidShape)
        );
    }

    #[test]
    fn rejects_bare_scalars() {
        assert_eq!(CardContent::parse("42"), Err(ContentError::InvalidShape));
        assert_eq!(
            CardContent::parse(r#""hello""#),
            Err(ContentError::InvalidShape)
        );
        assert_eq!(CardContent::parse("true"), Err(ContentError::InvalidShape));
        assert_eq!(CardContent::parse("null"), Err(ContentError::InvalidShape));
    }

    #[test]
    fn json_roundtrip_preserves_content() {
        let raw = r#"{"type":"AdaptiveCard","body":[{"text":"hi","weight":2.5}]}"#;
        let content = CardContent::parse(raw).unwrap();
        let reparsed = CardContent::parse(&content.to_json()).unwrap();
        assert_eq!(content, reparsed);
    }

    #[test]
    fn ensure_shape_catches_corrupted_value() {
        // Simulate a store record edited out of band
        let content: CardContent = serde_json::from_str("[1,2]").unwrap();
        assert_eq!(content.ensure_shape(), Err(ContentError::InvalidShape));
    }

    fn arb_json(depth: u32) -> impl Strategy<Value = serde_json::Value> {
        let leaf = prop_oneof![
            Just(serde_json::Value::Null),
            any::<bool>().prop_map(serde_json::Value::from),
            any::<i64>().prop_map(serde_json::Value::from),
            "[a-z ]{0,16}".prop_map(serde_json::Value::from),
        ];
        leaf.prop_recursive(depth, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
                prop::collection::hash_map("[a-z]{1,8}", inner, 0..4).prop_map(|m| {
                    serde_json::Value::Object(m.into_iter().collect())
                }),
            ]
        })
    }

    proptest! {
        #[test]
        fn parse_accepts_exactly_top_level_objects(value in arb_json(3)) {
            let raw = value.to_string();
            let result = CardContent::parse(&raw);

            if value.is_object() {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(ContentError::InvalidShape));
            }
        }

        #[test]
        fn parse_never_panics_on_arbitrary_input(raw in ".{0,64}") {
            let _ = CardContent::parse(&raw);
        }
    }
}
