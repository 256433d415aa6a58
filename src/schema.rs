//! Front-matter schema. Every content record, whichever loader produced it,
//! passes through `parse_post_metadata` before it can reach a handler.

use serde_json::Value;
use thiserror::Error;

use crate::models::{PostKind, PostMetadata};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("field '{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field 'title' must not be empty")]
    EmptyTitle,

    #[error("unknown post type '{value}', expected \"post\" or \"app\"")]
    UnknownKind { value: String },
}

/// Validate one raw front-matter record into a `PostMetadata`.
///
/// `slug` is the filename-derived identifier; an authored `slug` key in the
/// front-matter is ignored so URLs always track the file layout. Pure: no
/// I/O, no defaulting beyond `type`.
pub fn parse_post_metadata(slug: &str, raw: &Value) -> Result<PostMetadata, ValidationError> {
    let title = required_text(raw, "title")?;
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let description = required_text(raw, "description")?;

    Ok(PostMetadata {
        title,
        description,
        slug: slug.to_string(),
        icon: optional_text(raw, "icon")?,
        color: optional_text(raw, "color")?,
        tags: optional_tags(raw)?,
        published: optional_text(raw, "published")?,
        kind: post_kind(raw)?,
    })
}

fn required_text(raw: &Value, field: &'static str) -> Result<String, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField { field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: "text",
        }),
    }
}

fn optional_text(raw: &Value, field: &'static str) -> Result<Option<String>, ValidationError> {
    match raw.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::InvalidField {
            field,
            expected: "text",
        }),
    }
}

fn optional_tags(raw: &Value) -> Result<Option<Vec<String>>, ValidationError> {
    let invalid = ValidationError::InvalidField {
        field: "tags",
        expected: "a sequence of text",
    };
    match raw.get("tags") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let mut tags = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => tags.push(s.clone()),
                    _ => return Err(invalid),
                }
            }
            Ok(Some(tags))
        }
        Some(_) => Err(invalid),
    }
}

fn post_kind(raw: &Value) -> Result<PostKind, ValidationError> {
    match raw.get("type") {
        None | Some(Value::Null) => Ok(PostKind::Post),
        Some(Value::String(s)) => match s.as_str() {
            "post" => Ok(PostKind::Post),
            "app" => Ok(PostKind::App),
            other => Err(ValidationError::UnknownKind {
                value: other.to_string(),
            }),
        },
        Some(_) => Err(ValidationError::InvalidField {
            field: "type",
            expected: "text",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_defaults_to_post() {
        let raw = json!({ "title": "Hello", "description": "A post" });
        let meta = parse_post_metadata("hello", &raw).unwrap();
        assert_eq!(meta.kind, PostKind::Post);
        assert_eq!(meta.slug, "hello");
        assert!(meta.tags.is_none());
        assert!(meta.published.is_none());
    }

    #[test]
    fn missing_title_fails() {
        let raw = json!({ "description": "No title here" });
        let err = parse_post_metadata("x", &raw).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { field: "title" });
    }

    #[test]
    fn empty_title_fails() {
        let raw = json!({ "title": "  ", "description": "d" });
        assert_eq!(
            parse_post_metadata("x", &raw).unwrap_err(),
            ValidationError::EmptyTitle
        );
    }

    #[test]
    fn missing_description_fails() {
        let raw = json!({ "title": "T" });
        assert_eq!(
            parse_post_metadata("x", &raw).unwrap_err(),
            ValidationError::MissingField {
                field: "description"
            }
        );
    }

    #[test]
    fn unknown_type_fails() {
        let raw = json!({ "title": "T", "description": "d", "type": "page" });
        assert_eq!(
            parse_post_metadata("x", &raw).unwrap_err(),
            ValidationError::UnknownKind {
                value: "page".into()
            }
        );
    }

    #[test]
    fn app_type_is_accepted() {
        let raw = json!({
            "title": "Timer",
            "description": "A timer app",
            "type": "app",
            "icon": "clock",
            "color": "#7aa2f7",
        });
        let meta = parse_post_metadata("timer", &raw).unwrap();
        assert_eq!(meta.kind, PostKind::App);
        assert_eq!(meta.icon.as_deref(), Some("clock"));
        assert_eq!(meta.color.as_deref(), Some("#7aa2f7"));
    }

    #[test]
    fn tags_must_be_a_sequence_of_text() {
        let raw = json!({ "title": "T", "description": "d", "tags": "rust" });
        assert!(parse_post_metadata("x", &raw).is_err());

        let raw = json!({ "title": "T", "description": "d", "tags": ["rust", 3] });
        assert!(parse_post_metadata("x", &raw).is_err());

        let raw = json!({ "title": "T", "description": "d", "tags": ["rust", "axum"] });
        let meta = parse_post_metadata("x", &raw).unwrap();
        assert_eq!(meta.tags, Some(vec!["rust".into(), "axum".into()]));
    }

    #[test]
    fn numeric_title_is_a_type_error() {
        let raw = json!({ "title": 42, "description": "d" });
        assert_eq!(
            parse_post_metadata("x", &raw).unwrap_err(),
            ValidationError::InvalidField {
                field: "title",
                expected: "text"
            }
        );
    }

    #[test]
    fn authored_slug_is_ignored() {
        let raw = json!({ "title": "T", "description": "d", "slug": "authored-name" });
        let meta = parse_post_metadata("from-filename", &raw).unwrap();
        assert_eq!(meta.slug, "from-filename");
    }
}
