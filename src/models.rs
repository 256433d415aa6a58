use chrono::NaiveDate;
use serde::Serialize;

/// What a content entry renders as: a regular blog post, or one of the
/// "apps" shown on the simulated phone's home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Post,
    App,
}

/// Validated front-matter for one content file. Only the schema validator
/// constructs these; `slug` always comes from the filename, never from the
/// authored metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMetadata {
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(rename = "type")]
    pub kind: PostKind,
}

impl PostMetadata {
    /// `published` is free text in the schema; callers that want date ordering
    /// parse it here. Anything that is not `YYYY-MM-DD` sorts as undated.
    pub fn published_date(&self) -> Option<NaiveDate> {
        self.published
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
    }
}

/// A fully resolved post for the detail page: metadata title plus the
/// rendered HTML body.
#[derive(Debug, Clone, Serialize)]
pub struct SinglePost {
    pub title: String,
    pub slug: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(published: Option<&str>) -> PostMetadata {
        PostMetadata {
            title: "t".into(),
            description: "d".into(),
            slug: "t".into(),
            icon: None,
            color: None,
            tags: None,
            published: published.map(String::from),
            kind: PostKind::Post,
        }
    }

    #[test]
    fn published_date_parses_iso_dates() {
        let date = meta(Some("2025-11-02")).published_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 2).unwrap());
    }

    #[test]
    fn published_date_is_none_for_free_text() {
        assert!(meta(Some("soon")).published_date().is_none());
        assert!(meta(None).published_date().is_none());
    }
}
