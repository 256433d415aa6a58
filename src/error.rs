use std::path::PathBuf;

use thiserror::Error;

use crate::schema::ValidationError;

/// Failures from the content pipeline. Loading is all-or-nothing: the first
/// bad record aborts the whole aggregate load.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("invalid front-matter for '{slug}': {source}")]
    Validation {
        slug: String,
        #[source]
        source: ValidationError,
    },

    #[error("malformed front-matter in {}: {message}", path.display())]
    MalformedFrontMatter { path: PathBuf, message: String },

    #[error("duplicate slug '{slug}' in content set")]
    DuplicateSlug { slug: String },

    #[error("no post matches slug '{slug}'")]
    NotFound { slug: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
