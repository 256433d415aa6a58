//! Content discovery and resolution. Posts are markdown files under
//! `<content_dir>/posts`; the slug of a post is its file stem.

use std::path::Path;

use gray_matter::{engine::YAML, Matter};
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::error::ContentError;
use crate::markdown;
use crate::models::{PostMetadata, SinglePost};
use crate::schema;

/// Discover and validate the whole content set, eagerly.
///
/// All-or-nothing: the first file whose front-matter fails to parse or
/// validate aborts the load, so malformed content is caught at the first
/// request that touches it instead of silently thinning the list. Output
/// order is directory-iteration order; callers sort explicitly.
pub async fn load_posts(content_dir: &Path) -> Result<Vec<PostMetadata>, ContentError> {
    let posts_dir = content_dir.join("posts");
    let mut posts: Vec<PostMetadata> = Vec::new();
    let mut entries = fs::read_dir(&posts_dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() || !is_markdown(&path) {
            continue;
        }

        let slug = file_slug(&path);
        let text = fs::read_to_string(&path).await?;
        let (raw, _body) = split_front_matter(&path, &text)?;
        let meta = schema::parse_post_metadata(&slug, &raw).map_err(|source| {
            ContentError::Validation {
                slug: slug.clone(),
                source,
            }
        })?;

        // Slugs are URL identifiers; two files mapping to one slug would
        // leave one of them unreachable.
        if posts.iter().any(|p| p.slug == meta.slug) {
            return Err(ContentError::DuplicateSlug { slug: meta.slug });
        }
        posts.push(meta);
    }

    Ok(posts)
}

/// Resolve one post by slug for the detail page.
///
/// The slug is restricted to `[A-Za-z0-9_-]` before it is interpolated into
/// the path template, so a crafted slug can never escape the posts
/// directory; anything else is reported as not found, same as a missing
/// file. Metadata goes through the same schema gate as the aggregate load.
pub async fn resolve_post(content_dir: &Path, slug: &str) -> Result<SinglePost, ContentError> {
    debug!(%slug, "resolving post");

    if !is_safe_slug(slug) {
        return Err(ContentError::NotFound {
            slug: slug.to_string(),
        });
    }

    let path = content_dir.join("posts").join(format!("{slug}.md"));
    let text = match fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ContentError::NotFound {
                slug: slug.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let (raw, body) = split_front_matter(&path, &text)?;
    let meta = schema::parse_post_metadata(slug, &raw).map_err(|source| {
        ContentError::Validation {
            slug: slug.to_string(),
            source,
        }
    })?;

    Ok(SinglePost {
        title: meta.title,
        slug: meta.slug,
        content: markdown::render(&body),
    })
}

/// Read a standalone markdown page (e.g. `home.md`) and render its body,
/// discarding any front-matter block.
pub async fn load_page_html(path: &Path) -> Result<String, ContentError> {
    let text = fs::read_to_string(path).await?;
    let (_raw, body) = split_front_matter(path, &text)?;
    Ok(markdown::render(&body))
}

/// Extract the YAML front-matter block as an untyped record plus the
/// remaining body. A file without a front-matter block yields an empty
/// record, which the schema then rejects for missing required fields.
fn split_front_matter(path: &Path, text: &str) -> Result<(Value, String), ContentError> {
    let matter = Matter::<YAML>::new();
    let parsed =
        matter
            .parse::<Value>(text)
            .map_err(|e| ContentError::MalformedFrontMatter {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
    let raw = parsed
        .data
        .unwrap_or_else(|| Value::Object(Default::default()));
    Ok((raw, parsed.content))
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn file_slug(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
