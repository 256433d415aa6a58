mod content_loader;
mod device;
mod error;
mod hot_reload;
mod markdown;
mod models;
mod schema;
mod state;
mod theme;

use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    extract::{Path as UrlPath, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, get_service, post},
    Json, Router,
};
use tokio::{fs, net::TcpListener, sync::broadcast};
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::device::{DeviceState, DeviceUpdate};
use crate::error::ContentError;
use crate::models::PostMetadata;
use crate::state::{AppState, RouterState};
use crate::theme::ThemeState;

const HOT_RELOAD_SCRIPT: &str = r#"
<script>
    const socket = new WebSocket("ws://" + window.location.host + "/ws");
    socket.onmessage = (event) => {
        if (event.data === "reload") {
            window.location.reload();
        }
    };
</script>
"#;

/// Page chrome read fresh per request, same as the content itself.
struct Templates {
    layout: String,
    banner: String,
    not_found: String,
}

impl Templates {
    async fn load(content_dir: &Path) -> Result<Self, ContentError> {
        Ok(Self {
            layout: fs::read_to_string(content_dir.join("layout.html")).await?,
            banner: fs::read_to_string(content_dir.join("banner.html")).await?,
            not_found: fs::read_to_string(content_dir.join("not_found.html")).await?,
        })
    }
}

fn render_with_layout(
    templates: &Templates,
    theme: &ThemeState,
    title: &str,
    content: &str,
    posts: &[PostMetadata],
    is_development: bool,
) -> String {
    let mut list_items = String::new();
    for post in posts {
        list_items.push_str(&format!(
            "<li><a href=\"/posts/{}\">{}</a></li>\n",
            post.slug,
            htmlescape::encode_minimal(&post.title)
        ));
    }

    let mut page = templates
        .layout
        .replace("{{ title }}", &htmlescape::encode_minimal(title))
        .replace("{{ theme_css }}", &theme.css_variables())
        .replace("{{ banner }}", &templates.banner)
        .replace("{{ content }}", content)
        .replace("{{ posts }}", &list_items);

    if is_development {
        page = page.replace("</body>", &format!("{HOT_RELOAD_SCRIPT}</body>"));
    }

    page
}

/// Aggregate load plus the explicit sort the loader itself does not do:
/// newest `published` date first, undated entries last in discovery order.
async fn sorted_posts(state: &AppState) -> Result<Vec<PostMetadata>, ContentError> {
    let mut posts = content_loader::load_posts(&state.content_dir).await?;
    posts.sort_by(|a, b| b.published_date().cmp(&a.published_date()));
    Ok(posts)
}

fn internal_error(err: ContentError) -> Response {
    error!("request failed: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Something broke rendering this page.</h1>".to_string()),
    )
        .into_response()
}

async fn homepage(State(state): State<Arc<AppState>>) -> Response {
    match build_homepage(&state).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn build_homepage(state: &AppState) -> Result<String, ContentError> {
    let templates = Templates::load(&state.content_dir).await?;
    let home_html = content_loader::load_page_html(&state.content_dir.join("home.md")).await?;
    let posts = sorted_posts(state).await?;
    let theme = state.theme.read().await.clone();
    Ok(render_with_layout(
        &templates,
        &theme,
        "home",
        &home_html,
        &posts,
        state.is_development,
    ))
}

async fn render_post(
    UrlPath(slug): UrlPath<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match build_post_page(&state, &slug).await {
        Ok(page) => Html(page).into_response(),
        Err(e) if e.is_not_found() => not_found_page(&state, &slug).await,
        Err(e) => internal_error(e),
    }
}

async fn build_post_page(state: &AppState, slug: &str) -> Result<String, ContentError> {
    let post = content_loader::resolve_post(&state.content_dir, slug).await?;
    let templates = Templates::load(&state.content_dir).await?;
    let posts = sorted_posts(state).await?;
    let theme = state.theme.read().await.clone();

    let body = format!(
        "<article><h1>{}</h1>{}</article>",
        htmlescape::encode_minimal(&post.title),
        post.content
    );

    Ok(render_with_layout(
        &templates,
        &theme,
        &post.title,
        &body,
        &posts,
        state.is_development,
    ))
}

async fn not_found_page(state: &AppState, slug: &str) -> Response {
    match build_not_found_page(state, slug).await {
        Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn build_not_found_page(state: &AppState, slug: &str) -> Result<String, ContentError> {
    let templates = Templates::load(&state.content_dir).await?;
    let posts = sorted_posts(state).await?;
    let theme = state.theme.read().await.clone();
    let body = templates
        .not_found
        .replace("{{slug}}", &htmlescape::encode_minimal(slug));
    Ok(render_with_layout(
        &templates,
        &theme,
        "not found",
        &body,
        &posts,
        state.is_development,
    ))
}

/// The aggregate interface as-is: discovery order, no sorting.
async fn api_posts(State(state): State<Arc<AppState>>) -> Response {
    match content_loader::load_posts(&state.content_dir).await {
        Ok(posts) => Json(serde_json::json!({ "posts": posts })).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn api_theme(State(state): State<Arc<AppState>>) -> Json<ThemeState> {
    Json(state.theme.read().await.clone())
}

async fn api_theme_toggle(State(state): State<Arc<AppState>>) -> Json<ThemeState> {
    let mut theme = state.theme.write().await;
    theme.toggle();
    Json(theme.clone())
}

async fn api_device(State(state): State<Arc<AppState>>) -> Json<DeviceState> {
    Json(state.device.read().await.clone())
}

async fn api_device_update(
    State(state): State<Arc<AppState>>,
    Json(update): Json<DeviceUpdate>,
) -> Json<DeviceState> {
    let mut device = state.device.write().await;
    device.apply(&update);
    Json(device.clone())
}

#[tokio::main]
async fn main() {
    let is_development = std::env::var("RUST_ENV")
        .map(|v| v == "development")
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let content_dir = PathBuf::from(
        std::env::var("CONTENT_DIR").unwrap_or_else(|_| "content".into()),
    );

    // Validate the whole content set up front so malformed front-matter is
    // an operator-visible startup failure, not a surprise on first request.
    let posts = content_loader::load_posts(&content_dir)
        .await
        .expect("content validation failed");
    info!(posts = posts.len(), "content set validated");

    let state = Arc::new(AppState::new(content_dir.clone(), is_development));

    let (tx, _rx) = broadcast::channel(1);
    if is_development {
        info!("live reload enabled");
        hot_reload::start_content_watcher(tx.clone(), content_dir.clone());
    }

    let router_state = RouterState {
        app_state: state,
        broadcaster: tx,
    };

    let static_dir = get_service(ServeDir::new(content_dir.join("static")));

    let app = Router::new()
        .route("/", get(homepage))
        .route("/posts/{slug}", get(render_post))
        .route("/api/posts", get(api_posts))
        .route("/api/theme", get(api_theme))
        .route("/api/theme/toggle", post(api_theme_toggle))
        .route("/api/device", get(api_device).post(api_device_update))
        .nest_service("/static", static_dir)
        .route("/ws", get(hot_reload::ws_handler))
        .with_state(router_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "listening");
    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostKind;

    fn templates() -> Templates {
        Templates {
            layout: "<html><head><title>{{ title }}</title><style>{{ theme_css }}</style></head>\
                     <body>{{ banner }}<main>{{ content }}</main><ul>{{ posts }}</ul></body></html>"
                .to_string(),
            banner: "<header>banner</header>".to_string(),
            not_found: "<p>No post called {{slug}}.</p>".to_string(),
        }
    }

    fn post(title: &str, slug: &str, published: Option<&str>) -> PostMetadata {
        PostMetadata {
            title: title.to_string(),
            description: String::new(),
            slug: slug.to_string(),
            icon: None,
            color: None,
            tags: None,
            published: published.map(String::from),
            kind: PostKind::Post,
        }
    }

    #[test]
    fn layout_substitution_escapes_titles() {
        let posts = vec![post("Tags & <Tricks>", "tags-and-tricks", None)];
        let page = render_with_layout(
            &templates(),
            &ThemeState::new(),
            "home",
            "<p>hi</p>",
            &posts,
            false,
        );
        assert!(page.contains("Tags &amp; &lt;Tricks&gt;"));
        assert!(page.contains("href=\"/posts/tags-and-tricks\""));
        assert!(page.contains("--bg: #1a1b26"));
        assert!(!page.contains("WebSocket"));
    }

    #[test]
    fn development_pages_carry_the_reload_script() {
        let page = render_with_layout(&templates(), &ThemeState::new(), "home", "", &[], true);
        assert!(page.contains("WebSocket"));
    }

    #[test]
    fn sort_puts_newest_first_and_undated_last() {
        let mut posts = vec![
            post("old", "old", Some("2023-01-01")),
            post("undated", "undated", None),
            post("new", "new", Some("2025-06-30")),
        ];
        posts.sort_by(|a, b| b.published_date().cmp(&a.published_date()));
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["new", "old", "undated"]);
    }
}
