//! Preview server with on-demand post generation
//!
//! Pre-rendered files are served from the public directory. A request for a
//! post slug that has no page yet starts generating it in the background.
//! If the page is ready within [`LOADING_DELAY`] it is returned directly;
//! otherwise the loading shell is served and refreshes itself until the
//! finished page replaces it. Requests for a slug that is already being
//! generated share that generation.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::generator::{Generator, FALLBACK_DIR};
use crate::helpers::is_valid_slug;
use crate::Blog;

/// How long a request waits for on-demand generation before the loading
/// shell is served instead
pub const LOADING_DELAY: Duration = Duration::from_millis(300);

/// Result of one on-demand generation
#[derive(Debug, Clone)]
enum Generated {
    Page(String),
    NotFound,
    Failed,
}

type Pending = watch::Receiver<Option<Generated>>;

/// Server state
struct ServerState {
    generator: Generator,
    loading_delay: Duration,
    /// Generations started by a request, keyed by slug, until a request
    /// collects the outcome
    in_flight: Mutex<HashMap<String, Pending>>,
}

impl ServerState {
    fn new(generator: Generator, loading_delay: Duration) -> Self {
        Self {
            generator,
            loading_delay,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Join the generation of `slug`, starting one if none is running
    fn track(self: &Arc<Self>, slug: &str) -> Pending {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = in_flight.get(slug) {
            return pending.clone();
        }

        let (tx, rx) = watch::channel(None);
        in_flight.insert(slug.to_string(), rx.clone());

        let state = Arc::clone(self);
        let slug = slug.to_string();
        tokio::spawn(async move {
            tracing::info!("Generating {} on demand", slug);
            let outcome = match state.generator.generate_post(&slug).await {
                Ok(page) => Generated::Page(page.html),
                Err(e) if e.is_not_found() => Generated::NotFound,
                Err(e) => {
                    tracing::error!("Failed to generate {}: {}", slug, e);
                    Generated::Failed
                }
            };
            tx.send_replace(Some(outcome));
        });

        rx
    }

    fn forget(&self, slug: &str) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(slug);
    }
}

/// Build the router serving `generator`'s site
pub fn router(generator: Generator) -> Router {
    let state = Arc::new(ServerState::new(generator, LOADING_DELAY));

    Router::new()
        .route("/post/:slug", get(post_handler))
        .route("/post/:slug/", get(post_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the preview server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> anyhow::Result<()> {
    let generator = Generator::new(blog)?;
    let app = router(generator);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve a post page, generating it on demand when it was not pre-rendered
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let generator = &state.generator;
    if slug == FALLBACK_DIR {
        return loading_shell(generator).await;
    }
    if !is_valid_slug(&slug) {
        return not_found(generator);
    }

    let file = generator.blog().post_dir(&slug).join("index.html");
    if let Ok(html) = tokio::fs::read_to_string(&file).await {
        return Html(html).into_response();
    }

    let mut pending = state.track(&slug);
    let waited = tokio::time::timeout(state.loading_delay, async {
        pending
            .wait_for(Option::is_some)
            .await
            .map(|outcome| outcome.clone())
    })
    .await;

    match waited {
        Ok(Ok(outcome)) => {
            state.forget(&slug);
            match outcome {
                Some(Generated::Page(html)) => Html(html).into_response(),
                Some(Generated::NotFound) => not_found(generator),
                Some(Generated::Failed) | None => server_error(),
            }
        }
        // The generating task went away without reporting
        Ok(Err(_)) => {
            state.forget(&slug);
            server_error()
        }
        Err(_) => {
            tracing::debug!("{} still generating, serving loading shell", slug);
            loading_shell(generator).await
        }
    }
}

/// The pre-built loading shell, or a freshly rendered one when the site was
/// served without generating first
async fn loading_shell(generator: &Generator) -> Response {
    if let Ok(html) = tokio::fs::read_to_string(generator.blog().fallback_file()).await {
        return Html(html).into_response();
    }
    match generator.render_loading() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render loading shell: {}", e);
            server_error()
        }
    }
}

/// Serve static files from the public directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let generator = &state.generator;
    let mut service =
        ServeDir::new(&generator.blog().public_dir).append_index_html_on_directories(true);

    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(generator),
        Ok(response) => response.into_response(),
        Err(_) => server_error(),
    }
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}

fn not_found(generator: &Generator) -> Response {
    match generator.render_not_found() {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> anyhow::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
