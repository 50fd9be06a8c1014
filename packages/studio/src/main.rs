mod config;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pagecraft_api::HttpComponentsApi;
use pagecraft_editor::{ListController, PageEditor};
use pagecraft_preview::PreviewBridge;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::routes::{AppState, Studio};

/// Pagecraft studio: section editing surface + live preview stream.
#[derive(Debug, Parser)]
#[command(name = "pagecraft-studio")]
struct Args {
    /// HTTP port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Admin backend base URL (overrides config)
    #[arg(long)]
    api_base: Option<String>,

    /// Page key to edit (overrides config)
    #[arg(long)]
    page: Option<String>,

    /// Directory containing pagecraft.config.json
    #[arg(default_value = ".")]
    dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut config = Config::load(&args.dir)?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(api_base) = args.api_base {
        config.api_base = api_base;
    }
    if let Some(page) = args.page {
        config.page_key = page;
    }

    tracing::info!(
        api_base = %config.api_base,
        page_key = %config.page_key,
        "starting pagecraft studio"
    );

    let api = HttpComponentsApi::new(&config.api_base);
    let bridge = Arc::new(PreviewBridge::new(config.page_key.clone()));
    let mut editor = PageEditor::with_bridge(api, config.page_key.clone(), bridge.clone());

    // Initial load; a failure is surfaced as a notice and the UI can
    // retry via /api/reload once the backend is reachable.
    let outcome = editor.load().await;
    tracing::info!(?outcome, sections = editor.sections().len(), "initial load");

    let state = Arc::new(AppState {
        studio: Mutex::new(Studio {
            editor,
            list: ListController::new(),
        }),
        bridge,
    });

    let app = routes::router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    tracing::info!(port = config.port, "studio listening");
    axum::serve(listener, app).await?;

    Ok(())
}
