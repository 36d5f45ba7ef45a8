use crate::error::Result;
use crate::utils::constants::INDEX_FILE;
use axum::Router;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    pub web_root: PathBuf,
    pub data_dir: PathBuf,
}

/// `/` serves the landing page, `/data/communes/{file}` the exported region
/// files, `/static/*` any other assets under the web root.
pub fn app_router(web_root: &Path, data_dir: &Path) -> Router {
    Router::new()
        .route_service("/", ServeFile::new(web_root.join(INDEX_FILE)))
        .nest_service("/data/communes", ServeDir::new(data_dir))
        .nest_service("/static", ServeDir::new(web_root))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(options: ServerOptions) -> Result<()> {
    let app = app_router(&options.web_root, &options.data_dir);

    let bind_addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let local_addr: SocketAddr = listener.local_addr()?;

    info!(
        address = %local_addr,
        web_root = %options.web_root.display(),
        data_dir = %options.data_dir.display(),
        "Serving turbine data"
    );
    println!("Listening on http://{}", local_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
