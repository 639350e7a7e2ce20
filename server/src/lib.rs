//! Movie Stats Server
//!
//! Serves the chart form over HTTP. The statistics are prepared once before
//! the listener binds; every request then reads the same immutable
//! [`movie_stats::MovieStats`].
//!
//! ```text
//! -----------------------------------------------------------
//! |                     axum Router                         |
//! |                                                         |
//! |  GET/POST /  --------->  page (form + inline SVG)       |
//! |  GET /chart.svg  ----->  chart renderer                 |
//! |  GET /api/*  --------->  JSON (languages, chart data)   |
//! |  GET /health  -------->  uptime, dataset sizes          |
//! |                                                         |
//! |              State: Arc<MovieStats> (read-only)         |
//! -----------------------------------------------------------
//! ```

pub mod error;
pub mod page;
pub mod routes;
pub mod state;

pub use routes::make_app;
pub use state::ServerState;

/// Bind `addr` and serve until the process is stopped.
pub async fn run_server(state: ServerState, addr: &str) -> anyhow::Result<()> {
    let app = make_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
