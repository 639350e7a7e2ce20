//! Server State
//!
//! The prepared statistics are built once at startup and never mutated, so
//! handlers share them through an `Arc` without any lock. Request failures
//! only produce a response; nothing here changes after startup.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               ServerState                │
//! ├─────────────────────┬────────────────────┤
//! │  stats: Arc<..>     │  start_time        │
//! │  - cleaned table    │  (uptime in        │
//! │  - aggregates       │   /health)         │
//! │  - language catalog │                    │
//! └─────────────────────┴────────────────────┘
//! ```

use axum::extract::FromRef;
use movie_stats::MovieStats;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub type SharedStats = Arc<MovieStats>;

#[derive(Clone)]
pub struct ServerState {
    pub stats: SharedStats,
    pub start_time: Instant,
}

impl ServerState {
    pub fn new(stats: MovieStats) -> Self {
        Self {
            stats: Arc::new(stats),
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl FromRef<ServerState> for SharedStats {
    fn from_ref(input: &ServerState) -> Self {
        input.stats.clone()
    }
}

/// Uptime as `"<days>d HH:MM:SS"`.
pub fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}
