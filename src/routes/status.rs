//! Relay status endpoint
//!
//! Reports what the relay currently holds so an operator can check the
//! server from a phone browser before sending files.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStatus {
    pub version: &'static str,
    /// Sessions that have received at least one upload
    pub sessions: usize,
    /// Uploads currently listed across all sessions
    pub files: usize,
    /// Address other devices should use
    pub public_url: String,
    pub retention_max_age_secs: Option<u64>,
}

async fn relay_status(State(state): State<AppState>) -> Json<RelayStatus> {
    let registry = state.registry();
    let sessions = registry.session_count().await;
    let files = registry.record_count().await;

    Json(RelayStatus {
        version: env!("CARGO_PKG_VERSION"),
        sessions,
        files,
        public_url: state.public_base_url().to_string(),
        retention_max_age_secs: state.config().retention.max_age_secs,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(relay_status))
}
