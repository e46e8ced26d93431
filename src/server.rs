use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::handlers::{dispatch_handler, metrics_handler, root_handler};
use crate::state::AppState;

// creating the router, everything that isn't "/" or "/metrics" is dispatched
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .fallback(dispatch_handler)
        .with_state(state)
}

// Serve until the listener fails, the peer address reaches handlers as ConnectInfo
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let app = router(state);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await
}
