//! HTTP/WebSocket server assembly.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::ui::handler;
use crate::ui::signal;
use crate::ui::state::AppState;

pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handler::http::health_check))
            .route("/rooms", get(handler::http::get_rooms))
            .route("/rooms/{room_id}", get(handler::http::get_room_detail))
            .route(
                "/rooms/{room_id}/expel",
                post(handler::http::expel_participant),
            )
            .route("/ws", get(handler::websocket::game_websocket_handler))
            .route("/chat/ws", get(handler::websocket::chat_websocket_handler))
            .route("/lobby/ws", get(handler::websocket::lobby_websocket_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Binds and serves until a shutdown signal arrives.
    pub async fn run(&self, host: &str, port: u16) -> std::io::Result<()> {
        let addr = format!("{host}:{port}");
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(addr = %addr, "server listening");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal::shutdown_signal())
            .await
    }
}
