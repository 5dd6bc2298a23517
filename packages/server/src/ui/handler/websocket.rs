//! WebSocket connection handlers for game rooms, room chat, and the lobby.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::values::{PlayerKey, PlayerName, RoomId},
    infrastructure::dto::{ClientMessage, ServerMessage},
    infrastructure::notifier::{
        WebSocketChatNotifier, WebSocketGameNotifier, WebSocketLobbyNotifier,
    },
    ui::state::AppState,
    usecase::error::GameError,
};

/// Query parameters for a game room connection.
#[derive(Debug, Deserialize)]
pub struct GameConnectQuery {
    pub room_id: String,
    pub player_id: String,
    pub name: String,
    #[serde(default)]
    pub host: bool,
    /// When present, at most one live connection per account is allowed.
    pub account_id: Option<i64>,
}

pub async fn game_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<GameConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let (room_id, key, name) = match (
        RoomId::new(query.room_id.clone()),
        PlayerKey::new(query.player_id.clone()),
        PlayerName::new(query.name.clone()),
    ) {
        (Ok(room_id), Ok(key), Ok(name)) => (room_id, key, name),
        _ => {
            tracing::warn!(room_id = %query.room_id, player_id = %query.player_id, "rejected connection with invalid parameters");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    if let Some(account_id) = query.account_id {
        if !state.sessions.try_register(account_id, name.as_str()).await {
            tracing::warn!(account_id, "account already holds a live session, rejecting");
            return Err(StatusCode::CONFLICT);
        }
    }

    let (tx, rx) = mpsc::unbounded_channel();
    let notifier = Arc::new(WebSocketGameNotifier::new(tx.clone()));

    if let Err(error) = state
        .coordinator
        .subscribe(&room_id, key.clone(), name.clone(), query.host, notifier)
        .await
    {
        if let Some(account_id) = query.account_id {
            state.sessions.remove(account_id).await;
        }
        tracing::warn!(room_id = %room_id, player = %key, error = %error, "subscription rejected");
        return Err(match error {
            GameError::Domain(crate::domain::error::DomainError::RoomFinished(_)) => {
                StatusCode::GONE
            }
            GameError::Domain(_) => StatusCode::BAD_REQUEST,
            GameError::RoomNotFound(_) => StatusCode::NOT_FOUND,
        });
    }

    if let Some(summary) = state.coordinator.room_summary(&room_id).await {
        state.lobby.room_updated(&summary).await;
    }

    Ok(ws.on_upgrade(move |socket| {
        handle_game_socket(socket, state, room_id, key, rx, tx, query.account_id)
    }))
}

/// Drains the per-connection channel into the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

fn push_error(tx: &mpsc::UnboundedSender<String>, message: String) {
    if let Ok(json) = serde_json::to_string(&ServerMessage::Error { message }) {
        // A closed channel here means the pusher task is gone; the
        // disconnect path below will clean up.
        let _ = tx.send(json);
    }
}

async fn handle_game_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    key: PlayerKey,
    rx: mpsc::UnboundedReceiver<String>,
    tx: mpsc::UnboundedSender<String>,
    account_id: Option<i64>,
) {
    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_room_id = room_id.clone();
    let recv_key = key.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(error) => {
                    tracing::warn!(player = %recv_key, error = %error, "websocket receive error");
                    break;
                }
            };
            match msg {
                Message::Text(text) => {
                    let parsed = match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(parsed) => parsed,
                        Err(error) => {
                            tracing::warn!(player = %recv_key, error = %error, "unparseable client message");
                            push_error(&tx, "unrecognized message".to_string());
                            continue;
                        }
                    };
                    let result = match parsed {
                        ClientMessage::StartGame => {
                            recv_state.coordinator.start(&recv_room_id, &recv_key).await
                        }
                        ClientMessage::Guess { text } => {
                            recv_state
                                .coordinator
                                .submit_guess(&recv_room_id, &recv_key, &text)
                                .await
                        }
                        ClientMessage::Chat { text } => {
                            recv_state
                                .coordinator
                                .submit_chat(&recv_room_id, &recv_key, &text)
                                .await
                        }
                        ClientMessage::Stroke { stroke } => {
                            recv_state
                                .coordinator
                                .submit_stroke(&recv_room_id, &recv_key, stroke)
                                .await
                        }
                        ClientMessage::Leave => break,
                    };
                    if let Err(error) = result {
                        tracing::warn!(player = %recv_key, error = %error, "game operation rejected");
                        push_error(&tx, error.to_string());
                    }
                }
                Message::Close(_) => {
                    tracing::info!(player = %recv_key, "client requested close");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.coordinator.leave(&room_id, &key).await;
    if let Some(account_id) = account_id {
        state.sessions.remove(account_id).await;
    }
    match state.coordinator.room_summary(&room_id).await {
        Some(summary) => state.lobby.room_updated(&summary).await,
        None => state.lobby.room_cancelled(&room_id).await,
    }
    tracing::info!(room_id = %room_id, player = %key, "connection closed");
}

/// Query parameters for a chat room connection.
#[derive(Debug, Deserialize)]
pub struct ChatConnectQuery {
    pub room_id: String,
    pub name: String,
}

pub async fn chat_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChatConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let (room_id, name) = match (RoomId::new(query.room_id), PlayerName::new(query.name)) {
        (Ok(room_id), Ok(name)) => (room_id, name),
        _ => return Err(StatusCode::BAD_REQUEST),
    };

    let (tx, rx) = mpsc::unbounded_channel();
    state
        .chat
        .join(&room_id, name.clone(), Arc::new(WebSocketChatNotifier::new(tx)))
        .await;

    Ok(ws.on_upgrade(move |socket| handle_chat_socket(socket, state, room_id, name, rx)))
}

async fn handle_chat_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    name: PlayerName,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_room_id = room_id.clone();
    let recv_name = name.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Err(error) = recv_state
                        .chat
                        .broadcast_message(&recv_room_id, &recv_name, &text)
                        .await
                    {
                        tracing::warn!(participant = %recv_name, error = %error, "chat message rejected");
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.chat.leave(&room_id, &name).await;
}

pub async fn lobby_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_lobby_socket(socket, state))
}

async fn handle_lobby_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(rx, sender);

    let subscription = state
        .lobby
        .subscribe(Arc::new(WebSocketLobbyNotifier::new(tx)))
        .await;

    // Initial room list so the subscriber does not wait for the next change.
    let summaries = state.coordinator.room_summaries().await;
    state.lobby.refresh(&subscription, &summaries).await;

    // Lobby subscribers are read-only; drain until the peer goes away.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if matches!(msg, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.lobby.unsubscribe(&subscription).await;
    tracing::debug!(subscription = %subscription, "lobby subscriber disconnected");
}
