use axum::{
    extract::State,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::notification::NotificationEvent;
use crate::realtime::bus::NotificationBus;
use crate::state::AppState;

/// A frame sent by the client. Subscription happens via an explicit `join`
/// carrying the user ID, not via the session token.
#[derive(Deserialize, Debug)]
struct ClientFrame {
    event: String,
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
}

/// A frame sent to the client.
#[derive(Serialize)]
struct ServerFrame<'a> {
    event: &'a str,
    data: &'a NotificationEvent,
}

/// Upgrades the connection and hands it to the socket loop.
#[axum::debug_handler]
pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.bus))
}

/// Drives one client connection until it closes.
///
/// The writer task is the sole owner of the sink; each `join` spawns a bridge
/// task forwarding bus events into it. A second `join` re-homes the session:
/// the old bridge is aborted and the registry entry moves to the new channel.
/// Unparseable frames are ignored. Teardown unsubscribes the session with no
/// further action.
async fn handle_socket(socket: WebSocket, bus: NotificationBus) {
    let session_id = Uuid::new_v4();
    tracing::debug!("🔌 Socket connected: {}", session_id);

    let (mut sink, mut stream) = socket.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    let mut bridge: Option<JoinHandle<()>> = None;
    while let Some(Ok(message)) = stream.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(frame) = sonic_rs::from_str::<ClientFrame>(&text) else {
            continue;
        };

        if frame.event == "join" {
            let Some(user_id) = frame.user_id else {
                continue;
            };
            tracing::debug!("Session {} joining channel {}", session_id, user_id);

            if let Some(task) = bridge.take() {
                task.abort();
            }

            let mut events = bus.subscribe(session_id, &user_id).await;
            let out = out_tx.clone();
            bridge = Some(tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    let frame = ServerFrame {
                        event: "notification",
                        data: &event,
                    };
                    let Ok(body) = sonic_rs::to_string(&frame) else {
                        break;
                    };
                    if out.send(Message::Text(body.into())).is_err() {
                        break;
                    }
                }
            }));
        }
    }

    if let Some(task) = bridge.take() {
        task.abort();
    }
    bus.unsubscribe(session_id).await;
    writer.abort();

    tracing::debug!("🔌 Socket disconnected: {}", session_id);
}
