use crate::{
    game::{GameSession, SubmitOutcome},
    models::GameSettings,
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use anyhow::{bail, Context};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection. Each connection plays its own game.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(100);

    tracing::info!("WebSocket connection established");

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let mut recv_task = tokio::spawn(async move {
        let mut session: Option<GameSession> = None;

        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) =
                            handle_client_message(client_msg, &state, &mut session, &tx).await
                        {
                            tracing::warn!("Error handling message: {:#}", e);
                            let error_msg = ServerMessage::Error {
                                message: e.to_string(),
                            };
                            let _ = tx.send(error_msg).await;
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            message: format!("Invalid message format: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client disconnected");
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    tracing::info!("WebSocket connection closed");
}

fn game_state(session: &GameSession) -> ServerMessage {
    ServerMessage::GameState {
        game_id: session.game_id.to_string(),
        state: session.snapshot(),
    }
}

fn game_over(session: &GameSession) -> ServerMessage {
    let snapshot = session.snapshot();
    ServerMessage::GameOver {
        final_score: snapshot.score,
        rounds_played: snapshot.round,
        max_rounds: snapshot.max_rounds,
    }
}

/// Messages answering a guess. `Skipped` never results from a guess.
fn guess_replies(
    outcome: SubmitOutcome,
    session: &GameSession,
) -> anyhow::Result<Vec<ServerMessage>> {
    let accepted = || ServerMessage::WordAccepted {
        score: session.snapshot().score,
    };

    match outcome {
        SubmitOutcome::Correct => Ok(vec![accepted(), game_state(session)]),
        SubmitOutcome::Finished => Ok(vec![accepted(), game_over(session)]),
        SubmitOutcome::Incorrect => Ok(vec![ServerMessage::WordRejected {
            reason: "Try again!".to_string(),
        }]),
        SubmitOutcome::Skipped => bail!("Guess produced a skip outcome"),
    }
}

/// Handle individual client messages
async fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    session: &mut Option<GameSession>,
    tx: &mpsc::Sender<ServerMessage>,
) -> anyhow::Result<()> {
    match msg {
        ClientMessage::NewGame { max_rounds } => {
            let defaults = state.config.game.settings();
            let settings = GameSettings {
                max_rounds: max_rounds.unwrap_or(defaults.max_rounds),
                ..defaults
            };
            let new_session = GameSession::new(state.words.clone(), settings)?;
            tracing::info!(
                "Started game {} over WebSocket ({} rounds)",
                new_session.game_id,
                settings.max_rounds
            );
            tx.send(game_state(&new_session)).await?;
            *session = Some(new_session);
        }
        ClientMessage::SubmitWord { word } => {
            let session = session.as_mut().context("No active game; send new_game first")?;
            if session.engine().is_complete() {
                bail!("Game is over; send restart to play again");
            }

            let outcome = session.submit(&word);
            for reply in guess_replies(outcome, session)? {
                tx.send(reply).await?;
            }
        }
        ClientMessage::SkipWord => {
            let session = session.as_mut().context("No active game; send new_game first")?;
            if session.engine().is_complete() {
                bail!("Game is over; send restart to play again");
            }

            match session.skip() {
                SubmitOutcome::Finished => tx.send(game_over(session)).await?,
                _ => tx.send(game_state(session)).await?,
            }
        }
        ClientMessage::Restart => {
            let session = session.as_mut().context("No active game; send new_game first")?;
            session.restart()?;
            tx.send(game_state(session)).await?;
        }
    }

    Ok(())
}
