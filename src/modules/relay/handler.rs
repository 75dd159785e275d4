use actix::{Actor, Addr};
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_ws::Message;
use tokio::sync::mpsc;

use super::message::ClientMessage;
use super::server::NotificationRelay;
use super::session::{RelaySession, Shutdown};

/// GET /ws
///
/// Upgrades the request and pumps frames both ways:
/// - inbound text frames are parsed into `ClientMessage` for the session actor
/// - outbound frames arrive from the session actor through an mpsc channel
pub async fn relay_handler(
    req: HttpRequest,
    stream: web::Payload,
    relay: web::Data<Addr<NotificationRelay>>,
) -> Result<HttpResponse, Error> {
    tracing::debug!("Relay upgrade request from {:?}", req.peer_addr());

    let (response, mut ws_session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let addr = RelaySession::new(relay.get_ref().clone(), tx).start();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                msg = msg_stream.recv() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ClientMessage>(&text) {
                                Ok(client_msg) => addr.do_send(client_msg),
                                Err(e) => {
                                    let preview: String = text.chars().take(100).collect();
                                    tracing::warn!(
                                        "Ignoring unparseable relay frame: {} - raw: {}",
                                        e,
                                        preview
                                    );
                                }
                            }
                        }

                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = ws_session.pong(&data).await {
                                tracing::error!("Cannot send pong: {}", e);
                                break;
                            }
                        }

                        Some(Ok(Message::Close(reason))) => {
                            tracing::info!("Relay close frame: {:?}", reason);
                            break;
                        }

                        Some(Ok(Message::Binary(_))) => {
                            tracing::warn!("Binary frames are not supported");
                        }

                        Some(Ok(Message::Pong(_) | Message::Continuation(_) | Message::Nop)) => {}

                        Some(Err(e)) => {
                            tracing::error!("Relay protocol error: {}", e);
                            break;
                        }

                        None => break,
                    }
                }

                Some(frame) = rx.recv() => {
                    if ws_session.text(frame).await.is_err() {
                        tracing::error!("Cannot write to relay client");
                        break;
                    }
                }
            }
        }

        addr.do_send(Shutdown);
        let _ = ws_session.close(None).await;
        tracing::debug!("Relay socket loop finished");
    });

    Ok(response)
}
