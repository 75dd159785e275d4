use actix::prelude::*;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::events::{Connect, Disconnect, Push, Subscribe};
use super::message::{ClientMessage, ServerMessage};
use super::server::NotificationRelay;

/// One websocket connection. Outbound frames go through `tx`, which the
/// handler drains into the socket.
pub struct RelaySession {
    pub id: Uuid,
    pub user_key: Option<String>,
    pub relay: Addr<NotificationRelay>,
    pub tx: mpsc::UnboundedSender<String>,
}

/// Sent by the handler once the socket loop ends.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Shutdown;

impl RelaySession {
    pub fn new(relay: Addr<NotificationRelay>, tx: mpsc::UnboundedSender<String>) -> Self {
        Self { id: Uuid::now_v7(), user_key: None, relay, tx }
    }

    fn send_to_client(&self, msg: &ServerMessage, ctx: &mut Context<Self>) {
        match serde_json::to_string(msg) {
            Ok(json) => self.send_frame(json, ctx),
            Err(e) => tracing::error!("Cannot serialize relay frame (session {}): {}", self.id, e),
        }
    }

    fn send_frame(&self, frame: String, ctx: &mut Context<Self>) {
        if self.tx.send(frame).is_err() {
            tracing::debug!("Relay session {} lost its socket", self.id);
            ctx.stop();
        }
    }
}

impl Actor for RelaySession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::debug!("Relay session started: {}", self.id);
        self.relay.do_send(Connect { id: self.id, recipient: ctx.address().recipient() });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!("Relay session stopped: {}", self.id);
        self.relay.do_send(Disconnect { id: self.id });
    }
}

impl Message for ClientMessage {
    type Result = ();
}

impl Handler<ClientMessage> for RelaySession {
    type Result = ();

    fn handle(&mut self, msg: ClientMessage, ctx: &mut Context<Self>) {
        match msg {
            ClientMessage::Subscribe { user_id } => {
                if user_id.trim().is_empty() {
                    self.send_to_client(
                        &ServerMessage::Error { message: "userId cannot be empty".into() },
                        ctx,
                    );
                    return;
                }

                self.relay.do_send(Subscribe { channel_id: self.id, user_key: user_id.clone() });
                self.user_key = Some(user_id.clone());
                tracing::info!("Relay session {} subscribed as {}", self.id, user_id);
                self.send_to_client(&ServerMessage::Subscribed { user_id }, ctx);
            }
        }
    }
}

impl Handler<Push> for RelaySession {
    type Result = ();

    fn handle(&mut self, msg: Push, ctx: &mut Context<Self>) {
        self.send_frame(msg.0, ctx);
    }
}

impl Handler<Shutdown> for RelaySession {
    type Result = ();

    fn handle(&mut self, _: Shutdown, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}
