use actix::prelude::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::events::*;

struct Channel {
    recipient: Recipient<Push>,
    user_key: Option<String>,
}

/// Owns the channel registry. Every mutation and every fan-out goes through
/// this actor's mailbox, so they never interleave.
#[derive(Default)]
pub struct NotificationRelay {
    /// channel id -> channel
    channels: HashMap<Uuid, Channel>,
    /// user key -> channel ids
    users: HashMap<String, HashSet<Uuid>>,
}

impl NotificationRelay {
    pub fn new() -> Self {
        Self::default()
    }

    fn unbind(&mut self, channel_id: &Uuid, user_key: &str) {
        if let Some(ids) = self.users.get_mut(user_key) {
            ids.remove(channel_id);
            if ids.is_empty() {
                self.users.remove(user_key);
            }
        }
    }

    fn remove_channel(&mut self, channel_id: &Uuid) {
        if let Some(channel) = self.channels.remove(channel_id) {
            if let Some(user_key) = channel.user_key {
                self.unbind(channel_id, &user_key);
            }
        }
    }
}

impl Actor for NotificationRelay {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("Notification relay started");
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::info!("Notification relay stopped");
    }
}

impl Handler<Connect> for NotificationRelay {
    type Result = ();

    fn handle(&mut self, msg: Connect, _: &mut Context<Self>) {
        tracing::debug!("Relay channel connected: {}", msg.id);
        self.channels.insert(msg.id, Channel { recipient: msg.recipient, user_key: None });
    }
}

impl Handler<Disconnect> for NotificationRelay {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _: &mut Context<Self>) {
        tracing::debug!("Relay channel disconnected: {}", msg.id);
        self.remove_channel(&msg.id);
    }
}

impl Handler<Subscribe> for NotificationRelay {
    type Result = bool;

    fn handle(&mut self, msg: Subscribe, _: &mut Context<Self>) -> bool {
        let Some(channel) = self.channels.get_mut(&msg.channel_id) else {
            tracing::warn!("Subscribe for unknown channel {}", msg.channel_id);
            return false;
        };

        let previous = channel.user_key.replace(msg.user_key.clone());
        if let Some(previous) = previous.filter(|p| *p != msg.user_key) {
            self.unbind(&msg.channel_id, &previous);
        }

        let ids = self.users.entry(msg.user_key.clone()).or_default();
        ids.insert(msg.channel_id);
        tracing::info!("User {} now has {} relay channel(s)", msg.user_key, ids.len());
        true
    }
}

impl Handler<NotifyUser> for NotificationRelay {
    type Result = usize;

    fn handle(&mut self, msg: NotifyUser, _: &mut Context<Self>) -> usize {
        let Some(ids) = self.users.get(&msg.user_key) else {
            return 0;
        };

        let frame = msg.payload.to_string();
        let mut delivered = 0;
        let mut dead = Vec::new();

        for id in ids {
            let Some(channel) = self.channels.get(id) else {
                dead.push(*id);
                continue;
            };
            if !channel.recipient.connected() {
                dead.push(*id);
                continue;
            }
            match channel.recipient.try_send(Push(frame.clone())) {
                Ok(()) => delivered += 1,
                Err(SendError::Full(_)) => {
                    tracing::warn!("Relay channel {} mailbox full, frame dropped", id);
                }
                Err(SendError::Closed(_)) => dead.push(*id),
            }
        }

        for id in &dead {
            tracing::debug!("Pruning dead relay channel {}", id);
            self.remove_channel(id);
            // channel may already be gone from `channels` but still listed for the user
            self.unbind(id, &msg.user_key);
        }

        tracing::debug!("Notification for {} reached {} channel(s)", msg.user_key, delivered);
        delivered
    }
}

impl Handler<ChannelCount> for NotificationRelay {
    type Result = usize;

    fn handle(&mut self, msg: ChannelCount, _: &mut Context<Self>) -> usize {
        self.users.get(&msg.user_key).map_or(0, HashSet::len)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every frame pushed to it.
    pub struct Collector {
        pub frames: Arc<Mutex<Vec<String>>>,
    }

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<Push> for Collector {
        type Result = ();

        fn handle(&mut self, msg: Push, _: &mut Context<Self>) {
            self.frames.lock().unwrap().push(msg.0);
        }
    }

    #[derive(Message)]
    #[rtype(result = "()")]
    pub struct Halt;

    impl Handler<Halt> for Collector {
        type Result = ();

        fn handle(&mut self, _: Halt, ctx: &mut Context<Self>) {
            ctx.stop();
        }
    }

    pub fn collector() -> (Addr<Collector>, Arc<Mutex<Vec<String>>>) {
        let frames = Arc::new(Mutex::new(Vec::new()));
        (Collector { frames: frames.clone() }.start(), frames)
    }

    async fn connect(
        relay: &Addr<NotificationRelay>,
        addr: &Addr<Collector>,
        user_key: Option<&str>,
    ) -> Uuid {
        let id = Uuid::now_v7();
        relay.send(Connect { id, recipient: addr.clone().recipient() }).await.unwrap();
        if let Some(user_key) = user_key {
            let ok = relay
                .send(Subscribe { channel_id: id, user_key: user_key.to_string() })
                .await
                .unwrap();
            assert!(ok);
        }
        id
    }

    fn notify(user_key: &str) -> NotifyUser {
        NotifyUser {
            user_key: user_key.to_string(),
            payload: serde_json::json!({ "type": "notification", "content": "hi" }),
        }
    }

    #[actix_web::test]
    async fn test_notify_reaches_every_channel_of_user() {
        let relay = NotificationRelay::new().start();
        let (phone, phone_frames) = collector();
        let (laptop, laptop_frames) = collector();
        let (other, other_frames) = collector();

        connect(&relay, &phone, Some("u1")).await;
        connect(&relay, &laptop, Some("u1")).await;
        connect(&relay, &other, Some("u2")).await;

        let delivered = relay.send(notify("u1")).await.unwrap();
        assert_eq!(delivered, 2);

        // let the collectors drain their mailboxes
        actix_web::rt::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(phone_frames.lock().unwrap().len(), 1);
        assert_eq!(laptop_frames.lock().unwrap().len(), 1);
        assert!(other_frames.lock().unwrap().is_empty());

        let frame: serde_json::Value =
            serde_json::from_str(&phone_frames.lock().unwrap()[0]).unwrap();
        assert_eq!(frame["content"], "hi");
    }

    #[actix_web::test]
    async fn test_unsubscribed_or_unknown_user_gets_nothing() {
        let relay = NotificationRelay::new().start();
        let (anon, _) = collector();
        connect(&relay, &anon, None).await;

        assert_eq!(relay.send(notify("nobody")).await.unwrap(), 0);

        let ok = relay
            .send(Subscribe { channel_id: Uuid::now_v7(), user_key: "u1".into() })
            .await
            .unwrap();
        assert!(!ok);
    }

    #[actix_web::test]
    async fn test_resubscribe_moves_channel() {
        let relay = NotificationRelay::new().start();
        let (addr, _) = collector();
        let id = connect(&relay, &addr, Some("u1")).await;

        relay.send(Subscribe { channel_id: id, user_key: "u2".into() }).await.unwrap();

        assert_eq!(relay.send(ChannelCount { user_key: "u1".into() }).await.unwrap(), 0);
        assert_eq!(relay.send(ChannelCount { user_key: "u2".into() }).await.unwrap(), 1);
        assert_eq!(relay.send(notify("u1")).await.unwrap(), 0);
        assert_eq!(relay.send(notify("u2")).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_disconnect_removes_channel() {
        let relay = NotificationRelay::new().start();
        let (addr, _) = collector();
        let id = connect(&relay, &addr, Some("u1")).await;

        relay.send(Disconnect { id }).await.unwrap();

        assert_eq!(relay.send(ChannelCount { user_key: "u1".into() }).await.unwrap(), 0);
        assert_eq!(relay.send(notify("u1")).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn test_dead_channel_is_pruned_during_fan_out() {
        let relay = NotificationRelay::new().start();
        let (alive, alive_frames) = collector();
        let (gone, _) = collector();

        connect(&relay, &alive, Some("u1")).await;
        connect(&relay, &gone, Some("u1")).await;

        gone.send(Halt).await.unwrap();
        actix_web::rt::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(relay.send(notify("u1")).await.unwrap(), 1);
        assert_eq!(relay.send(ChannelCount { user_key: "u1".into() }).await.unwrap(), 1);

        actix_web::rt::time::sleep(std::time::Duration::from_millis(20)).await;
        assert_eq!(alive_frames.lock().unwrap().len(), 1);
    }
}
