use actix::prelude::*;
use uuid::Uuid;

/// Text frame pushed to a single channel.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct Push(pub String);

/// A channel opened; it receives nothing until subscribed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub id: Uuid,
    pub recipient: Recipient<Push>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: Uuid,
}

/// Binds a channel to a user. A channel belongs to at most one user, so
/// subscribing again moves it.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Subscribe {
    pub channel_id: Uuid,
    pub user_key: String,
}

/// Fans `payload` out to every live channel of `user_key`. Returns how many
/// channels accepted it.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct NotifyUser {
    pub user_key: String,
    pub payload: serde_json::Value,
}

/// Number of channels currently bound to a user.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct ChannelCount {
    pub user_key: String,
}
