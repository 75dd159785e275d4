use serde::{Deserialize, Serialize};

/// Frames accepted from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Subscribe { user_id: String },
}

/// Control frames sent by the relay itself. Notification payloads are
/// forwarded verbatim and do not go through this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    Subscribed { user_id: String },

    Error { message: String },
}
