/// Notification relay
///
/// Keeps an in-memory registry of live websocket channels per user and pushes
/// notification payloads to them. Nothing here is persisted.
///
/// - `events`: actor messages exchanged with the relay
/// - `message`: client/server wire protocol
/// - `server`: the `NotificationRelay` actor owning the registry
/// - `session`: one `RelaySession` actor per websocket connection
/// - `handler`: HTTP upgrade and frame pump
pub mod events;
pub mod handler;
pub mod message;
pub mod server;
pub mod session;
