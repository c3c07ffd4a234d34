use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Handles the USER FTP command.
///
/// Any username is accepted and the client is asked for a password;
/// the session state does not change here. This is a deliberate
/// simplification, not a security boundary.
pub async fn handle_user_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    username: String,
) -> Result<(), std::io::Error> {
    info!("Received USER command with username: {}", username);
    session.lock().await.username = Some(username);
    send_response(&writer, codes::NEED_PASSWORD, "User name okay, need password").await
}
