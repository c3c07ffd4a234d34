use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Handles the PASS FTP command.
///
/// Any password unconditionally authenticates the session (accept-any
/// policy); there is no way back to the unauthenticated state.
pub async fn handle_pass_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _password: String,
) -> Result<(), std::io::Error> {
    {
        let mut session = session.lock().await;
        session.is_authenticated = true;
        info!(
            "User {} logged in",
            session.username.as_deref().unwrap_or("<unnamed>")
        );
    }
    send_response(&writer, codes::LOGGED_IN, "User logged in, proceed").await
}
