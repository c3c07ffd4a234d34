use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Handles the PWD FTP command: reports the session's virtual working
/// directory, quoted per convention.
pub async fn handle_pwd_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    let current_dir = session.lock().await.current_dir.clone();
    send_response(
        &writer,
        codes::PATHNAME_CREATED,
        &format!("\"{}\" is the current directory", current_dir),
    )
    .await
}
