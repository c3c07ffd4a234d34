use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Handles the TYPE FTP command.
///
/// Both ASCII and binary mode are acknowledged but transfers are not
/// differentiated; every transfer is a plain byte-stream copy.
pub async fn handle_type_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    _session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    send_response(&writer, codes::COMMAND_OK, &format!("Type set to {}", arg)).await
}
