use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Handles the QUIT FTP command. The control loop terminates after
/// this handler returns; any live data channel is dropped with the
/// session.
pub async fn handle_quit_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    info!("Received QUIT command, closing control connection");
    session.lock().await.clear_data_channel();
    send_response(&writer, codes::SERVICE_CLOSING, "Goodbye").await
}
