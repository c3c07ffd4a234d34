use std::sync::Arc;

use log::{error, info};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_network::endpoint;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::{DataChannel, Session};

/// Handles the PORT command: parses the client's advertised 6-value
/// tuple and dials out to it. On success the connection becomes the
/// session's data channel; on failure the slot stays empty.
pub async fn handle_port_command(
    writer: ControlWriter,
    _config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    // Entering active mode first closes any previously open channel.
    session.lock().await.clear_data_channel();

    let addr = match endpoint::decode(&arg) {
        Ok(addr) => addr,
        Err(_) => {
            send_response(&writer, codes::SYNTAX_ERROR, "Invalid PORT command").await?;
            return Ok(());
        }
    };

    match TcpStream::connect(addr).await {
        Ok(stream) => {
            info!("Active data connection established with {}", addr);
            session
                .lock()
                .await
                .set_data_channel(DataChannel::Connected(stream));
            send_response(&writer, codes::COMMAND_OK, "PORT command successful").await
        }
        Err(e) => {
            error!("Failed to connect to {}: {}", addr, e);
            send_response(
                &writer,
                codes::CANNOT_OPEN_DATA_CONNECTION,
                "Cannot open data connection",
            )
            .await
        }
    }
}
