use std::sync::Arc;

use log::warn;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Claims the session's data channel for a transfer command.
///
/// The slot is emptied here, so the channel is gone after the command
/// whatever the outcome. A pending passive accept is awaited; if no
/// channel was negotiated (or the accept failed) the appropriate 425
/// reply is sent and `None` is returned.
pub async fn claim_data_stream(
    writer: &ControlWriter,
    session: &Arc<Mutex<Session>>,
) -> Result<Option<TcpStream>, std::io::Error> {
    let channel = session.lock().await.take_data_channel();
    let Some(channel) = channel else {
        send_response(writer, codes::CANNOT_OPEN_DATA_CONNECTION, "Use PORT or PASV first").await?;
        return Ok(None);
    };
    match channel.into_stream().await {
        Some(stream) => Ok(Some(stream)),
        None => {
            warn!("Data channel negotiation did not produce a connection");
            send_response(
                writer,
                codes::CANNOT_OPEN_DATA_CONNECTION,
                "Cannot open data connection",
            )
            .await?;
            Ok(None)
        }
    }
}
