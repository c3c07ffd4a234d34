use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

use log::{debug, error, warn};
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};

use crate::config::Config;
use crate::core_network::endpoint;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::{DataChannel, Session};

/// Handles the PASV command: opens an ephemeral listener, advertises
/// its address as a 6-value tuple, and accepts exactly one inbound
/// connection in the background.
///
/// The accepted stream is delivered through a one-shot channel that is
/// installed in the session before the 227 reply goes out, so the next
/// transfer command awaits the accept instead of racing it. The control
/// loop keeps reading commands while the accept is outstanding.
pub async fn handle_pasv_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    // Entering passive mode first closes any previously open channel.
    session.lock().await.clear_data_channel();

    let pasv_ip: Ipv4Addr = match config.server.pasv_address.parse() {
        Ok(ip) => ip,
        Err(e) => {
            error!(
                "Invalid pasv_address {:?}: {}",
                config.server.pasv_address, e
            );
            send_response(
                &writer,
                codes::CANNOT_OPEN_DATA_CONNECTION,
                "Cannot open data connection",
            )
            .await?;
            return Ok(());
        }
    };

    let listener = match TcpListener::bind((pasv_ip, 0)).await {
        Ok(listener) => listener,
        Err(e) => {
            warn!("Failed to open passive listener: {}", e);
            send_response(
                &writer,
                codes::CANNOT_OPEN_DATA_CONNECTION,
                "Cannot open data connection",
            )
            .await?;
            return Ok(());
        }
    };

    let port = listener.local_addr()?.port();
    let tuple = endpoint::encode(&SocketAddrV4::new(pasv_ip, port));
    debug!("Passive listener bound on {}:{}", pasv_ip, port);

    let (mut tx, rx) = oneshot::channel();
    session
        .lock()
        .await
        .set_data_channel(DataChannel::Pending(rx));

    tokio::spawn(async move {
        tokio::select! {
            // The session replaced or dropped the channel; close the
            // listener without ever accepting.
            _ = tx.closed() => {
                debug!("Passive listener on port {} cancelled", port);
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    debug!("Accepted data connection from {}", addr);
                    // A failed send means the channel was replaced
                    // after the accept; the stream just closes.
                    let _ = tx.send(stream);
                }
                Err(e) => {
                    error!("Failed to accept data connection: {}", e);
                }
            }
        }
    });

    send_response(
        &writer,
        codes::ENTERING_PASSIVE_MODE,
        &format!("Entering Passive Mode ({})", tuple),
    )
    .await
}
