use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_ftpcommand::handlers::initialize_command_handlers;
use crate::core_protocol::command::{split_command_line, FtpCommand};
use crate::core_protocol::{codes, response};
use crate::session::Session;

/// Shared handle to the control-connection write half, passed to every
/// command handler.
pub type ControlWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Sends one coded response line to the client.
pub async fn send_response(
    writer: &ControlWriter,
    code: u16,
    message: &str,
) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer
        .write_all(response::encode(code, message).as_bytes())
        .await?;
    writer.flush().await?;
    Ok(())
}

/// Sends a multi-line coded response block to the client.
pub async fn send_multi_response(
    writer: &ControlWriter,
    code: u16,
    lines: &[&str],
) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer
        .write_all(response::encode_multi(code, lines).as_bytes())
        .await?;
    writer.flush().await?;
    Ok(())
}

/// Runs the control loop for one accepted connection: greet, then read
/// command lines and dispatch them until QUIT or disconnect.
///
/// Authentication is checked here, once, against the declarative
/// verb table, before any handler runs. A read failure ends this
/// session only; other sessions are unaffected.
pub async fn handle_connection(socket: TcpStream, config: Arc<Config>) -> Result<()> {
    let peer = socket.peer_addr()?;
    let (read_half, write_half) = socket.into_split();
    let mut reader = BufReader::new(read_half);
    let writer: ControlWriter = Arc::new(Mutex::new(write_half));
    let session = Arc::new(Mutex::new(Session::new()));

    send_response(&writer, codes::SERVICE_READY, "ferroftp server ready").await?;

    let handlers = initialize_command_handlers();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let n = reader.read_line(&mut buffer).await?;
        if n == 0 {
            info!("Client {} disconnected", peer);
            break;
        }

        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }

        let (verb, param) = split_command_line(line);
        debug!("{} -> {} {}", peer, verb.to_ascii_uppercase(), param);

        let Some(command) = FtpCommand::from_str(verb) else {
            send_response(&writer, codes::NOT_IMPLEMENTED, "Command not implemented").await?;
            continue;
        };

        if command.requires_auth() && !session.lock().await.is_authenticated {
            send_response(&writer, codes::NOT_LOGGED_IN, "Not logged in").await?;
            continue;
        }

        if let Some(handler) = handlers.get(&command) {
            if let Err(e) = handler(
                Arc::clone(&writer),
                Arc::clone(&config),
                Arc::clone(&session),
                param.to_string(),
            )
            .await
            {
                error!("Error handling {:?} for {}: {}", command, peer, e);
                break;
            }
        }

        if command == FtpCommand::QUIT {
            break;
        }
    }

    // Disconnect tears down any data channel still attached.
    session.lock().await.clear_data_channel();
    Ok(())
}
