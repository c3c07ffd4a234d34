use std::path::Path;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::fs::File;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_fs;
use crate::core_ftpcommand::utils::claim_data_stream;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::core_transfer;
use crate::session::Session;

/// Handles the STOR FTP command: receives bytes from the data channel
/// into a new (or truncated) file under the server root. An empty
/// upload still creates the file and completes normally.
pub async fn handle_stor_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if arg.trim().is_empty() {
        warn!("STOR command received with no argument");
        send_response(&writer, codes::SYNTAX_ERROR, "Syntax error in parameters").await?;
        return Ok(());
    }

    let Some(mut data_stream) = claim_data_stream(&writer, &session).await? else {
        return Ok(());
    };

    let virtual_path = {
        let session = session.lock().await;
        core_fs::resolve_virtual(&session.current_dir, &arg)
    };
    let real_path = core_fs::to_real_path(Path::new(&config.server.root_dir), &virtual_path);

    let mut file = match File::create(&real_path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("STOR failed to create {:?}: {}", real_path, e);
            send_response(&writer, codes::ACTION_NOT_TAKEN, "Cannot create file").await?;
            return Ok(());
        }
    };

    send_response(&writer, codes::FILE_STATUS_OK, "Ok to send data").await?;

    match core_transfer::copy_stream(&mut data_stream, &mut file).await {
        Ok(received) => {
            drop(data_stream);
            info!("Stored {} bytes into {:?}", received, real_path);
            send_response(&writer, codes::CLOSING_DATA_CONNECTION, "Transfer complete").await
        }
        Err(e) => {
            error!("Error receiving {:?}: {}", real_path, e);
            drop(data_stream);
            send_response(
                &writer,
                codes::TRANSFER_ABORTED,
                "Connection closed; transfer aborted",
            )
            .await
        }
    }
}
