use std::path::Path;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_fs;
use crate::core_ftpcommand::utils::claim_data_stream;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::core_transfer;
use crate::session::Session;

/// Handles the RETR FTP command: streams a file's bytes over the data
/// channel.
///
/// The data channel is claimed up front and therefore closed and
/// cleared whatever the outcome; a missing source file yields 550 with
/// no partial transfer.
pub async fn handle_retr_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    if arg.trim().is_empty() {
        warn!("RETR command received with no argument");
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

    let mut file = match File::open(&real_path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("RETR {:?} failed to open: {}", real_path, e);
            send_response(&writer, codes::ACTION_NOT_TAKEN, "File not found").await?;
            return Ok(());
        }
    };

    let size = file.metadata().await.map(|m| m.len()).unwrap_or(0);
    send_response(
        &writer,
        codes::FILE_STATUS_OK,
        &format!("Opening data connection for {} ({} bytes)", arg, size),
    )
    .await?;

    match core_transfer::copy_stream(&mut file, &mut data_stream).await {
        Ok(sent) => {
            data_stream.shutdown().await.ok();
            drop(data_stream);
            info!("Sent {} bytes of {:?}", sent, real_path);
            send_response(&writer, codes::CLOSING_DATA_CONNECTION, "Transfer complete").await
        }
        Err(e) => {
            error!("Error sending {:?}: {}", real_path, e);
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
