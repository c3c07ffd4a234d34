use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_fs;
use crate::core_ftpcommand::utils::claim_data_stream;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Handles the LIST FTP command: writes one line per directory entry
/// over the data channel, then reports completion on the control
/// channel.
///
/// An empty parameter (or the common `-a`/`-l` flag tokens, which this
/// server ignores) lists the current working directory. A path naming
/// a file lists that single entry.
pub async fn handle_list_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(mut data_stream) = claim_data_stream(&writer, &session).await? else {
        return Ok(());
    };

    let param = arg.trim();
    let virtual_path = {
        let session = session.lock().await;
        if param.is_empty() || param == "-a" || param == "-l" {
            session.current_dir.clone()
        } else {
            core_fs::resolve_virtual(&session.current_dir, param)
        }
    };
    let real_path = core_fs::to_real_path(Path::new(&config.server.root_dir), &virtual_path);

    let metadata = match tokio::fs::metadata(&real_path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("LIST {:?} failed: {}", real_path, e);
            send_response(&writer, codes::ACTION_NOT_TAKEN, "File not found").await?;
            return Ok(());
        }
    };

    send_response(
        &writer,
        codes::FILE_STATUS_OK,
        "Here comes the directory listing",
    )
    .await?;

    let listing = if metadata.is_dir() {
        match read_listing(&real_path).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Error reading directory {:?}: {}", real_path, e);
                send_response(&writer, codes::ACTION_NOT_TAKEN, "Error reading directory").await?;
                return Ok(());
            }
        }
    } else {
        let name = real_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| virtual_path.clone());
        core_fs::format_list_entry(&name, &metadata)
    };

    if let Err(e) = data_stream.write_all(listing.as_bytes()).await {
        warn!("Error sending listing: {}", e);
        drop(data_stream);
        send_response(
            &writer,
            codes::TRANSFER_ABORTED,
            "Connection closed; transfer aborted",
        )
        .await?;
        return Ok(());
    }
    data_stream.shutdown().await.ok();
    drop(data_stream);

    info!("Sent listing of {:?}", real_path);
    send_response(&writer, codes::CLOSING_DATA_CONNECTION, "Directory send OK").await
}

/// Collects the formatted listing of a directory, sorted by entry name
/// for a stable order. Entries whose metadata cannot be read are
/// skipped.
async fn read_listing(path: &Path) -> std::io::Result<String> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut lines: Vec<(String, String)> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        lines.push((name.clone(), core_fs::format_list_entry(&name, &metadata)));
    }
    lines.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(lines.into_iter().map(|(_, line)| line).collect())
}
