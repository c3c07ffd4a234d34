use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_fs;
use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;
use crate::session::Session;

/// Handles the CWD FTP command.
///
/// Absolute parameters replace the working directory, relative ones
/// are joined against it; the result is lexically normalized and stays
/// `/`-rooted. The change is rejected if the corresponding real path
/// under the server root does not exist or is not a directory, leaving
/// the working directory unchanged.
pub async fn handle_cwd_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let target = core_fs::resolve_virtual(&session.current_dir, &arg);
    let real_path = core_fs::to_real_path(Path::new(&config.server.root_dir), &target);

    match tokio::fs::metadata(&real_path).await {
        Ok(metadata) if metadata.is_dir() => {
            session.current_dir = target;
            info!("Working directory changed to {}", session.current_dir);
            send_response(
                &writer,
                codes::FILE_ACTION_OK,
                "Directory successfully changed",
            )
            .await
        }
        _ => {
            warn!("CWD to {:?} rejected: not a directory", real_path);
            send_response(&writer, codes::ACTION_NOT_TAKEN, "Directory not found").await
        }
    }
}
