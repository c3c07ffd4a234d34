use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::core_ftpcommand::cwd::handle_cwd_command;
use crate::core_network::network::ControlWriter;
use crate::session::Session;

/// Handles the CDUP FTP command: a change-directory to the parent.
/// `..` from the root stays at the root.
pub async fn handle_cdup_command(
    writer: ControlWriter,
    config: Arc<Config>,
    session: Arc<Mutex<Session>>,
    _arg: String,
) -> Result<(), std::io::Error> {
    handle_cwd_command(writer, config, session, String::from("..")).await
}
