use crate::core_network::network::{send_response, ControlWriter};
use crate::core_protocol::codes;

/// Handles the SYST FTP command: reports a conventional UNIX system
/// type regardless of the actual host.
pub async fn handle_syst_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_response(&writer, codes::NAME_SYSTEM, "UNIX Type: L8").await
}
