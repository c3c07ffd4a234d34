use crate::core_network::network::{send_multi_response, ControlWriter};
use crate::core_protocol::codes;

/// Handles the FEAT FTP command with a multi-line feature block.
pub async fn handle_feat_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_multi_response(&writer, codes::SYSTEM_STATUS, &["Features:", "UTF8", "End"]).await
}
