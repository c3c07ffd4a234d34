pub mod config;
pub mod core_cli;
pub mod core_client;
pub mod core_fs;
pub mod core_ftpcommand;
pub mod core_network;
pub mod core_protocol;
pub mod core_transfer;
pub mod error;
pub mod server;
pub mod session;

pub use config::Config;
pub use core_client::client::FtpClient;
pub use error::FtpError;
pub use server::FtpServer;
