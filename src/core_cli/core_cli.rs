use clap::{Parser, Subcommand};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ferroftp", about = "A minimal FTP server and client.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the FTP server
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory to serve as the virtual root
        #[arg(short, long)]
        root: Option<String>,

        /// Address advertised in PASV replies
        #[arg(long)]
        pasv_address: Option<String>,
    },

    /// FTP client operations
    #[command(subcommand)]
    Client(ClientCommands),
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Download a file from an FTP server
    ///
    /// Example: ferroftp client get ftp://localhost:2121/file.txt local-file.txt
    Get {
        remote_url: String,
        local_path: String,
    },

    /// Upload a file to an FTP server
    ///
    /// Example: ferroftp client put local-file.txt ftp://localhost:2121/file.txt
    Put {
        local_path: String,
        remote_url: String,
    },

    /// Open an interactive shell against an FTP server
    ///
    /// The target may be host, host:port, user:pass@host:port, or a
    /// full ftp:// URL.
    Shell { target: String },
}
