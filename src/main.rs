use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use std::io::Write;

use ferroftp::config::Config;
use ferroftp::core_cli::{Cli, ClientCommands, Commands};
use ferroftp::core_client::{conn, ops, shell};
use ferroftp::server;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize the logger with a custom format
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    let mut config = if args.config.is_empty() {
        Config::default()
    } else {
        Config::load_from_file(&args.config)?
    };

    match args.command {
        Commands::Server {
            port,
            root,
            pasv_address,
        } => {
            if let Some(port) = port {
                config.server.listen_port = port;
            }
            if let Some(root) = root {
                config.server.root_dir = root;
            }
            if let Some(pasv_address) = pasv_address {
                config.server.pasv_address = pasv_address;
            }
            server::run(config).await
        }
        Commands::Client(ClientCommands::Get {
            remote_url,
            local_path,
        }) => {
            println!("Downloading {} to {}", remote_url, local_path);
            let received = ops::get(&remote_url, &local_path).await?;
            println!("Download complete. {} bytes transferred.", received);
            Ok(())
        }
        Commands::Client(ClientCommands::Put {
            local_path,
            remote_url,
        }) => {
            println!("Uploading {} to {}", local_path, remote_url);
            let sent = ops::put(&local_path, &remote_url).await?;
            println!("Upload complete. {} bytes transferred.", sent);
            Ok(())
        }
        Commands::Client(ClientCommands::Shell { target }) => {
            let mut target = conn::parse_connection_string(&target);
            if target.user == conn::DEFAULT_USER {
                target.user = config.client.default_user.clone();
                target.password = config.client.default_password.clone();
            }
            shell::run(&target).await
        }
    }
}
