//! Interactive client shell: a thin presentation layer over the
//! command driver. All protocol sequencing lives in `client`.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::core_client::client::FtpClient;
use crate::core_client::conn::ConnectionTarget;
use crate::core_protocol::codes;

/// Connects to the target, logs in, and runs the interactive loop
/// until the user quits or stdin closes.
pub async fn run(target: &ConnectionTarget) -> Result<()> {
    let mut client = FtpClient::connect(&target.host, target.port)
        .await
        .context("failed to connect")?;
    client
        .login(&target.user, &target.password)
        .await
        .context("login failed")?;

    println!("Connected to FTP server. Type 'help' for available commands, 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("ftp> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        match cmd.as_str() {
            "quit" | "exit" | "bye" => {
                client.quit().await.ok();
                println!("Goodbye!");
                break;
            }
            "help" => print_help(),
            "ls" | "dir" => match client.list(args.first().copied()).await {
                Ok(listing) => print!("{}", listing),
                Err(e) => eprintln!("Error listing directory: {}", e),
            },
            "cd" | "cwd" => match args.first() {
                Some(dir) => {
                    if let Err(e) = client.cwd(dir).await {
                        eprintln!("Failed to change directory: {}", e);
                    } else {
                        println!("Changed to directory: {}", dir);
                    }
                }
                None => println!("Usage: cd <directory>"),
            },
            "pwd" => match client.pwd().await {
                Ok(dir) => println!("Current directory: {}", dir),
                Err(e) => eprintln!("Error getting working directory: {}", e),
            },
            "get" => match args.as_slice() {
                [] => println!("Usage: get <remote-file> [local-file]"),
                [remote, rest @ ..] => {
                    let local = rest.first().copied().unwrap_or(remote);
                    match client.download(remote, Path::new(local)).await {
                        Ok(n) => println!("Download complete. {} bytes transferred.", n),
                        Err(e) => eprintln!("Error downloading file: {}", e),
                    }
                }
            },
            "put" => match args.as_slice() {
                [] => println!("Usage: put <local-file> [remote-file]"),
                [local, rest @ ..] => {
                    let remote = rest
                        .first()
                        .copied()
                        .unwrap_or_else(|| basename(local));
                    match client.upload(Path::new(local), remote).await {
                        Ok(n) => println!("Upload complete. {} bytes transferred.", n),
                        Err(e) => eprintln!("Error uploading file: {}", e),
                    }
                }
            },
            "mkdir" => {
                simple_command(&mut client, "MKD", args.first(), codes::PATHNAME_CREATED).await
            }
            "rmdir" => simple_command(&mut client, "RMD", args.first(), codes::FILE_ACTION_OK).await,
            "rm" | "delete" => {
                simple_command(&mut client, "DELE", args.first(), codes::FILE_ACTION_OK).await
            }
            other => {
                println!(
                    "Unknown command: {}\nType 'help' for available commands.",
                    other
                );
            }
        }
    }

    Ok(())
}

/// Sends a single-argument command and reports the outcome. This
/// server answers 502 for verbs it does not implement; other servers
/// may accept them.
async fn simple_command(client: &mut FtpClient, verb: &str, arg: Option<&&str>, ok_code: u16) {
    let Some(arg) = arg else {
        println!("Usage: {} <name>", verb.to_ascii_lowercase());
        return;
    };
    match client.send_command(&format!("{} {}", verb, arg)).await {
        Ok(reply) if reply.code == ok_code => println!("OK: {}", reply.message),
        Ok(reply) => eprintln!("Failed: {} {}", reply.code, reply.message),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn print_help() {
    println!("Available commands:");
    println!("  ls, dir                  List files in current directory");
    println!("  cd, cwd <directory>      Change working directory");
    println!("  pwd                      Print working directory");
    println!("  get <remote> [local]     Download a file");
    println!("  put <local> [remote]     Upload a file");
    println!("  mkdir <directory>        Create a directory");
    println!("  rmdir <directory>        Remove a directory");
    println!("  rm, delete <file>        Delete a file");
    println!("  help                     Show this help");
    println!("  quit, exit, bye          Exit the shell");
}
