use std::path::Path;

use log::{debug, info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use crate::core_network::endpoint;
use crate::core_protocol::response::{read_response, Response};
use crate::core_protocol::codes;
use crate::core_transfer;
use crate::error::FtpError;

/// An FTP client over one control connection.
///
/// The driver is strictly synchronous at the protocol level: every
/// command is followed by exactly one logical response before the next
/// command may be sent, and no control command is issued while a data
/// transfer is in flight.
pub struct FtpClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    data_channel: Option<TcpStream>,
    user: String,
    password: String,
}

impl FtpClient {
    /// Connects to a server and consumes its greeting.
    pub async fn connect(host: &str, port: u16) -> Result<Self, FtpError> {
        let stream = TcpStream::connect((host, port)).await.map_err(|e| {
            FtpError::Connection(format!("failed to connect to {}:{}: {}", host, port, e))
        })?;
        let (read_half, write_half) = stream.into_split();
        let mut client = Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            data_channel: None,
            user: String::new(),
            password: String::new(),
        };

        let greeting = read_response(&mut client.reader).await?;
        debug!("Server greeting: {} {}", greeting.code, greeting.message);
        Ok(client)
    }

    /// Authenticates with the server.
    ///
    /// A 230 reply to USER means no password is needed; otherwise the
    /// server must ask for one (331) and accept the PASS that follows.
    /// Credentials are kept for reconnect scenarios.
    pub async fn login(&mut self, user: &str, password: &str) -> Result<(), FtpError> {
        self.user = user.to_string();
        self.password = password.to_string();

        let reply = self.send_command(&format!("USER {}", user)).await?;
        match reply.code {
            codes::LOGGED_IN => Ok(()),
            codes::NEED_PASSWORD => {
                let reply = self.send_command(&format!("PASS {}", password)).await?;
                if reply.code == codes::LOGGED_IN {
                    Ok(())
                } else {
                    Err(FtpError::UnexpectedReply {
                        code: reply.code,
                        message: reply.message,
                    })
                }
            }
            _ => Err(FtpError::UnexpectedReply {
                code: reply.code,
                message: reply.message,
            }),
        }
    }

    /// Sends one command and reads one logical response. No pipelining.
    pub async fn send_command(&mut self, command: &str) -> Result<Response, FtpError> {
        debug!("> {}", command);
        self.writer
            .write_all(format!("{}\r\n", command).as_bytes())
            .await?;
        self.writer.flush().await?;
        let reply = read_response(&mut self.reader).await?;
        debug!("< {} {}", reply.code, reply.message);
        Ok(reply)
    }

    /// Changes the remote working directory.
    pub async fn cwd(&mut self, dir: &str) -> Result<(), FtpError> {
        let reply = self.send_command(&format!("CWD {}", dir)).await?;
        if reply.code == codes::FILE_ACTION_OK {
            Ok(())
        } else {
            Err(FtpError::UnexpectedReply {
                code: reply.code,
                message: reply.message,
            })
        }
    }

    /// Reports the remote working directory.
    pub async fn pwd(&mut self) -> Result<String, FtpError> {
        let reply = self.send_command("PWD").await?;
        if reply.code != codes::PATHNAME_CREATED {
            return Err(FtpError::UnexpectedReply {
                code: reply.code,
                message: reply.message,
            });
        }
        // Reply format: 257 "/some/dir" is the current directory
        let quoted = reply.message.find('"').and_then(|start| {
            reply.message[start + 1..]
                .find('"')
                .map(|end| reply.message[start + 1..start + 1 + end].to_string())
        });
        Ok(quoted.unwrap_or(reply.message))
    }

    /// Negotiates a passive-mode data channel, replacing any existing
    /// one. The transfer command must follow on the control channel.
    pub async fn enter_passive_mode(&mut self) -> Result<(), FtpError> {
        self.data_channel = None;

        let reply = self.send_command("PASV").await?;
        if reply.code != codes::ENTERING_PASSIVE_MODE {
            return Err(FtpError::UnexpectedReply {
                code: reply.code,
                message: reply.message,
            });
        }

        let addr = endpoint::decode_pasv_reply(&reply.message)?;
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| FtpError::Connection(format!("failed to connect to data port: {}", e)))?;
        self.data_channel = Some(stream);
        Ok(())
    }

    /// Downloads a remote file to a local path, returning the number of
    /// bytes received.
    pub async fn download(&mut self, remote: &str, local: &Path) -> Result<u64, FtpError> {
        self.send_command("TYPE I").await?;
        self.enter_passive_mode().await?;

        let reply = self.send_command(&format!("RETR {}", remote)).await?;
        if reply.code != codes::FILE_STATUS_OK && reply.code != codes::DATA_ALREADY_OPEN {
            self.data_channel = None;
            return Err(transfer_refused(remote, reply));
        }

        let mut data = self.claim_data_channel()?;
        let mut file = tokio::fs::File::create(local).await?;
        let received = core_transfer::copy_stream(&mut data, &mut file).await?;
        drop(data);

        self.finish_transfer().await?;
        info!("Downloaded {} ({} bytes)", remote, received);
        Ok(received)
    }

    /// Uploads a local file to a remote name, returning the number of
    /// bytes sent.
    pub async fn upload(&mut self, local: &Path, remote: &str) -> Result<u64, FtpError> {
        let mut file = tokio::fs::File::open(local).await?;

        self.send_command("TYPE I").await?;
        self.enter_passive_mode().await?;

        let reply = self.send_command(&format!("STOR {}", remote)).await?;
        if reply.code != codes::FILE_STATUS_OK && reply.code != codes::DATA_ALREADY_OPEN {
            self.data_channel = None;
            return Err(transfer_refused(remote, reply));
        }

        let mut data = self.claim_data_channel()?;
        let sent = core_transfer::copy_stream(&mut file, &mut data).await?;
        data.shutdown().await?;
        drop(data);

        self.finish_transfer().await?;
        info!("Uploaded {} ({} bytes)", remote, sent);
        Ok(sent)
    }

    /// Retrieves a directory listing as text.
    pub async fn list(&mut self, path: Option<&str>) -> Result<String, FtpError> {
        self.enter_passive_mode().await?;

        let command = match path {
            Some(path) => format!("LIST {}", path),
            None => String::from("LIST"),
        };
        let reply = self.send_command(&command).await?;
        if reply.code != codes::FILE_STATUS_OK && reply.code != codes::DATA_ALREADY_OPEN {
            self.data_channel = None;
            return Err(transfer_refused("listing", reply));
        }

        let mut data = self.claim_data_channel()?;
        let mut listing = String::new();
        data.read_to_string(&mut listing).await?;
        drop(data);

        self.finish_transfer().await?;
        Ok(listing)
    }

    /// Sends QUIT and drops any data channel. The server closes the
    /// control connection after its goodbye.
    pub async fn quit(&mut self) -> Result<(), FtpError> {
        self.data_channel = None;
        self.send_command("QUIT").await?;
        Ok(())
    }

    fn claim_data_channel(&mut self) -> Result<TcpStream, FtpError> {
        self.data_channel
            .take()
            .ok_or_else(|| FtpError::Connection(String::from("no data channel established")))
    }

    /// Reads the control-channel response that confirms a finished
    /// transfer. A code other than the two recognized completion codes
    /// is an anomaly worth logging, not a failure.
    async fn finish_transfer(&mut self) -> Result<(), FtpError> {
        let reply = read_response(&mut self.reader).await?;
        if reply.code != codes::CLOSING_DATA_CONNECTION && reply.code != codes::FILE_ACTION_OK {
            warn!(
                "Unexpected response after transfer: {} {}",
                reply.code, reply.message
            );
        }
        Ok(())
    }
}

fn transfer_refused(what: &str, reply: Response) -> FtpError {
    if reply.code == codes::ACTION_NOT_TAKEN {
        FtpError::NotFound(what.to_string())
    } else {
        FtpError::UnexpectedReply {
            code: reply.code,
            message: reply.message,
        }
    }
}
