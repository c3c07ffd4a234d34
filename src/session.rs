use tokio::net::TcpStream;
use tokio::sync::oneshot;

/// The per-session data connection slot.
///
/// PORT stores an already-connected stream; PASV stores the receiving
/// end of a one-shot channel that the background accept task fills in.
/// Delivering the stream through the channel makes the assignment a
/// single-writer, happens-before-read operation: the next transfer
/// command awaits the receiver instead of racing a field write.
#[derive(Debug)]
pub enum DataChannel {
    Connected(TcpStream),
    Pending(oneshot::Receiver<TcpStream>),
}

impl DataChannel {
    /// Resolves the slot into a usable stream, awaiting a pending
    /// passive accept. Returns `None` if the accept failed or was
    /// cancelled (the sender was dropped).
    pub async fn into_stream(self) -> Option<TcpStream> {
        match self {
            DataChannel::Connected(stream) => Some(stream),
            DataChannel::Pending(receiver) => receiver.await.ok(),
        }
    }
}

/// Mutable state for one accepted control connection.
#[derive(Debug)]
pub struct Session {
    /// Virtual working directory: always `/`-rooted and lexically
    /// normalized, independent of the real filesystem.
    pub current_dir: String,
    pub data_channel: Option<DataChannel>,
    pub username: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            current_dir: String::from("/"),
            data_channel: None,
            username: None,
            is_authenticated: false,
        }
    }

    /// Installs a new data channel, closing any previous one first.
    /// At most one data channel is live per session; dropping a pending
    /// receiver cancels the corresponding accept task.
    pub fn set_data_channel(&mut self, channel: DataChannel) {
        self.data_channel = Some(channel);
    }

    pub fn clear_data_channel(&mut self) {
        self.data_channel = None;
    }

    /// Removes the data channel from the session, leaving the slot
    /// empty for the next negotiation.
    pub fn take_data_channel(&mut self) -> Option<DataChannel> {
        self.data_channel.take()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
