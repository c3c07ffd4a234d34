use thiserror::Error;

/// Errors surfaced by the protocol engine.
///
/// Server handlers report most failures to the peer as coded responses
/// and keep the session alive; these variants are what the client role
/// propagates to its callers and what the codec raises on bad input.
#[derive(Debug, Error)]
pub enum FtpError {
    /// Failure to listen, dial, or accept a connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// A response line that does not match `ddd<space|dash>message`.
    #[error("malformed response: {0:?}")]
    MalformedResponse(String),

    /// A command was attempted before authentication.
    #[error("not logged in")]
    NotLoggedIn,

    /// The server answered with a code the current exchange cannot accept.
    #[error("unexpected reply: {code} {message}")]
    UnexpectedReply { code: u16, message: String },

    /// Missing file or directory.
    #[error("not found: {0}")]
    NotFound(String),

    /// Underlying transport or filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FtpError>;
