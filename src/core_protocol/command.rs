/// The FTP command verbs this server understands.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum FtpCommand {
    USER,
    PASS,
    SYST,
    FEAT,
    PWD,
    TYPE,
    PASV,
    PORT,
    LIST,
    RETR,
    STOR,
    CWD,
    CDUP,
    QUIT,
}

impl FtpCommand {
    /// Maps a wire verb to a command. Comparison is case-insensitive;
    /// the verb is canonical uppercase from here on.
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "SYST" => Some(FtpCommand::SYST),
            "FEAT" => Some(FtpCommand::FEAT),
            "PWD" => Some(FtpCommand::PWD),
            "TYPE" => Some(FtpCommand::TYPE),
            "PASV" => Some(FtpCommand::PASV),
            "PORT" => Some(FtpCommand::PORT),
            "LIST" => Some(FtpCommand::LIST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "QUIT" => Some(FtpCommand::QUIT),
            _ => None,
        }
    }

    /// The verb → required-state table: commands that touch files or
    /// directories are only valid once the session is authenticated.
    /// Evaluated once by the dispatch loop, not per handler.
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            FtpCommand::LIST
                | FtpCommand::RETR
                | FtpCommand::STOR
                | FtpCommand::CWD
                | FtpCommand::CDUP
        )
    }
}

/// Splits a raw request line into its verb and parameter.
/// The parameter is the remainder of the line, possibly empty.
pub fn split_command_line(line: &str) -> (&str, &str) {
    let trimmed = line.trim();
    match trimmed.split_once(' ') {
        Some((verb, param)) => (verb, param.trim()),
        None => (trimmed, ""),
    }
}
