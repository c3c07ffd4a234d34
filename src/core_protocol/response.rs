use tokio::io::AsyncBufReadExt;

use crate::error::FtpError;

/// One logical reply read from the control channel.
///
/// Multi-line replies are collapsed into a single `Response` before any
/// caller sees them; partial replies never escape this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: u16,
    pub message: String,
}

/// Encodes a single-line response, CRLF terminated.
pub fn encode(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Encodes a multi-line response block.
///
/// The first line uses `CODE-`, middle lines are indented
/// continuations, and the final line uses `CODE ` to close the block
/// with the same code it was opened with.
pub fn encode_multi(code: u16, lines: &[&str]) -> String {
    let mut block = String::new();
    match lines {
        [] => block.push_str(&encode(code, "")),
        [only] => block.push_str(&encode(code, only)),
        [first, middle @ .., last] => {
            block.push_str(&format!("{}-{}\r\n", code, first));
            for line in middle {
                block.push_str(&format!(" {}\r\n", line));
            }
            block.push_str(&encode(code, last));
        }
    }
    block
}

/// Reads one logical response from a buffered control stream.
///
/// A line is well-formed only if its first three bytes are ASCII digits
/// and the fourth is a space or hyphen. A hyphen opens a continuation
/// that runs until a line whose leading three digits equal the opening
/// code and whose fourth byte is a space; any other line inside the
/// continuation is appended verbatim.
pub async fn read_response<R>(reader: &mut R) -> Result<Response, FtpError>
where
    R: AsyncBufReadExt + Unpin,
{
    let line = read_line(reader).await?;

    let (code, terminal) = parse_lead(&line).ok_or_else(|| FtpError::MalformedResponse(line.clone()))?;
    let mut message = line[4..].trim().to_string();

    if !terminal {
        let closing = format!("{} ", code);
        loop {
            let line = read_line(reader).await?;
            if line.starts_with(&closing) {
                message.push('\n');
                message.push_str(line[4..].trim());
                break;
            }
            message.push('\n');
            message.push_str(line.trim_end_matches(['\r', '\n']));
        }
    }

    Ok(Response { code, message })
}

async fn read_line<R>(reader: &mut R) -> Result<String, FtpError>
where
    R: AsyncBufReadExt + Unpin,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Err(FtpError::Connection(
            "control connection closed while awaiting a response".to_string(),
        ));
    }
    Ok(line)
}

/// Parses the `ddd<space|dash>` lead of a response line.
/// Returns the code and whether the line terminates the response.
fn parse_lead(line: &str) -> Option<(u16, bool)> {
    let bytes = line.as_bytes();
    if bytes.len() < 4 || !bytes[..3].iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let code: u16 = line[..3].parse().ok()?;
    match bytes[3] {
        b' ' => Some((code, true)),
        b'-' => Some((code, false)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[test]
    fn encode_single_line() {
        assert_eq!(encode(220, "Service ready"), "220 Service ready\r\n");
    }

    #[test]
    fn encode_multi_line_block() {
        let block = encode_multi(211, &["Features:", " UTF8", "End"]);
        assert_eq!(block, "211-Features:\r\n  UTF8\r\n211 End\r\n");
    }

    #[test]
    fn encode_multi_with_single_line_degrades() {
        assert_eq!(encode_multi(211, &["End"]), "211 End\r\n");
    }

    #[tokio::test]
    async fn reads_single_line_response() {
        let mut reader = BufReader::new(&b"230 User logged in, proceed\r\n"[..]);
        let response = read_response(&mut reader).await.unwrap();
        assert_eq!(response.code, 230);
        assert_eq!(response.message, "User logged in, proceed");
    }

    #[tokio::test]
    async fn reads_multi_line_response() {
        let wire = b"211-Features:\r\n UTF8\r\n211 End\r\n";
        let mut reader = BufReader::new(&wire[..]);
        let response = read_response(&mut reader).await.unwrap();
        assert_eq!(response.code, 211);
        assert_eq!(response.message, "Features:\nUTF8\nEnd");
    }

    #[tokio::test]
    async fn untagged_lines_are_appended_verbatim() {
        let wire = b"220-Welcome\r\nplain text line\r\n221-not ours\r\n220 Done\r\n";
        let mut reader = BufReader::new(&wire[..]);
        let response = read_response(&mut reader).await.unwrap();
        assert_eq!(response.code, 220);
        assert_eq!(
            response.message,
            "Welcome\nplain text line\n221-not ours\nDone"
        );
    }

    #[tokio::test]
    async fn rejects_non_digit_code() {
        let mut reader = BufReader::new(&b"2x0 nope\r\n"[..]);
        assert!(matches!(
            read_response(&mut reader).await,
            Err(FtpError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn rejects_bad_fourth_byte() {
        let mut reader = BufReader::new(&b"230:logged in\r\n"[..]);
        assert!(matches!(
            read_response(&mut reader).await,
            Err(FtpError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn rejects_short_line() {
        let mut reader = BufReader::new(&b"22\r\n"[..]);
        assert!(matches!(
            read_response(&mut reader).await,
            Err(FtpError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn eof_is_a_connection_error() {
        let mut reader = BufReader::new(&b""[..]);
        assert!(matches!(
            read_response(&mut reader).await,
            Err(FtpError::Connection(_))
        ));
    }
}
