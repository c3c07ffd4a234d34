//! Connection-string and URL parsing for the client entry points.
//! Not part of the protocol engine itself.

use anyhow::{anyhow, Result};
use url::Url;

pub const DEFAULT_PORT: u16 = 21;
pub const DEFAULT_USER: &str = "anonymous";
pub const DEFAULT_PASSWORD: &str = "guest@";

/// Where and as whom to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

impl Default for ConnectionTarget {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            user: String::from(DEFAULT_USER),
            password: String::from(DEFAULT_PASSWORD),
        }
    }
}

/// A parsed `ftp://` URL: a connection target plus a remote path
/// relative to the server root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtpUrl {
    pub target: ConnectionTarget,
    pub path: String,
}

/// Parses a connection string in any of the accepted forms:
/// `host`, `host:port`, `user:pass@host:port`, or a full `ftp://` URL.
/// Anything unparseable falls back to treating the whole string as a
/// hostname with defaults.
pub fn parse_connection_string(raw: &str) -> ConnectionTarget {
    let mut target = ConnectionTarget::default();

    if raw.starts_with("ftp://") || raw.contains('@') {
        let candidate = if raw.starts_with("ftp://") {
            raw.to_string()
        } else {
            format!("ftp://{}", raw)
        };
        match Url::parse(&candidate) {
            Ok(url) => apply_url(&mut target, &url),
            Err(_) => target.host = raw.to_string(),
        }
    } else if let Some((host, port)) = raw.rsplit_once(':') {
        target.host = host.to_string();
        target.port = port.parse().unwrap_or(DEFAULT_PORT);
    } else {
        target.host = raw.to_string();
    }

    target
}

/// Parses a full `ftp://` URL into a target and remote path.
pub fn parse_url(raw: &str) -> Result<FtpUrl> {
    let url = Url::parse(raw).map_err(|e| anyhow!("invalid URL {:?}: {}", raw, e))?;
    if url.scheme() != "ftp" {
        return Err(anyhow!("unsupported scheme: {}", url.scheme()));
    }

    let mut target = ConnectionTarget::default();
    apply_url(&mut target, &url);
    if target.host.is_empty() {
        return Err(anyhow!("URL has no host: {:?}", raw));
    }

    let path = url.path().trim_start_matches('/').to_string();
    Ok(FtpUrl { target, path })
}

fn apply_url(target: &mut ConnectionTarget, url: &Url) {
    if let Some(host) = url.host_str() {
        target.host = host.to_string();
    }
    if let Some(port) = url.port() {
        target.port = port;
    }
    if !url.username().is_empty() {
        target.user = url.username().to_string();
    }
    if let Some(password) = url.password() {
        target.password = password.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_host_uses_defaults() {
        let target = parse_connection_string("ftp.example.org");
        assert_eq!(target.host, "ftp.example.org");
        assert_eq!(target.port, 21);
        assert_eq!(target.user, "anonymous");
        assert_eq!(target.password, "guest@");
    }

    #[test]
    fn host_and_port() {
        let target = parse_connection_string("localhost:2121");
        assert_eq!(target.host, "localhost");
        assert_eq!(target.port, 2121);
    }

    #[test]
    fn credentials_host_and_port() {
        let target = parse_connection_string("alice:secret@localhost:2121");
        assert_eq!(target.host, "localhost");
        assert_eq!(target.port, 2121);
        assert_eq!(target.user, "alice");
        assert_eq!(target.password, "secret");
    }

    #[test]
    fn full_url_form() {
        let target = parse_connection_string("ftp://bob:pw@files.example.org:2100");
        assert_eq!(target.host, "files.example.org");
        assert_eq!(target.port, 2100);
        assert_eq!(target.user, "bob");
        assert_eq!(target.password, "pw");
    }

    #[test]
    fn url_parse_extracts_path() {
        let ftp_url = parse_url("ftp://localhost:2121/sub/file.txt").unwrap();
        assert_eq!(ftp_url.target.host, "localhost");
        assert_eq!(ftp_url.target.port, 2121);
        assert_eq!(ftp_url.path, "sub/file.txt");
    }

    #[test]
    fn url_parse_rejects_other_schemes() {
        assert!(parse_url("http://example.org/file").is_err());
    }
}
