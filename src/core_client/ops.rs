//! One-shot client operations over `ftp://` URLs.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core_client::client::FtpClient;
use crate::core_client::conn;

/// Downloads `remote_url` to `local_path`: connect, login, change into
/// the URL's directory, and retrieve the basename.
pub async fn get(remote_url: &str, local_path: &str) -> Result<u64> {
    let ftp_url = conn::parse_url(remote_url)?;
    let mut client = FtpClient::connect(&ftp_url.target.host, ftp_url.target.port).await?;
    client
        .login(&ftp_url.target.user, &ftp_url.target.password)
        .await
        .context("login failed")?;

    let (dir, name) = split_remote_path(&ftp_url.path);
    if let Some(dir) = dir {
        client.cwd(dir).await.context("failed to change directory")?;
    }

    let received = client.download(name, Path::new(local_path)).await?;
    client.quit().await.ok();
    Ok(received)
}

/// Uploads `local_path` to `remote_url`: connect, login, change into
/// the URL's directory, and store under the basename.
pub async fn put(local_path: &str, remote_url: &str) -> Result<u64> {
    let ftp_url = conn::parse_url(remote_url)?;
    let mut client = FtpClient::connect(&ftp_url.target.host, ftp_url.target.port).await?;
    client
        .login(&ftp_url.target.user, &ftp_url.target.password)
        .await
        .context("login failed")?;

    let (dir, name) = split_remote_path(&ftp_url.path);
    if let Some(dir) = dir {
        client.cwd(dir).await.context("failed to change directory")?;
    }

    let sent = client.upload(Path::new(local_path), name).await?;
    client.quit().await.ok();
    Ok(sent)
}

/// Splits a URL path into the directory to CWD into (if any) and the
/// file name to transfer.
fn split_remote_path(path: &str) -> (Option<&str>, &str) {
    match path.rsplit_once('/') {
        Some((dir, name)) if !dir.is_empty() => (Some(dir), name),
        Some((_, name)) => (None, name),
        None => (None, path),
    }
}
