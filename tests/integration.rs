use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

use ferroftp::config::Config;
use ferroftp::core_network::endpoint;
use ferroftp::{FtpClient, FtpServer};

/// Creates a fresh directory for one test to serve as the FTP root.
fn temp_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ferroftp-it-{}-{}", tag, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Binds a server on an ephemeral port rooted at `root` and serves it
/// in the background. Returns the address to connect to.
async fn start_server(root: &Path) -> SocketAddr {
    let mut config = Config::default();
    config.server.listen_port = 0;
    config.server.root_dir = root.to_string_lossy().into_owned();
    config.server.pasv_address = String::from("127.0.0.1");

    let server = FtpServer::bind(config).await.unwrap();
    let port = server.local_addr().unwrap().port();
    tokio::spawn(server.serve());
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Opens a raw control connection and consumes the greeting.
async fn connect_raw(addr: SocketAddr) -> (BufReader<OwnedReadHalf>, OwnedWriteHalf) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut greeting = String::new();
    reader.read_line(&mut greeting).await.unwrap();
    assert!(greeting.starts_with("220 "), "greeting was {:?}", greeting);
    (reader, write_half)
}

/// Sends one command and reads one response line.
async fn send_raw(
    reader: &mut BufReader<OwnedReadHalf>,
    writer: &mut OwnedWriteHalf,
    command: &str,
) -> String {
    writer
        .write_all(format!("{}\r\n", command).as_bytes())
        .await
        .unwrap();
    writer.flush().await.unwrap();
    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    line.trim_end().to_string()
}

async fn login_raw(reader: &mut BufReader<OwnedReadHalf>, writer: &mut OwnedWriteHalf) {
    let reply = send_raw(reader, writer, "USER anonymous").await;
    assert!(reply.starts_with("331 "), "USER reply was {:?}", reply);
    let reply = send_raw(reader, writer, "PASS guest@").await;
    assert!(reply.starts_with("230 "), "PASS reply was {:?}", reply);
}

#[tokio::test]
async fn file_commands_require_login() {
    let root = temp_root("auth");
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;

    for command in ["LIST", "RETR a.txt", "STOR a.txt", "CWD sub", "CDUP"] {
        let reply = send_raw(&mut reader, &mut writer, command).await;
        assert!(
            reply.starts_with("530 "),
            "{} before login answered {:?}",
            command,
            reply
        );
    }

    // Any username/password pair is accepted.
    login_raw(&mut reader, &mut writer).await;
    let reply = send_raw(&mut reader, &mut writer, "CWD /").await;
    assert!(reply.starts_with("250 "), "CWD after login was {:?}", reply);
}

#[tokio::test]
async fn unknown_verbs_answer_not_implemented() {
    let root = temp_root("unknown");
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;

    let reply = send_raw(&mut reader, &mut writer, "MLSD").await;
    assert!(reply.starts_with("502 "));
    // The session keeps going afterwards.
    let reply = send_raw(&mut reader, &mut writer, "SYST").await;
    assert_eq!(reply, "215 UNIX Type: L8");
}

#[tokio::test]
async fn second_pasv_replaces_the_first_channel() {
    let root = temp_root("pasv-twice");
    std::fs::write(root.join("a.txt"), b"hello").unwrap();
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;
    login_raw(&mut reader, &mut writer).await;

    let reply = send_raw(&mut reader, &mut writer, "PASV").await;
    assert!(reply.starts_with("227 "), "PASV reply was {:?}", reply);
    let first = endpoint::decode_pasv_reply(&reply).unwrap();
    let mut stale = TcpStream::connect(first).await.unwrap();

    // The second PASV drops the first channel; the connection we made
    // to it gets closed by the server.
    let reply = send_raw(&mut reader, &mut writer, "PASV").await;
    assert!(reply.starts_with("227 "));
    let second = endpoint::decode_pasv_reply(&reply).unwrap();

    let mut buffer = [0u8; 1];
    let outcome = tokio::time::timeout(Duration::from_secs(5), stale.read(&mut buffer))
        .await
        .expect("first data connection was not closed");
    // EOF or a reset, depending on whether the accept won the race
    // against the replacement; either way the connection is dead.
    match outcome {
        Ok(0) | Err(_) => {}
        Ok(n) => panic!("unexpected {} bytes on the stale data connection", n),
    }

    // Only the second channel is live and usable.
    let mut data = TcpStream::connect(second).await.unwrap();
    let reply = send_raw(&mut reader, &mut writer, "RETR a.txt").await;
    assert!(reply.starts_with("150 "), "RETR reply was {:?}", reply);
    let mut payload = Vec::new();
    data.read_to_end(&mut payload).await.unwrap();
    assert_eq!(payload, b"hello");
    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    assert!(line.starts_with("226 "), "completion was {:?}", line);
}

#[tokio::test]
async fn retr_missing_file_clears_the_data_channel() {
    let root = temp_root("retr-missing");
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;
    login_raw(&mut reader, &mut writer).await;

    let reply = send_raw(&mut reader, &mut writer, "PASV").await;
    let data_addr = endpoint::decode_pasv_reply(&reply).unwrap();
    let _data = TcpStream::connect(data_addr).await.unwrap();

    let reply = send_raw(&mut reader, &mut writer, "RETR nope.txt").await;
    assert!(reply.starts_with("550 "), "RETR reply was {:?}", reply);

    // The slot was cleared: a retry without a new negotiation fails.
    let reply = send_raw(&mut reader, &mut writer, "RETR nope.txt").await;
    assert!(reply.starts_with("425 "), "second RETR was {:?}", reply);
}

#[tokio::test]
async fn transfer_commands_require_a_data_channel() {
    let root = temp_root("no-channel");
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;
    login_raw(&mut reader, &mut writer).await;

    for command in ["LIST", "RETR a.txt", "STOR a.txt"] {
        let reply = send_raw(&mut reader, &mut writer, command).await;
        assert!(
            reply.starts_with("425 "),
            "{} without a channel answered {:?}",
            command,
            reply
        );
    }
}

#[tokio::test]
async fn end_to_end_retrieve_five_bytes() {
    let root = temp_root("e2e-retr");
    std::fs::write(root.join("a.txt"), b"hello").unwrap();
    let addr = start_server(&root).await;

    let mut client = FtpClient::connect("127.0.0.1", addr.port()).await.unwrap();
    client.login("anonymous", "guest@").await.unwrap();

    let local = root.join("downloaded.txt");
    let received = client.download("a.txt", &local).await.unwrap();
    assert_eq!(received, 5);
    assert_eq!(std::fs::read(&local).unwrap(), b"hello");

    client.quit().await.unwrap();
}

#[tokio::test]
async fn end_to_end_store_empty_file() {
    let root = temp_root("e2e-stor");
    let local = root.join("empty-src.txt");
    std::fs::write(&local, b"").unwrap();
    let addr = start_server(&root).await;

    let mut client = FtpClient::connect("127.0.0.1", addr.port()).await.unwrap();
    client.login("anonymous", "guest@").await.unwrap();

    let sent = client.upload(&local, "uploaded.txt").await.unwrap();
    assert_eq!(sent, 0);

    let stored = root.join("uploaded.txt");
    assert!(stored.exists());
    assert_eq!(std::fs::read(&stored).unwrap().len(), 0);

    client.quit().await.unwrap();
}

#[tokio::test]
async fn store_then_retrieve_round_trip() {
    let root = temp_root("e2e-roundtrip");
    let payload = vec![42u8; 100_000];
    let local = root.join("src.bin");
    std::fs::write(&local, &payload).unwrap();
    let addr = start_server(&root).await;

    let mut client = FtpClient::connect("127.0.0.1", addr.port()).await.unwrap();
    client.login("anonymous", "guest@").await.unwrap();

    assert_eq!(
        client.upload(&local, "stored.bin").await.unwrap(),
        payload.len() as u64
    );
    let fetched = root.join("fetched.bin");
    assert_eq!(
        client.download("stored.bin", &fetched).await.unwrap(),
        payload.len() as u64
    );
    assert_eq!(std::fs::read(&fetched).unwrap(), payload);
}

#[tokio::test]
async fn listing_names_the_directory_entries() {
    let root = temp_root("list");
    std::fs::write(root.join("a.txt"), b"aaa").unwrap();
    std::fs::write(root.join("b.txt"), b"bb").unwrap();
    std::fs::create_dir(root.join("sub")).unwrap();
    let addr = start_server(&root).await;

    let mut client = FtpClient::connect("127.0.0.1", addr.port()).await.unwrap();
    client.login("anonymous", "guest@").await.unwrap();

    let listing = client.list(None).await.unwrap();
    assert!(listing.contains("a.txt"), "listing was {:?}", listing);
    assert!(listing.contains("b.txt"));
    assert!(listing.contains("sub"));
    assert!(listing.contains(" 1 owner group "));
}

#[tokio::test]
async fn cwd_failures_leave_the_working_directory_alone() {
    let root = temp_root("cwd");
    std::fs::create_dir(root.join("sub")).unwrap();
    let addr = start_server(&root).await;

    let mut client = FtpClient::connect("127.0.0.1", addr.port()).await.unwrap();
    client.login("anonymous", "guest@").await.unwrap();

    assert!(client.cwd("missing").await.is_err());
    assert_eq!(client.pwd().await.unwrap(), "/");

    client.cwd("sub").await.unwrap();
    assert_eq!(client.pwd().await.unwrap(), "/sub");

    // `..` from the root cannot escape above `/`.
    client.cwd("/").await.unwrap();
    let reply = client.send_command("CDUP").await.unwrap();
    assert_eq!(reply.code, 250);
    assert_eq!(client.pwd().await.unwrap(), "/");
}

#[tokio::test]
async fn feat_is_a_multi_line_response() {
    let root = temp_root("feat");
    let addr = start_server(&root).await;

    let mut client = FtpClient::connect("127.0.0.1", addr.port()).await.unwrap();
    let reply = client.send_command("FEAT").await.unwrap();
    assert_eq!(reply.code, 211);
    assert!(reply.message.contains("UTF8"));
    assert!(reply.message.ends_with("End"));
}

#[tokio::test]
async fn quit_closes_the_control_connection() {
    let root = temp_root("quit");
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;

    let reply = send_raw(&mut reader, &mut writer, "QUIT").await;
    assert!(reply.starts_with("221 "));

    let mut rest = String::new();
    let n = tokio::time::timeout(Duration::from_secs(5), reader.read_line(&mut rest))
        .await
        .expect("server did not close the connection")
        .unwrap();
    assert_eq!(n, 0);
}

#[tokio::test]
async fn port_negotiates_an_active_data_channel() {
    let root = temp_root("port");
    std::fs::write(root.join("a.txt"), b"hello").unwrap();
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;
    login_raw(&mut reader, &mut writer).await;

    // The client listens; the server dials out.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let local = listener.local_addr().unwrap();
    let tuple = format!(
        "127,0,0,1,{},{}",
        local.port() / 256,
        local.port() % 256
    );

    let reply = send_raw(&mut reader, &mut writer, &format!("PORT {}", tuple)).await;
    assert!(reply.starts_with("200 "), "PORT reply was {:?}", reply);
    let (mut data, _) = listener.accept().await.unwrap();

    let reply = send_raw(&mut reader, &mut writer, "RETR a.txt").await;
    assert!(reply.starts_with("150 "));
    let mut payload = Vec::new();
    data.read_to_end(&mut payload).await.unwrap();
    assert_eq!(payload, b"hello");
    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    assert!(line.starts_with("226 "));
}

#[tokio::test]
async fn malformed_port_parameter_is_a_syntax_error() {
    let root = temp_root("port-bad");
    let addr = start_server(&root).await;
    let (mut reader, mut writer) = connect_raw(addr).await;
    login_raw(&mut reader, &mut writer).await;

    for param in ["1,2,3", "127,0,0,1,300,1", "a,b,c,d,e,f"] {
        let reply = send_raw(&mut reader, &mut writer, &format!("PORT {}", param)).await;
        assert!(
            reply.starts_with("501 "),
            "PORT {} answered {:?}",
            param,
            reply
        );
    }
}
