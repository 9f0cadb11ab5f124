//! Sessions served over a real TCP socket.

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use strictly_quiz::{QuestionBank, ScoreRepository, ServeOptions, SessionSettings, negotiation};

const IAC: u8 = 255;
const SB: u8 = 250;
const SE: u8 = 240;
const NAWS: u8 = 31;
const FAREWELL: &str = "Thanks for playing!";

struct TestServer {
    _dir: TempDir,
    port: u16,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = dir.path().join("quiz.db");
        let repository = ScoreRepository::open(db_path.to_str().expect("Invalid path"))
            .expect("Failed to open repository");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Bind failed");
        let port = listener.local_addr().expect("No local addr").port();
        let options = ServeOptions::new("127.0.0.1".into(), port, (80, 24), SessionSettings::new());

        let (stop, stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(strictly_quiz::serve_on(
            listener,
            options,
            Arc::new(QuestionBank::defaults()),
            repository,
            async move {
                let _ = stopped.await;
            },
        ));

        Self {
            _dir: dir,
            port,
            stop: Some(stop),
            task,
        }
    }

    /// Connects and consumes the telnet negotiation the server opens with.
    async fn connect(&self) -> TcpStream {
        let mut stream = TcpStream::connect(("127.0.0.1", self.port))
            .await
            .expect("Connect failed");
        let mut greeting = [0u8; 9];
        stream.read_exact(&mut greeting).await.expect("No negotiation");
        assert_eq!(greeting, negotiation());
        stream
    }

    async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let result = tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("Server did not stop");
        result.expect("Server task panicked").expect("Server failed");
    }
}

async fn read_until_closed(stream: &mut TcpStream) -> String {
    let mut output = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut output))
        .await
        .expect("Server did not close the connection")
        .expect("Read failed");
    String::from_utf8_lossy(&output).into_owned()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_oversized_window_report_does_not_break_session() {
    let server = TestServer::start().await;
    let mut stream = server.connect().await;

    // 65535 x 65535, every 0xff escaped as IAC IAC.
    stream
        .write_all(&[
            IAC, SB, NAWS, IAC, IAC, IAC, IAC, IAC, IAC, IAC, IAC, IAC, SE,
        ])
        .await
        .expect("Write failed");
    stream.write_all(b"amy\r").await.expect("Write failed");
    stream.write_all(&[0x03]).await.expect("Write failed");

    let output = read_until_closed(&mut stream).await;
    assert!(output.contains(FAREWELL));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_escape_on_identity_closes_connection() {
    let server = TestServer::start().await;
    let mut stream = server.connect().await;

    stream.write_all(&[0x1b]).await.expect("Write failed");

    let output = read_until_closed(&mut stream).await;
    assert!(output.contains(FAREWELL));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sessions_run_side_by_side() {
    let server = TestServer::start().await;
    let mut first = server.connect().await;
    let mut second = server.connect().await;

    // The second player leaves while the first is still typing a name.
    first.write_all(b"ali").await.expect("Write failed");
    second.write_all(&[0x03]).await.expect("Write failed");
    assert!(read_until_closed(&mut second).await.contains(FAREWELL));

    first.write_all(b"ce\r").await.expect("Write failed");
    first.write_all(&[0x03]).await.expect("Write failed");
    assert!(read_until_closed(&mut first).await.contains(FAREWELL));

    server.stop().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shutdown_stops_accepting() {
    let server = TestServer::start().await;
    let port = server.port;
    server.stop().await;

    assert!(TcpStream::connect(("127.0.0.1", port)).await.is_err());
}
