//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use recording_proxy::config::{ForwardAddress, ProxyConfig};
use recording_proxy::{HttpServer, ProxyError, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Build a raw HTTP/1.1 response that closes the connection.
#[allow(dead_code)]
pub fn raw_response(status_line: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status_line}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len()));
    out
}

/// Start a mock backend that answers every request with `response`.
///
/// Each request it receives (head and body) is sent on the returned channel.
pub async fn start_mock_backend(response: String) -> (SocketAddr, mpsc::UnboundedReceiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            let response = response.clone();
            tokio::spawn(async move {
                let request = read_request(&mut socket).await;
                let _ = tx.send(request);
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, rx)
}

/// Read one request: the head plus `Content-Length` bytes of body.
async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        if let Some(head_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + content_length {
                return buf;
            }
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return buf,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// A free local port with nothing listening on it.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running proxy under test.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub log_path: PathBuf,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), ProxyError>>,
}

/// Start a proxy forwarding to `backend`, logging under `logs_dir`.
pub async fn start_proxy(backend: SocketAddr, logs_dir: &Path) -> TestProxy {
    let mut config = ProxyConfig::default();
    config.forward.address = Some(ForwardAddress::parse(&format!("http://{backend}")).unwrap());
    config.recording.logs_dir = logs_dir.to_path_buf();

    let server = HttpServer::new(&config).await.unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(server.run(listener, server_shutdown));

    TestProxy {
        addr,
        log_path: logs_dir.join(format!("127.0.0.1.{}", backend.port())),
        shutdown,
        task,
    }
}

impl TestProxy {
    /// Stop gracefully and return the exchange log contents.
    pub async fn stop(self) -> String {
        self.shutdown.trigger();
        self.task.await.unwrap().unwrap();
        std::fs::read_to_string(&self.log_path).unwrap()
    }
}

/// A client that neither pools connections nor follows redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
