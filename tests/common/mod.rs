//! Shared utilities for integration testing against a fake HAProxy stats page.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const HEADER: &str =
    "# pxname,svname,qcur,qmax,scur,smax,slim,stot,bin,bout,status,hrsp_1xx,hrsp_2xx,hrsp_3xx,hrsp_4xx,hrsp_5xx,hrsp_other,";

/// Build a CSV stats page from rows (without the header).
pub fn csv_page(rows: &[&str]) -> String {
    let mut body = String::from(HEADER);
    body.push('\n');
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    body
}

/// A `BACKEND` aggregate row with the given response counters.
pub fn backend_row(name: &str, hrsp: [u64; 6]) -> String {
    format!(
        "{},BACKEND,0,0,0,0,0,0,0,0,UP,{},{},{},{},{},{},",
        name, hrsp[0], hrsp[1], hrsp[2], hrsp[3], hrsp[4], hrsp[5]
    )
}

/// A server row with the given status.
pub fn server_row(backend: &str, server: &str, status: &str) -> String {
    format!("{},{},0,0,0,0,0,0,0,0,{},0,0,0,0,0,0,", backend, server, status)
}

/// A running fake stats endpoint.
pub struct MockStats {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockStats {
    /// Stats location in the `host:port/path` form the checks accept.
    pub fn base_url_path(&self) -> String {
        format!("{}/haproxy/stats", self.addr)
    }

    /// Lower-cased request heads received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
        }
    }
    String::from_utf8_lossy(&buf).to_lowercase()
}

/// Serve `pages` in order, one per request; the last page repeats.
pub async fn start_stats_endpoint(pages: Vec<(u16, String)>) -> MockStats {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let pages = Arc::new(Mutex::new(pages));

    let seen = requests.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let seen = seen.clone();
                    let pages = pages.clone();
                    tokio::spawn(async move {
                        let head = read_request_head(&mut socket).await;
                        seen.lock().unwrap().push(head);

                        let (status, body) = {
                            let mut pages = pages.lock().unwrap();
                            if pages.len() > 1 {
                                pages.remove(0)
                            } else {
                                pages.first().cloned().unwrap_or((404, String::new()))
                            }
                        };
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockStats { addr, requests }
}

/// Accept connections but never answer.
pub async fn start_silent_endpoint() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });

    addr
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
