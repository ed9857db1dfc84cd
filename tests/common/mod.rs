//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dynamic_router::{HttpServer, RouterConfig, RoutingTable, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Read a request head and return (host header, request target).
async fn read_head(socket: &mut TcpStream) -> (String, String) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let head = String::from_utf8_lossy(&buf);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or_default()
        .to_string();
    let host = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.eq_ignore_ascii_case("host"))
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default();
    (host, target)
}

async fn respond(socket: &mut TcpStream, body: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

/// Start a mock backend that returns a fixed body. Returns its address.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_head(&mut socket).await;
                respond(&mut socket, response).await;
            });
        }
    });
    addr
}

/// Start a backend that echoes `host=<Host header> target=<request target>`.
pub async fn start_echo_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let (host, target) = read_head(&mut socket).await;
                respond(&mut socket, &format!("host={} target={}", host, target)).await;
            });
        }
    });
    addr
}

/// A router running on ephemeral ports.
pub struct TestRouter {
    pub proxy_addr: SocketAddr,
    pub admin_addr: SocketAddr,
    pub table: Arc<RoutingTable>,
    pub shutdown: Shutdown,
}

impl TestRouter {
    pub fn admin_url(&self, endpoint: &str) -> String {
        format!("http://{}/dynamic-router/{}", self.admin_addr, endpoint)
    }

    pub fn proxy_url(&self, path: &str) -> String {
        format!("http://{}{}", self.proxy_addr, path)
    }
}

/// Start a router with the given config (addresses are overridden).
pub async fn start_router(mut config: RouterConfig) -> TestRouter {
    config.listener.bind_address = "127.0.0.1:0".into();
    config.admin.bind_address = "127.0.0.1:0".into();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let admin_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let proxy_addr = listener.local_addr().unwrap();
    let admin_addr = admin_listener.local_addr().unwrap();

    let table = Arc::new(RoutingTable::new());
    let server = HttpServer::new(config, table.clone());
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, Some(admin_listener), server_shutdown).await;
    });

    // Listeners are already bound; give the accept loops a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestRouter {
        proxy_addr,
        admin_addr,
        table,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
