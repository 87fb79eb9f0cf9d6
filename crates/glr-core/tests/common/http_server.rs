//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves static bodies by request path. Unknown paths get 404. A route can
//! be told to answer 503 for its first N GETs to exercise retries.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Default)]
struct Route {
    body: Vec<u8>,
    /// GETs still to be answered with 503.
    unavailable: AtomicU32,
    /// GETs seen so far, including failed ones.
    hits: AtomicU32,
}

/// Routes served by a running server.
#[derive(Debug, Clone, Default)]
pub struct Routes(Arc<HashMap<String, Route>>);

impl Routes {
    pub fn hits(&self, path: &str) -> u32 {
        self.0
            .get(path)
            .map(|r| r.hits.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

#[derive(Debug, Default)]
pub struct ServerBuilder {
    routes: HashMap<String, Route>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path` (must start with '/').
    pub fn route(mut self, path: &str, body: Vec<u8>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                body,
                ..Route::default()
            },
        );
        self
    }

    /// Answer the first `n` GETs for `path` with 503.
    pub fn unavailable_first(mut self, path: &str, n: u32) -> Self {
        if let Some(route) = self.routes.get_mut(path) {
            route.unavailable = AtomicU32::new(n);
        }
        self
    }

    /// Starts the server in a background thread. Returns the base URL
    /// without a trailing slash (e.g. "http://127.0.0.1:12345") and the
    /// routes for inspecting hit counts. Runs until the process exits.
    pub fn start(self) -> (String, Routes) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Routes(Arc::new(self.routes));
        let served = routes.clone();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = served.clone();
                thread::spawn(move || handle(stream, &routes));
            }
        });
        (format!("http://127.0.0.1:{}", port), routes)
    }
}

fn handle(mut stream: TcpStream, routes: &Routes) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("");

    let Some(route) = routes.0.get(path) else {
        let _ = stream
            .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    };

    if method.eq_ignore_ascii_case("HEAD") {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nETag: \"glr-test\"\r\nConnection: close\r\n\r\n",
            route.body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(
            b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    route.hits.fetch_add(1, Ordering::SeqCst);
    let failing = route
        .unavailable
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        let _ = stream.write_all(
            b"HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        return;
    }

    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        route.body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&route.body);
}
