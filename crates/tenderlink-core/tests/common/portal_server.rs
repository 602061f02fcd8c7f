//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed route table keyed by method and path-with-query. Unknown
//! routes get 404. Every request line is recorded so tests can assert probe
//! order.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: String,
    /// Held before the response is written.
    pub delay: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct Routes(HashMap<(String, String), Route>);

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.add_delayed(method, path, status, body, Duration::ZERO)
    }

    pub fn add_delayed(
        mut self,
        method: &str,
        path: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) -> Self {
        self.0.insert(
            (method.to_string(), path.to_string()),
            Route {
                status,
                body: body.to_string(),
                delay,
            },
        );
        self
    }
}

/// Handle to a running server.
pub struct PortalServer {
    pub base: String,
    hits: Arc<Mutex<Vec<Hit>>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

impl PortalServer {
    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.hits().into_iter().map(|h| format!("{} {}", h.method, h.path)).collect()
    }
}

/// Starts a server in a background thread. Runs until the process exits.
pub fn start(routes: Routes) -> PortalServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let hits = Arc::new(Mutex::new(Vec::new()));
    let hits_srv = Arc::clone(&hits);
    thread::spawn(move || {
        // One connection at a time keeps the hit log in request order.
        for stream in listener.incoming().flatten() {
            handle(stream, &routes, &hits_srv);
        }
    });
    PortalServer {
        base: format!("http://127.0.0.1:{}", port),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, routes: &Routes, hits: &Mutex<Vec<Hit>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let hit = match parse_request(request) {
        Some(h) => h,
        None => return,
    };
    hits.lock().unwrap().push(hit.clone());

    let route = routes.0.get(&(hit.method.clone(), hit.path.clone()));
    let (status, body) = match route {
        Some(r) => {
            thread::sleep(r.delay);
            (r.status, r.body.as_str())
        }
        None => (404, ""),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    if hit.method != "HEAD" {
        let _ = stream.write_all(body.as_bytes());
    }
}

fn parse_request(request: &str) -> Option<Hit> {
    let mut lines = request.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let mut authorization = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("authorization") {
                authorization = Some(value.trim().to_string());
            }
        }
    }
    Some(Hit {
        method,
        path,
        authorization,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
