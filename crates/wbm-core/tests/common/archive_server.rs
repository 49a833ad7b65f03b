//! Minimal HTTP/1.1 server standing in for the archive in integration tests.
//!
//! Routes are keyed by request target (path plus query, exactly as sent).
//! Unknown targets answer 404. Every request target is logged so tests can
//! assert which captures were retrieved.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Answer 503 this many times before serving the route.
    pub fail_first: usize,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: body.into(),
            fail_first: 0,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            fail_first: 0,
        }
    }

    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            headers: vec![("Location".to_string(), location.to_string())],
            body: Vec::new(),
            fail_first: 0,
        }
    }

    pub fn flaky(mut self, fail_first: usize) -> Self {
        self.fail_first = fail_first;
        self
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Route>,
    requests: Vec<String>,
}

#[derive(Clone)]
pub struct ArchiveServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl ArchiveServer {
    /// Starts a server in a background thread. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    /// `http://127.0.0.1:{port}`, no trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn cdx_api_url(&self) -> String {
        format!("{}/cdx/search/xd", self.base)
    }

    pub fn archive_base_url(&self) -> String {
        format!("{}/web", self.base)
    }

    /// Registers `route` for an absolute URL on this server.
    pub fn route(&self, url: &str, route: Route) {
        let target = url.strip_prefix(&self.base).unwrap_or(url).to_string();
        self.state.lock().unwrap().routes.insert(target, route);
    }

    /// Registers a capture body under `/web/{timestamp}id_/{url}`.
    pub fn capture(&self, timestamp: &str, url: &str, body: &[u8]) {
        let target = format!("/web/{}id_/{}", timestamp, url);
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(target, Route::ok(body.to_vec()));
    }

    /// Request targets received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Targets of capture retrievals (`/web/...`).
    pub fn capture_requests(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.starts_with("/web/"))
            .collect()
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut request_line = request.lines().next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("");
    let target = request_line.next().unwrap_or("").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let route = {
        let mut state = state.lock().unwrap();
        state.requests.push(target.clone());
        match state.routes.get_mut(&target) {
            Some(route) if route.fail_first > 0 => {
                route.fail_first -= 1;
                Route::status(503)
            }
            Some(route) => route.clone(),
            None => Route::status(404),
        }
    };

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    );
    for (name, value) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
