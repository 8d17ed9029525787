//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies by request path (query included). Unknown paths get
//! 404. A path can be told to answer 503 a number of times before its body,
//! and every request's headers are recorded for later inspection.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Default)]
struct State {
    routes: HashMap<String, Vec<u8>>,
    /// Remaining 503 answers per path.
    failures: HashMap<String, u32>,
    requests: Vec<(String, Vec<String>)>,
}

#[derive(Clone)]
pub struct StaticServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl StaticServer {
    /// Base URL with trailing slash, e.g. "http://127.0.0.1:12345/".
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn route(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(normalize(path), body.into());
    }

    /// Answer 503 for the next `times` requests of `path`.
    pub fn fail_times(&self, path: &str, times: u32) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(normalize(path), times);
    }

    /// Number of requests seen for `path`.
    pub fn hits(&self, path: &str) -> usize {
        let path = normalize(path);
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(p, _)| *p == path)
            .count()
    }

    /// Header lines of every request for `path`.
    pub fn request_headers(&self, path: &str) -> Vec<Vec<String>> {
        let path = normalize(path);
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(p, _)| *p == path)
            .map(|(_, h)| h.clone())
            .collect()
    }
}

fn normalize(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Starts a server in a background thread. The server runs until the process exits.
pub fn start() -> StaticServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(Mutex::new(State::default()));
    let accept_state = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&accept_state);
            thread::spawn(move || handle(stream, &state));
        }
    });
    StaticServer {
        base: format!("http://127.0.0.1:{}/", port),
        state,
    }
}

fn handle(mut stream: std::net::TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
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
    let (method, path, headers) = parse_request(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let (status, body) = {
        let mut st = state.lock().unwrap();
        st.requests.push((path.clone(), headers));
        let failing = match st.failures.get_mut(&path) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        };
        if failing {
            ("503 Service Unavailable", Vec::new())
        } else {
            match st.routes.get(&path) {
                Some(body) => ("200 OK", body.clone()),
                None => ("404 Not Found", Vec::new()),
            }
        }
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
}

/// Returns (method, path, header lines).
fn parse_request(request: &str) -> (String, String, Vec<String>) {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("").to_string();
    let path = first.next().unwrap_or("/").to_string();
    let headers = lines
        .map(str::trim)
        .take_while(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    (method, path, headers)
}
