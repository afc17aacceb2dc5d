//! Minimal HTTP/1.1 server standing in for the release feed and download host.
//!
//! Routes:
//! - `GET /releases`: configured status + JSON body.
//! - `GET /zed`: configured status + binary body, with or without `Content-Length`.
//! - `GET /latest`: 302 redirect to `/zed`.
//!
//! Counts hits per route and records the last `User-Agent` seen.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct FeedOptions {
    pub releases_status: u16,
    pub releases_body: String,
    pub binary_status: u16,
    pub binary: Vec<u8>,
    /// If false, the binary is sent without `Content-Length` and the connection closed after it.
    pub send_length: bool,
}

impl FeedOptions {
    pub fn release(name: &str, binary: Vec<u8>) -> Self {
        Self {
            releases_status: 200,
            releases_body: format!(r#"[{{"name":"{}","tag_name":"{}"}}]"#, name, name),
            binary_status: 200,
            binary,
            send_length: true,
        }
    }
}

#[derive(Default)]
struct Stats {
    release_hits: AtomicUsize,
    download_hits: AtomicUsize,
    user_agent: Mutex<Option<String>>,
}

pub struct FeedServer {
    base: String,
    stats: Arc<Stats>,
}

impl FeedServer {
    pub fn releases_url(&self) -> String {
        format!("{}releases", self.base)
    }

    pub fn download_url(&self) -> String {
        format!("{}zed", self.base)
    }

    pub fn redirect_url(&self) -> String {
        format!("{}latest", self.base)
    }

    pub fn release_hits(&self) -> usize {
        self.stats.release_hits.load(Ordering::SeqCst)
    }

    pub fn download_hits(&self) -> usize {
        self.stats.download_hits.load(Ordering::SeqCst)
    }

    pub fn last_user_agent(&self) -> Option<String> {
        self.stats.user_agent.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(opts: FeedOptions) -> FeedServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let stats = Arc::new(Stats::default());
    let opts = Arc::new(opts);
    let server_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            let stats = Arc::clone(&server_stats);
            thread::spawn(move || handle(stream, &opts, &stats));
        }
    });
    FeedServer {
        base: format!("http://127.0.0.1:{}/", port),
        stats,
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn handle(mut stream: TcpStream, opts: &FeedOptions, stats: &Stats) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(5)));
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
    let (method, path, user_agent) = parse_request(request);
    if let Some(ua) = user_agent {
        *stats.user_agent.lock().unwrap() = Some(ua.to_string());
    }
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    match path.split('?').next().unwrap_or("") {
        "/releases" => {
            stats.release_hits.fetch_add(1, Ordering::SeqCst);
            let body = opts.releases_body.as_bytes();
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                opts.releases_status,
                reason(opts.releases_status),
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
        "/zed" => {
            stats.download_hits.fetch_add(1, Ordering::SeqCst);
            let length = if opts.send_length {
                format!("Content-Length: {}\r\n", opts.binary.len())
            } else {
                String::new()
            };
            let head = format!(
                "HTTP/1.1 {} {}\r\nContent-Type: application/octet-stream\r\n{}Connection: close\r\n\r\n",
                opts.binary_status,
                reason(opts.binary_status),
                length
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&opts.binary);
        }
        "/latest" => {
            let _ = stream.write_all(
                b"HTTP/1.1 302 Found\r\nLocation: /zed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            );
        }
        _ => {
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        }
    }
    let _ = stream.flush();
}

/// Returns (method, path, user-agent).
fn parse_request(request: &str) -> (&str, &str, Option<&str>) {
    let mut lines = request.lines();
    let mut first = lines.next().unwrap_or("").split_whitespace();
    let method = first.next().unwrap_or("");
    let path = first.next().unwrap_or("");
    let mut user_agent = None;
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("user-agent") {
                user_agent = Some(value.trim());
            }
        }
    }
    (method, path, user_agent)
}
