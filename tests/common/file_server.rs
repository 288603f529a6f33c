//! Minimal HTTP/1.1 server for loader tests.
//!
//! Answers every GET with the same status and body and counts requests, so
//! tests can tell whether a load hit the network or the cache.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct FileServer {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub base: String,
    hits: Arc<AtomicUsize>,
}

impl FileServer {
    /// URL for `file_name` on this server.
    pub fn url(&self, file_name: &str) -> String {
        format!("{}/{}", self.base, file_name)
    }

    /// Requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Serve `body` with `200 OK`. The server runs until the process exits.
pub fn start(body: Vec<u8>) -> FileServer {
    start_with_status(body, "200 OK")
}

/// Serve `body` with the given status line (e.g. "404 Not Found").
pub fn start_with_status(body: Vec<u8>, status: &'static str) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            let body = Arc::clone(&body);
            thread::spawn(move || handle(stream, &body, status));
        }
    });
    FileServer {
        base: format!("http://127.0.0.1:{port}"),
        hits,
    }
}

/// Accept connections and read the request, but never answer. For timeout
/// tests: the client gives up first.
pub fn start_stalled(hold: Duration) -> FileServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    thread::spawn(move || {
        for mut stream in listener.incoming().flatten() {
            counter.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || {
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf);
                thread::sleep(hold);
            });
        }
    });
    FileServer {
        base: format!("http://127.0.0.1:{port}"),
        hits,
    }
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], status: &str) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    let head = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
