//! Test fixtures shared by the integration tests.
//!
//! `CannedServer` is a tiny HTTP/1.1 server on a loopback port that answers
//! each incoming connection with the next canned response and records the
//! raw request it received.

#![allow(dead_code)]

use std::fs::{self, File};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::thread::{self, JoinHandle};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A request as seen by the server.
#[derive(Debug, Clone)]
pub struct Captured {
    pub head: String,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }
}

pub struct CannedServer {
    pub url: String,
    requests: Receiver<Captured>,
    handle: Option<JoinHandle<()>>,
}

impl CannedServer {
    /// Next captured request, in arrival order.
    pub fn next_request(&self) -> Captured {
        self.requests.recv().expect("server thread ended early")
    }

    /// Wait for the server to answer every canned response, then return
    /// all requests it received.
    pub fn finish(mut self) -> Vec<Captured> {
        if let Some(h) = self.handle.take() {
            h.join().expect("server thread panicked");
        }
        self.requests.try_iter().collect()
    }

    pub fn join(mut self) {
        if let Some(h) = self.handle.take() {
            h.join().expect("server thread panicked");
        }
    }
}

/// Build a raw HTTP response with `Connection: close` so every request
/// gets its own connection.
pub fn response(status: u16, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let reason = match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Status",
    };
    let mut out = format!("HTTP/1.1 {status} {reason}\r\n").into_bytes();
    for (k, v) in headers {
        out.extend_from_slice(format!("{k}: {v}\r\n").as_bytes());
    }
    out.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    out.extend_from_slice(b"Connection: close\r\n\r\n");
    out.extend_from_slice(body);
    out
}

pub fn json_response(status: u16, body: &str) -> Vec<u8> {
    response(status, &[("Content-Type", "application/json")], body.as_bytes())
}

/// Serve `responses` one connection at a time, then stop.
pub fn serve(responses: Vec<Vec<u8>>) -> CannedServer {
    serve_with(|_| responses)
}

/// Like `serve`, but the responses are built from the server's own base URL
/// so they can point back at it (e.g. a download link).
pub fn serve_with(build: impl FnOnce(&str) -> Vec<Vec<u8>>) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let url = format!("http://{}", listener.local_addr().expect("local addr"));
    let responses = build(&url);
    let (tx, rx) = channel();

    let handle = thread::spawn(move || {
        for canned in responses {
            let (mut stream, _) = match listener.accept() {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let captured = read_request(&mut stream);
            let _ = tx.send(captured);
            let _ = stream.write_all(&canned);
            let _ = stream.flush();
        }
    });

    CannedServer {
        url,
        requests: rx,
        handle: Some(handle),
    }
}

fn read_request(stream: &mut impl Read) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break buf.len(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut captured = Captured {
        head,
        body: Vec::new(),
    };
    let want: usize = captured
        .header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf.get(head_end + 4..).map(<[u8]>::to_vec).unwrap_or_default();
    while body.len() < want {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }
    captured.body = body;
    captured
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Zip every file and directory under `src` into `zip_path`, using
/// forward-slash relative names.
pub fn zip_dir(src: &Path, zip_path: &Path) {
    let mut zw = ZipWriter::new(File::create(zip_path).expect("create zip"));
    add_dir(&mut zw, src, "");
    zw.finish().expect("finish zip");
}

fn add_dir(zw: &mut ZipWriter<File>, dir: &Path, prefix: &str) {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .expect("read dir")
        .map(|e| e.expect("dir entry").path())
        .collect();
    entries.sort();
    for path in entries {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        let rel = format!("{prefix}{name}");
        if path.is_dir() {
            zw.add_directory(format!("{rel}/"), SimpleFileOptions::default())
                .expect("add dir");
            add_dir(zw, &path, &format!("{rel}/"));
        } else {
            zw.start_file(rel, SimpleFileOptions::default())
                .expect("start file");
            zw.write_all(&fs::read(&path).expect("read file"))
                .expect("write file");
        }
    }
}
