#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use chat_stream::{ExchangeHandler, SourceItem};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// Ordered log of handler callbacks.
#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<Call>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Chunk(String),
    Sources(Vec<String>),
    Complete(String),
    Error(String),
}

impl Recorder {
    pub fn chunks(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Chunk(delta) => Some(delta.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn terminal_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Complete(_) | Call::Error(_)))
            .count()
    }
}

impl ExchangeHandler for Recorder {
    fn on_chunk(&mut self, delta: &str) {
        self.calls.push(Call::Chunk(delta.to_owned()));
    }

    fn on_sources(&mut self, sources: &[SourceItem]) {
        self.calls.push(Call::Sources(
            sources.iter().map(|item| item.text.clone()).collect(),
        ));
    }

    fn on_complete(&mut self, full_text: &str) {
        self.calls.push(Call::Complete(full_text.to_owned()));
    }

    fn on_error(&mut self, message: &str) {
        self.calls.push(Call::Error(message.to_owned()));
    }
}

pub fn record_line(payload: &str) -> String {
    format!("data: {payload}\n\n")
}

pub fn record_body(payloads: &[&str]) -> Vec<u8> {
    payloads
        .iter()
        .map(|payload| record_line(payload))
        .collect::<String>()
        .into_bytes()
}

#[derive(Clone)]
pub struct ResponseChunk {
    pub delay_ms: u64,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub enum ScriptedResponse {
    Respond {
        status: u16,
        content_type: &'static str,
        chunks: Vec<ResponseChunk>,
    },
    Reset,
}

pub fn response_records(status: u16, payloads: &[&str]) -> ScriptedResponse {
    ScriptedResponse::Respond {
        status,
        content_type: "text/event-stream",
        chunks: vec![ResponseChunk {
            delay_ms: 0,
            bytes: record_body(payloads),
        }],
    }
}

pub fn response_json(status: u16, body: &str) -> ScriptedResponse {
    ScriptedResponse::Respond {
        status,
        content_type: "application/json",
        chunks: vec![ResponseChunk {
            delay_ms: 0,
            bytes: body.as_bytes().to_vec(),
        }],
    }
}

pub struct ScriptedServer {
    pub base_url: String,
    request_count: Arc<AtomicUsize>,
    request_bodies: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    pub async fn new(scripts: Vec<ScriptedResponse>) -> Self {
        let scripts = Arc::new(scripts);
        let request_count = Arc::new(AtomicUsize::new(0));
        let request_bodies = Arc::new(Mutex::new(Vec::new()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("local TCP listener should bind");
        let addr = listener
            .local_addr()
            .expect("resolved local listener address");
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn({
            let scripts = Arc::clone(&scripts);
            let request_count = Arc::clone(&request_count);
            let request_bodies = Arc::clone(&request_bodies);

            async move {
                loop {
                    let (socket, _) = match listener.accept().await {
                        Ok(pair) => pair,
                        Err(_) => break,
                    };
                    let scripts = Arc::clone(&scripts);
                    let request_count = Arc::clone(&request_count);
                    let request_bodies = Arc::clone(&request_bodies);
                    tokio::spawn(async move {
                        serve_one(socket, scripts, request_count, request_bodies).await;
                    });
                }
            }
        });

        Self {
            base_url,
            request_count,
            request_bodies,
            handle,
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Acquire)
    }

    pub fn request_bodies(&self) -> Vec<serde_json::Value> {
        self.request_bodies
            .lock()
            .expect("request body lock")
            .iter()
            .map(|body| serde_json::from_str(body).expect("request body is JSON"))
            .collect()
    }

    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Error",
    }
}

async fn serve_one(
    mut socket: TcpStream,
    scripts: Arc<Vec<ScriptedResponse>>,
    request_count: Arc<AtomicUsize>,
    request_bodies: Arc<Mutex<Vec<String>>>,
) {
    let Ok(body) = read_request(&mut socket).await else {
        return;
    };
    request_bodies
        .lock()
        .expect("request body lock")
        .push(body);

    let index = request_count.fetch_add(1, Ordering::AcqRel);
    let response = scripts
        .get(index)
        .cloned()
        .unwrap_or_else(|| response_json(500, r##"{"error":"unexpected request"}"##));

    match response {
        ScriptedResponse::Reset => {}
        ScriptedResponse::Respond {
            status,
            content_type,
            chunks,
        } => {
            let headers = format!(
                "HTTP/1.1 {status} {}\r\nContent-Type: {}\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
                status_reason(status),
                content_type,
            );

            if socket.write_all(headers.as_bytes()).await.is_err() {
                return;
            }

            for chunk in chunks {
                // A zero-length chunk would terminate the chunked body early.
                if chunk.bytes.is_empty() {
                    continue;
                }
                if chunk.delay_ms > 0 {
                    sleep(Duration::from_millis(chunk.delay_ms)).await;
                }
                let prefix = format!("{:X}\r\n", chunk.bytes.len());
                if socket.write_all(prefix.as_bytes()).await.is_err() {
                    return;
                }
                if socket.write_all(&chunk.bytes).await.is_err() {
                    return;
                }
                if socket.write_all(b"\r\n").await.is_err() {
                    return;
                }
            }

            let _ = socket.write_all(b"0\r\n\r\n").await;
            let _ = socket.shutdown().await;
        }
    }
}

async fn read_request(socket: &mut TcpStream) -> std::io::Result<String> {
    let mut request = Vec::new();
    let mut buffer = [0_u8; 2048];

    let header_end = loop {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            return Ok(String::new());
        }
        request.extend_from_slice(&buffer[..n]);
        if let Some(pos) = request.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while request.len() < header_end + content_length {
        let n = socket.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buffer[..n]);
    }

    let end = (header_end + content_length).min(request.len());
    Ok(String::from_utf8_lossy(&request[header_end..end]).into_owned())
}
