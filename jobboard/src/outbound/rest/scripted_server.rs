//! Loopback HTTP server answering from a fixed script, for adapter tests.
//!
//! Each connection carries one request and is closed after the reply.

use std::sync::{Arc, Mutex};

use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Canned reply for requests whose `METHOD /path` starts with `route`.
#[derive(Debug, Clone, Copy)]
pub(super) struct Reply {
    pub(super) route: &'static str,
    pub(super) status: u16,
    pub(super) body: &'static str,
}

pub(super) struct ScriptedServer {
    base_url: Url,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl ScriptedServer {
    pub(super) async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let line = answer(stream, &replies).await;
                seen.lock().expect("request log").push(line);
            }
        });
        Self {
            base_url: Url::parse(&format!("http://{addr}")).expect("base url"),
            requests,
            task,
        }
    }

    pub(super) fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Request lines seen so far, e.g. `POST /auth/v1/signup`.
    pub(super) fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn answer(mut stream: TcpStream, replies: &[Reply]) -> String {
    let request = read_request(&mut stream).await;
    let line = request
        .lines()
        .next()
        .and_then(|first| first.rsplit_once(' '))
        .map(|(method_and_target, _)| method_and_target.to_owned())
        .unwrap_or_default();
    let reply = replies
        .iter()
        .find(|reply| line.starts_with(reply.route))
        .copied()
        .unwrap_or(Reply {
            route: "",
            status: 404,
            body: "{\"message\":\"no scripted reply\"}",
        });
    let response = format!(
        "HTTP/1.1 {} Scripted\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        reply.status,
        reply.body.len(),
        reply.body
    );
    stream
        .write_all(response.as_bytes())
        .await
        .expect("write reply");
    let _ = stream.shutdown().await;
    line
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        let read = stream.read(&mut chunk).await.expect("read request");
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(chunk.get(..read).unwrap_or_default());
        let text = String::from_utf8_lossy(&buffer);
        if let Some((head, body)) = text.split_once("\r\n\r\n") {
            let expected = head
                .lines()
                .filter_map(|header| header.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if body.len() >= expected {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
