//! Scripted HTTP responder for probe tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the server answers one connection.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond { status: u16, reason: &'static str, body: String },
    /// Accept the request and never answer.
    Hang,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Respond {
            status: 200,
            reason: "OK",
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, reason: &'static str) -> Self {
        Reply::Respond {
            status,
            reason,
            body: String::new(),
        }
    }
}

/// Start a server answering the n-th connection with `replies[n]`.
///
/// Once the script runs out the last reply repeats. Returns `host:port`.
pub async fn spawn_test_server(replies: Vec<Reply>) -> String {
    assert!(!replies.is_empty(), "test server needs at least one reply");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let replies = Arc::new(replies);
    let counter = Arc::new(AtomicUsize::new(0));

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let reply = replies[n.min(replies.len() - 1)].clone();
            tokio::spawn(answer(stream, reply));
        }
    });

    addr.to_string()
}

async fn answer(mut stream: TcpStream, reply: Reply) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    match reply {
        Reply::Respond { status, reason, body } => {
            let response = format!(
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    }
}
