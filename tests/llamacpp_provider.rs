use llama_query::errors::QueryError;
use llama_query::providers::llamacpp::{HttpConfig, LlamaCppProvider};
use llama_query::providers::CompletionProvider;
use llama_query::types::CompletionRequest;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned HTTP response and hands back the request body it saw.
async fn one_shot_server(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.expect("accept");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let body_start = loop {
            let n = sock.read(&mut chunk).await.expect("read");
            if n == 0 {
                break buf.len();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let head = String::from_utf8_lossy(&buf[..body_start]).to_ascii_lowercase();
        let content_length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < body_start + content_length {
            let n = sock.read(&mut chunk).await.expect("read body");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let response = format!(
            "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(response.as_bytes()).await.expect("write");
        sock.shutdown().await.ok();
        String::from_utf8_lossy(&buf[body_start..]).to_string()
    });
    (format!("http://{addr}"), handle)
}

fn provider(base_url: String) -> LlamaCppProvider {
    LlamaCppProvider::new(HttpConfig {
        base_url,
        connect_timeout_ms: 2_000,
        request_timeout_ms: 5_000,
    })
    .expect("provider")
}

fn request() -> CompletionRequest {
    CompletionRequest {
        prompt: "<|im_start|>user\nSay hi<|im_end|>\n".to_string(),
        temperature: 0.7,
        top_k: 40,
        top_p: 0.9,
        stream: false,
        stop: vec!["</s>".to_string(), "<|im_end|>".to_string()],
        n_predict: None,
    }
}

#[tokio::test]
async fn posts_completion_and_reads_payload() {
    let payload = json!({
        "content": "Hello there!",
        "tokens_evaluated": 5,
        "tokens_predicted": 3,
        "timings": {"prompt_ms": 12.5, "predicted_ms": 40.0}
    });
    let (url, server) = one_shot_server("HTTP/1.1 200 OK", payload.to_string()).await;

    let raw = provider(url).complete(request()).await.expect("completion");
    assert_eq!(raw.content, "Hello there!");
    assert_eq!(raw.server_payload, Some(payload));

    let sent: Value = serde_json::from_str(&server.await.expect("server")).expect("json body");
    assert_eq!(sent["stream"], json!(false));
    assert_eq!(sent["top_k"], json!(40));
    assert!(sent.get("n_predict").is_none());
}

#[tokio::test]
async fn non_success_status_is_typed() {
    let (url, server) =
        one_shot_server("HTTP/1.1 503 Service Unavailable", "{\"error\":\"loading\"}".to_string())
            .await;
    let err = provider(url).complete(request()).await.expect_err("503");
    match err.downcast_ref::<QueryError>() {
        Some(QueryError::HttpStatus { status, body }) => {
            assert_eq!(*status, 503);
            assert!(body.contains("loading"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.await.expect("server");
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let err = provider(format!("http://{addr}"))
        .complete(request())
        .await
        .expect_err("refused");
    assert!(matches!(
        err.downcast_ref::<QueryError>(),
        Some(QueryError::Transport { .. })
    ));
}

#[tokio::test]
async fn health_probe_hits_health_endpoint() {
    let (url, server) = one_shot_server("HTTP/1.1 200 OK", "{\"status\":\"ok\"}".to_string()).await;
    provider(url).health().await.expect("healthy");
    server.await.expect("server");
}
