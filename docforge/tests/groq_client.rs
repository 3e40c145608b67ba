use docforge::groq::{build_request, parse_completion, GroqClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
use docforge_core::LanguageModel;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[test]
fn test_request_body_has_single_user_message() {
    let body = serde_json::to_value(build_request("llama-3.3-70b-versatile", "write a todo app"))
        .unwrap();

    assert_eq!(
        body,
        serde_json::json!({
            "model": "llama-3.3-70b-versatile",
            "messages": [{ "role": "user", "content": "write a todo app" }]
        })
    );
}

#[test]
fn test_parse_completion_takes_first_choice() {
    let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"print(1)"}},{"index":1,"message":{"role":"assistant","content":"other"}}]}"#;
    assert_eq!(parse_completion(body).unwrap(), "print(1)");
}

#[test]
fn test_parse_completion_rejects_bad_bodies() {
    for body in [
        "not json",
        r#"{"choices":[]}"#,
        r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        r#"{"error":{"message":"nope"}}"#,
    ] {
        assert!(parse_completion(body).is_err(), "should reject {body}");
    }
}

#[test]
fn test_client_defaults_and_redacted_debug() {
    let client = GroqClient::new("super-secret", DEFAULT_MODEL);

    assert_eq!(client.model(), "llama-3.3-70b-versatile");
    assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
    let debug = format!("{client:?}");
    assert!(!debug.contains("super-secret"), "{debug}");
}

/// Serves one HTTP response and returns the raw request it received.
async fn serve_once(listener: TcpListener, status: &'static str, body: &'static str) -> String {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        request.extend_from_slice(&buf[..n]);
        let text = String::from_utf8_lossy(&request);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if request.len() >= header_end + 4 + content_length {
                break;
            }
        }
        if n == 0 {
            break;
        }
    }
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    socket.shutdown().await.ok();
    String::from_utf8_lossy(&request).into_owned()
}

#[tokio::test]
async fn test_submit_posts_prompt_with_bearer_auth() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/openai/v1/chat/completions", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_once(
        listener,
        "200 OK",
        r#"{"choices":[{"message":{"role":"assistant","content":"streamlit"}}]}"#,
    ));

    let client = GroqClient::new("test-key", "test-model").with_endpoint(endpoint);
    let reply = client.submit("list libraries").await.expect("submit should succeed");
    let request = server.await.unwrap();

    assert_eq!(reply, "streamlit");
    assert!(request.starts_with("POST /openai/v1/chat/completions"), "{request}");
    assert!(
        request.to_ascii_lowercase().contains("authorization: bearer test-key"),
        "{request}"
    );
    assert!(request.contains(r#""model":"test-model""#), "{request}");
    assert!(request.contains(r#""content":"list libraries""#), "{request}");
}

#[tokio::test]
async fn test_submit_surfaces_error_status_with_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());
    let server = tokio::spawn(serve_once(
        listener,
        "401 Unauthorized",
        r#"{"error":{"message":"Invalid API Key"}}"#,
    ));

    let client = GroqClient::new("bad-key", DEFAULT_MODEL).with_endpoint(endpoint);
    let err = client.submit("hello").await.unwrap_err();
    server.await.unwrap();

    let msg = err.to_string();
    assert!(msg.contains("401"), "{msg}");
    assert!(msg.contains("Invalid API Key"), "{msg}");
}
