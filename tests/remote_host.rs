//! Remote tool host integration tests
//!
//! A minimal HTTP/1.1 tool host on a local port serves the listing and
//! execute endpoints so the remote dispatcher runs against real sockets.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use toolrelay::error::RelayError;
use toolrelay::llm::MockLlmClient;
use toolrelay::pipeline::Pipeline;
use toolrelay::reasoning::ReasoningAdapter;
use toolrelay::tools::{RemoteToolDispatcher, ToolCatalog, ToolDispatcher, handlers};

/// Status, content type, body
type Reply = (u16, &'static str, String);

/// Answers an execute request body
type ExecuteHandler = fn(&str) -> Reply;

struct ToolHost {
    url: String,
    listing_requests: Arc<AtomicUsize>,
    execute_requests: Arc<AtomicUsize>,
}

impl ToolHost {
    fn listings(&self) -> usize {
        self.listing_requests.load(Ordering::SeqCst)
    }

    fn executes(&self) -> usize {
        self.execute_requests.load(Ordering::SeqCst)
    }

    fn dispatcher(&self) -> RemoteToolDispatcher {
        RemoteToolDispatcher::new(&self.url, Duration::from_secs(5)).unwrap()
    }
}

async fn start_host(on_execute: ExecuteHandler) -> ToolHost {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let listing_requests = Arc::new(AtomicUsize::new(0));
    let execute_requests = Arc::new(AtomicUsize::new(0));

    let listings = Arc::clone(&listing_requests);
    let executes = Arc::clone(&execute_requests);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let listings = Arc::clone(&listings);
            let executes = Arc::clone(&executes);
            tokio::spawn(async move {
                serve(stream, on_execute, listings, executes).await;
            });
        }
    });

    ToolHost {
        url,
        listing_requests,
        execute_requests,
    }
}

async fn serve(mut stream: TcpStream, on_execute: ExecuteHandler, listings: Arc<AtomicUsize>, executes: Arc<AtomicUsize>) {
    let Some((request_line, body)) = read_request(&mut stream).await else {
        return;
    };

    let (status, content_type, body) = if request_line.starts_with("GET /mcp/tools") {
        listings.fetch_add(1, Ordering::SeqCst);
        (200, "application/json", ToolCatalog::builtin().unwrap().to_wire().to_string())
    } else if request_line.starts_with("POST /mcp/execute") {
        executes.fetch_add(1, Ordering::SeqCst);
        on_execute(&body)
    } else {
        (404, "text/plain", "not found".to_string())
    };

    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Read one request; returns the request line and the body
async fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let request_line = head.lines().next().unwrap_or_default().to_string();
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some((request_line, body))
}

/// Runs the built-in handlers, answering unknown tools the way a real host does
fn builtin_tools(body: &str) -> Reply {
    let request: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let tool = request["tool"].as_str().unwrap_or_default();
    let input = &request["input"];

    let result = match tool {
        "simpleTool" => handlers::simple_tool(input),
        "submissionIntake" => handlers::submission_intake(input),
        "isicToAocMapping" => handlers::isic_to_aoc_mapping(input),
        other => {
            let error = json!({ "error": format!("Tool '{}' not found.", other) });
            return (400, "application/json", error.to_string());
        }
    };

    match result {
        Ok(output) => (200, "application/json", output.to_string()),
        Err(e) => (500, "application/json", json!({ "error": e.to_string() }).to_string()),
    }
}

fn rejects_tool(_: &str) -> Reply {
    (400, "application/json", r#"{"error":"Tool 'x' not found."}"#.to_string())
}

fn error_with_ok_status(_: &str) -> Reply {
    (200, "application/json", r#"{"error":"Handler crashed"}"#.to_string())
}

fn gateway_page(_: &str) -> Reply {
    (200, "text/html", "<html>gateway page</html>".to_string())
}

fn plain_text_failure(_: &str) -> Reply {
    (500, "text/plain", "upstream unavailable".to_string())
}

#[tokio::test]
async fn test_catalog_from_host() {
    let host = start_host(builtin_tools).await;
    let catalog = host.dispatcher().catalog().await.unwrap();

    assert_eq!(catalog.len(), 3);
    assert!(catalog.contains("isicToAocMapping"));
    assert_eq!(host.listings(), 1);
}

#[tokio::test]
async fn test_execute_through_host() {
    let host = start_host(builtin_tools).await;
    let result = host
        .dispatcher()
        .execute("simpleTool", json!({"toolInput": "remote"}))
        .await
        .unwrap();

    assert_eq!(result.payload, json!({"toolOutput": "Processed: remote"}));
    assert_eq!(
        result.metadata.response_size_bytes,
        serde_json::to_vec(&result.payload).unwrap().len() as u64
    );
}

#[tokio::test]
async fn test_rejected_status_carries_host_message() {
    let host = start_host(rejects_tool).await;
    let err = host
        .dispatcher()
        .execute("simpleTool", json!({"toolInput": "x"}))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Dispatch(ref message) if message == "Tool 'x' not found."));
}

#[tokio::test]
async fn test_error_body_with_ok_status_fails() {
    let host = start_host(error_with_ok_status).await;
    let err = host
        .dispatcher()
        .execute("simpleTool", json!({"toolInput": "x"}))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Dispatch(ref message) if message == "Handler crashed"));
}

#[tokio::test]
async fn test_non_json_success_body_fails() {
    let host = start_host(gateway_page).await;
    let err = host
        .dispatcher()
        .execute("simpleTool", json!({"toolInput": "x"}))
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Dispatch(_)));
}

#[tokio::test]
async fn test_plain_text_failure_keeps_status_and_body() {
    let host = start_host(plain_text_failure).await;
    let err = host
        .dispatcher()
        .execute("simpleTool", json!({"toolInput": "x"}))
        .await
        .unwrap_err();

    match err {
        RelayError::Dispatch(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("upstream unavailable"));
        }
        other => panic!("Expected dispatch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_tool_never_posted() {
    let host = start_host(builtin_tools).await;
    let dispatcher = host.dispatcher();
    dispatcher.catalog().await.unwrap();

    let err = dispatcher.execute("phantomTool", json!({})).await.unwrap_err();
    assert!(matches!(err, RelayError::UnknownTool(ref name) if name == "phantomTool"));
    assert_eq!(host.executes(), 0);
}

#[tokio::test]
async fn test_execute_reuses_catalog_snapshot() {
    let host = start_host(builtin_tools).await;
    let dispatcher = host.dispatcher();

    dispatcher.execute("simpleTool", json!({"toolInput": "a"})).await.unwrap();
    dispatcher.execute("simpleTool", json!({"toolInput": "b"})).await.unwrap();
    assert_eq!(host.listings(), 1);

    dispatcher.catalog().await.unwrap();
    assert_eq!(host.listings(), 2);
}

#[tokio::test]
async fn test_pipeline_reads_listing_once() {
    let host = start_host(builtin_tools).await;
    let client = Arc::new(
        MockLlmClient::new()
            .with_response("------\nThe request carries toolInput.\n------\nFinal Answer: simpleTool")
            .with_response("{\"toolInput\": \"warehouse\"}"),
    );
    let pipeline = Pipeline::new(Arc::new(host.dispatcher()), ReasoningAdapter::new(client.clone()).unwrap());
    let request = json!({
        "toolInput": "warehouse",
        "submission": {"initialInformation": {"codeISIC": {"value": "123456789"}}}
    });

    let result = pipeline.run(request).await.unwrap();

    assert_eq!(result.payload["toolOutput"], "Processed: warehouse");
    assert!(client.prompts()[0].contains("AOC123"));
    assert_eq!(host.listings(), 1);
    assert_eq!(host.executes(), 2);
}
