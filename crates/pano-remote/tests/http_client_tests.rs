//! HttpCatalog against a loopback server answering with canned responses

use std::sync::{Arc, Mutex};

use pano_core::Credentials;
use pano_remote::{ApiSettings, CatalogApi, Error, HttpCatalog};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

struct Canned {
    status: u16,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
}

fn reply(status: u16, body: &'static str) -> Canned {
    Canned {
        status,
        headers: Vec::new(),
        body,
    }
}

fn token(value: &'static str) -> Canned {
    reply(200, value)
}

/// Answers one request per connection, in order, and records
/// `"<METHOD> <path> <authorization>"` for each.
struct LoopbackServer {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl LoopbackServer {
    async fn start(responses: Vec<Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            for canned in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let line = read_request(&mut stream).await;
                log.lock().unwrap().push(line);
                write_response(&mut stream, &canned).await;
            }
        });

        Self { base, requests }
    }

    fn catalog(&self) -> HttpCatalog {
        let settings = ApiSettings {
            api_url: format!("{}/api", self.base),
            auth_url: format!("{}/token", self.base),
            ..ApiSettings::default()
        };
        let credentials = Credentials {
            client_id: "id".into(),
            client_secret: "secret".into(),
        };
        HttpCatalog::new(settings, credentials).unwrap()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before the request head");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let header = |name: &str| {
        head.lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case(name).then(|| value.trim().to_string())
            })
            .unwrap_or_default()
    };

    let content_length: usize = header("content-length").parse().unwrap_or(0);
    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default();
    let path = request_line
        .next()
        .unwrap_or_default()
        .split('?')
        .next()
        .unwrap_or_default();
    format!("{} {} {}", method, path, header("authorization"))
}

async fn write_response(stream: &mut TcpStream, canned: &Canned) {
    let mut response = format!(
        "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        canned.status,
        canned.body.len()
    );
    for (name, value) in &canned.headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");
    response.push_str(canned.body);
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();
}

#[tokio::test]
async fn rejected_token_is_refetched_and_the_request_retried_once() {
    let server = LoopbackServer::start(vec![
        token(r#"{"access_token": "t1"}"#),
        reply(401, "expired"),
        token(r#"{"access_token": "t2"}"#),
        reply(200, r#"{"data": ["acme"]}"#),
    ])
    .await;

    let companies = server.catalog().companies().await.unwrap();

    assert_eq!(companies, vec!["acme".to_string()]);
    let requests = server.requests();
    assert_eq!(requests[1], "GET /api/companies Bearer t1");
    assert_eq!(requests[3], "GET /api/companies Bearer t2");
    assert!(requests[0].starts_with("POST /token Basic "));
}

#[tokio::test]
async fn second_rejection_is_an_error() {
    let server = LoopbackServer::start(vec![
        token(r#"{"access_token": "t1"}"#),
        reply(401, "expired"),
        token(r#"{"access_token": "t2"}"#),
        reply(401, "still expired"),
    ])
    .await;

    let err = server.catalog().companies().await.unwrap_err();

    assert!(err.is_unauthorized(), "got: {}", err);
    assert_eq!(server.requests().len(), 4);
}

#[tokio::test]
async fn deleting_a_missing_entity_succeeds() {
    let server = LoopbackServer::start(vec![
        token(r#"{"access_token": "t1"}"#),
        reply(404, "not found"),
    ])
    .await;

    server
        .catalog()
        .delete_model("acme", "sales", "orders")
        .await
        .unwrap();

    assert_eq!(server.requests()[1], "DELETE /api/models/orders Bearer t1");
}

#[tokio::test]
async fn failed_request_carries_the_request_id() {
    let server = LoopbackServer::start(vec![
        token(r#"{"access_token": "t1"}"#),
        Canned {
            status: 500,
            headers: vec![("x-diesel-request-id", "req-123")],
            body: "boom",
        },
    ])
    .await;

    let err = server
        .catalog()
        .upsert_data_source("acme", &pano_model::VirtualDataSource::new("sales", "Sales"))
        .await
        .unwrap_err();

    match &err {
        Error::Status {
            method,
            status,
            message,
            request_id,
            ..
        } => {
            assert_eq!(method, "PUT");
            assert_eq!(*status, 500);
            assert_eq!(message, "boom");
            assert_eq!(request_id.as_deref(), Some("req-123"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("req-123"));
}
