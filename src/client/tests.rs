use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use super::hunter::{API_KEY_HEADER, decode, endpoint_url, error_details, extract_values};
use super::types::{DomainSearchData, Envelope, VerificationData};
use super::{ApiError, EmailApi, Endpoint, HunterClient};
use crate::config::ApiConfig;

struct FixedApi;

impl EmailApi for FixedApi {
    fn verify_email(&self, email: &str) -> Result<String, ApiError> {
        Ok(format!("status-of-{email}"))
    }

    fn domain_search(&self, domain: &str) -> Result<Vec<String>, ApiError> {
        Ok(vec![format!("info@{domain}")])
    }
}

fn call_through<A: EmailApi>(api: A) -> (String, Vec<String>) {
    (
        api.verify_email("a@x.com").expect("verify"),
        api.domain_search("x.com").expect("search"),
    )
}

#[test]
fn verification_status_decoded() {
    let body = r#"{"data":{"status":"valid","result":"deliverable","score":100,"email":"patrick@stripe.com"},"meta":{"params":{}}}"#;
    let envelope: Envelope<VerificationData> =
        decode(Endpoint::EmailVerifier, body).expect("decodes");
    assert_eq!(envelope.data.status, "valid");
}

#[test]
fn domain_search_values_keep_order() {
    let body = r#"{
        "data": {
            "domain": "stripe.com",
            "emails": [
                {"value": "patrick@stripe.com", "type": "personal", "confidence": 99},
                {"value": "john@stripe.com", "type": "personal", "confidence": 92},
                {"value": "press@stripe.com", "type": "generic", "confidence": 80}
            ]
        }
    }"#;
    let envelope: Envelope<DomainSearchData> =
        decode(Endpoint::DomainSearch, body).expect("decodes");
    assert_eq!(
        extract_values(envelope.data),
        vec!["patrick@stripe.com", "john@stripe.com", "press@stripe.com"]
    );
}

#[test]
fn domain_search_without_emails_is_empty() {
    let envelope: Envelope<DomainSearchData> =
        decode(Endpoint::DomainSearch, r#"{"data":{"domain":"empty.io"}}"#).expect("decodes");
    assert!(extract_values(envelope.data).is_empty());
}

#[test]
fn missing_status_is_decode_error() {
    let err = decode::<Envelope<VerificationData>>(Endpoint::EmailVerifier, r#"{"data":{}}"#)
        .expect_err("status is required");
    assert!(matches!(
        err,
        ApiError::Decode {
            endpoint: Endpoint::EmailVerifier,
            ..
        }
    ));
}

#[test]
fn error_details_joined() {
    let body = r#"{"errors":[{"id":"authentication_failed","code":401,"details":"No user found for the API key supplied"}]}"#;
    assert_eq!(
        error_details(body).as_deref(),
        Some("No user found for the API key supplied")
    );

    let body = r#"{"errors":[{"id":"too_many_requests","code":429}]}"#;
    assert_eq!(error_details(body).as_deref(), Some("too_many_requests"));
}

#[test]
fn error_details_absent_for_non_json() {
    assert_eq!(error_details("<html>Bad gateway</html>"), None);
    assert_eq!(error_details(r#"{"errors":[]}"#), None);
}

#[test]
fn status_error_message_includes_details() {
    let err = ApiError::status(Endpoint::DomainSearch, 401, Some("bad key".to_string()));
    assert_eq!(err.to_string(), "domain-search answered HTTP 401: bad key");
    assert_eq!(err.http_status(), Some(401));
    assert!(!err.is_timeout());

    let err = ApiError::status(Endpoint::EmailVerifier, 502, None);
    assert_eq!(err.to_string(), "email-verifier answered HTTP 502");
}

#[test]
fn endpoint_url_joins_paths() {
    assert_eq!(
        endpoint_url("https://api.hunter.io/v2", Endpoint::EmailVerifier),
        "https://api.hunter.io/v2/email-verifier"
    );
    assert_eq!(
        endpoint_url("http://localhost:9000/v2/", Endpoint::DomainSearch),
        "http://localhost:9000/v2/domain-search"
    );
}

#[test]
fn client_keeps_config() {
    let config = ApiConfig::new("k").with_base_url("http://127.0.0.1:1/v2");
    let client = HunterClient::new(config.clone()).expect("client builds");
    assert_eq!(client.config(), &config);
}

#[test]
fn references_forward_calls() {
    let api = FixedApi;
    let (status, emails) = call_through(&api);
    assert_eq!(status, "status-of-a@x.com");
    assert_eq!(emails, vec!["info@x.com"]);
}

/// Serves one HTTP exchange on a local port. The request head (request line
/// and headers) is sent back through the returned channel.
fn spawn_http_server(status: &'static str, body: &'static str) -> (u16, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
    let port = listener.local_addr().expect("addr").port();
    let (head_tx, head_rx) = mpsc::channel();
    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut head = String::new();
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) if line == "\r\n" => break,
                Ok(_) => head.push_str(&line),
            }
        }
        head_tx.send(head).ok();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });
    (port, head_rx)
}

fn local_client(port: u16, key: &str) -> HunterClient {
    let config = ApiConfig::new(key)
        .with_base_url(format!("http://127.0.0.1:{port}/v2"))
        .with_timeout(Duration::from_secs(5));
    HunterClient::new(config).expect("client builds")
}

#[test]
fn verify_email_round_trip() {
    let (port, head_rx) = spawn_http_server("200 OK", r#"{"data":{"status":"valid","score":97}}"#);
    let client = local_client(port, "k3y");

    assert_eq!(client.verify_email("a+b@x.com").expect("verified"), "valid");

    let head = head_rx.recv().expect("request head");
    assert!(
        head.starts_with("GET /v2/email-verifier?email=a%2Bb%40x.com HTTP/1.1\r\n"),
        "unexpected request line: {head}"
    );
    let lowered = head.to_ascii_lowercase();
    assert!(
        lowered.contains(&format!("{}: k3y", API_KEY_HEADER.to_ascii_lowercase())),
        "key header missing: {head}"
    );
    assert!(!head.contains("api_key="), "key leaked into the URL: {head}");
}

#[test]
fn domain_search_round_trip_keeps_order() {
    let (port, head_rx) = spawn_http_server(
        "200 OK",
        r#"{"data":{"domain":"stripe.com","emails":[{"value":"b@stripe.com"},{"value":"a@stripe.com"}]}}"#,
    );
    let client = local_client(port, "k3y");

    let emails = client.domain_search("stripe.com").expect("searched");
    assert_eq!(emails, vec!["b@stripe.com", "a@stripe.com"]);

    let head = head_rx.recv().expect("request head");
    assert!(head.starts_with("GET /v2/domain-search?domain=stripe.com HTTP/1.1\r\n"), "{head}");
}

#[test]
fn error_status_carries_details() {
    let (port, _head_rx) = spawn_http_server(
        "401 Unauthorized",
        r#"{"errors":[{"id":"authentication_failed","code":401,"details":"bad key"}]}"#,
    );
    let client = local_client(port, "k3y");

    let err = client.domain_search("stripe.com").expect_err("401");
    assert!(matches!(
        err,
        ApiError::Status {
            endpoint: Endpoint::DomainSearch,
            status: 401,
            ..
        }
    ));
    assert_eq!(err.to_string(), "domain-search answered HTTP 401: bad key");
}

#[test]
fn undecodable_success_body_is_decode_error() {
    let (port, _head_rx) = spawn_http_server("200 OK", "not json");
    let client = local_client(port, "k3y");

    let err = client.verify_email("a@x.com").expect_err("bad body");
    assert!(matches!(err, ApiError::Decode { .. }), "{err:?}");
}

#[test]
fn transport_error_never_exposes_key() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client = local_client(port, "SECRETKEY");

    let err = client.verify_email("a@x.com").expect_err("connection refused");
    match &err {
        ApiError::Transport { source, .. } => assert!(source.url().is_none()),
        other => panic!("expected a transport error, got {other:?}"),
    }

    let shown = err.to_string();
    let debugged = format!("{err:?}");
    assert!(!shown.contains("SECRETKEY"), "{shown}");
    assert!(!debugged.contains("SECRETKEY"), "{debugged}");
}

#[test]
fn slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(Duration::from_secs(3));
            drop(stream);
        }
    });

    let config = ApiConfig::new("k3y")
        .with_base_url(format!("http://127.0.0.1:{port}/v2"))
        .with_timeout(Duration::from_millis(300));
    let client = HunterClient::new(config).expect("client builds");

    let err = client.verify_email("a@x.com").expect_err("timeout");
    assert!(err.is_timeout(), "{err:?}");
}
