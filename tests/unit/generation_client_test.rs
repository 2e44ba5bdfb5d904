//! Unit tests for the generation client: request encoding, response
//! normalization, and a real HTTP round trip against a local listener.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pwgen_client::services::generation_client::{
    GenerationClient, GeneratorTransport, HttpTransport, TransportResponse,
};
use pwgen_client::types::errors::GenerationError;
use pwgen_client::types::generation::GenerationResult;
use pwgen_client::types::settings::{Language, Mode, Separator, Settings};
use rstest::rstest;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Form = Vec<(&'static str, String)>;

/// Transport that records each request and replays a canned response.
#[derive(Clone)]
struct StubTransport {
    reply: Result<TransportResponse, String>,
    seen: Arc<Mutex<Vec<(String, Form)>>>,
}

impl StubTransport {
    fn ok(status: u16, body: &str) -> Self {
        Self {
            reply: Ok(TransportResponse {
                status,
                body: body.to_string(),
            }),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn failing(msg: &str) -> Self {
        Self {
            reply: Err(msg.to_string()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn last_form(&self) -> Form {
        self.seen.lock().unwrap().last().unwrap().1.clone()
    }
}

impl GeneratorTransport for StubTransport {
    fn post_form(
        &self,
        url: &str,
        form: Form,
    ) -> impl Future<Output = Result<TransportResponse, GenerationError>> + Send {
        self.seen.lock().unwrap().push((url.to_string(), form));
        let reply = self.reply.clone().map_err(GenerationError::Network);
        async move { reply }
    }
}

fn value<'a>(form: &'a Form, key: &str) -> Option<&'a str> {
    form.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
}

#[tokio::test]
async fn test_password_request_fields() {
    let transport = StubTransport::ok(200, r#"{"password":"Xy7!abcdEFGH"}"#);
    let client = GenerationClient::new(transport.clone(), "http://gen.local/");

    let mut settings = Settings::default();
    settings.length = 12;
    settings.include_special = false;
    let result = client.generate(&settings).await.unwrap();
    assert_eq!(
        result,
        GenerationResult::Single {
            credential: "Xy7!abcdEFGH".to_string()
        }
    );

    let (url, form) = transport.seen.lock().unwrap()[0].clone();
    assert_eq!(url, "http://gen.local/generate-password");
    assert_eq!(value(&form, "type"), Some("password"));
    assert_eq!(value(&form, "length"), Some("12"));
    assert_eq!(value(&form, "include_uppercase"), Some("true"));
    assert_eq!(value(&form, "include_special"), Some("false"));
    assert_eq!(value(&form, "language"), Some("en"));
    assert_eq!(value(&form, "user_defined_separator"), None);
    assert_eq!(value(&form, "languageCustom"), None);
}

#[rstest]
#[case(Separator::Space, "space")]
#[case(Separator::Hyphen, "hyphen")]
#[case(Separator::Underscore, "underscore")]
#[case(Separator::Period, "period")]
#[case(Separator::Comma, "comma")]
#[case(Separator::Number, "number")]
#[case(Separator::SpecialCharacter, "special_character")]
#[case(Separator::Random, "random")]
#[tokio::test]
async fn test_named_separator_encoding(#[case] separator: Separator, #[case] wire: &str) {
    let transport = StubTransport::ok(200, r#"{"password":"a-b"}"#);
    let client = GenerationClient::new(transport.clone(), "/");

    let mut settings = Settings::default();
    settings.mode = Mode::Passphrase;
    settings.separator = separator;
    settings.custom_separator = "#".to_string();
    client.generate(&settings).await.unwrap();

    let form = transport.last_form();
    assert_eq!(value(&form, "separator_type"), Some(wire));
    assert_eq!(value(&form, "user_defined_separator"), None);
}

#[tokio::test]
async fn test_custom_separator_and_language_encoding() {
    let transport = StubTransport::ok(200, r#"{"password":"a;b"}"#);
    let client = GenerationClient::new(transport.clone(), "/");

    let mut settings = Settings::default();
    settings.mode = Mode::Passphrase;
    settings.separator = Separator::Custom;
    settings.custom_separator = ";".to_string();
    settings.language = Language::Custom;
    settings.custom_language = "wordlist-42".to_string();
    client.generate(&settings).await.unwrap();

    let form = transport.last_form();
    assert_eq!(value(&form, "type"), Some("passphrase"));
    assert_eq!(value(&form, "separator_type"), Some("single_character"));
    assert_eq!(value(&form, "user_defined_separator"), Some(";"));
    assert_eq!(value(&form, "language"), Some("custom"));
    assert_eq!(value(&form, "languageCustom"), Some("wordlist-42"));
}

#[tokio::test]
async fn test_failures_map_to_generation_error() {
    let client = GenerationClient::new(StubTransport::failing("refused"), "/");
    assert!(matches!(
        client.generate(&Settings::default()).await,
        Err(GenerationError::Network(_))
    ));

    let client = GenerationClient::new(StubTransport::ok(502, "bad gateway"), "/");
    assert!(matches!(
        client.generate(&Settings::default()).await,
        Err(GenerationError::Status(502))
    ));

    let client = GenerationClient::new(StubTransport::ok(200, r#"{"entropy":12.5}"#), "/");
    assert!(matches!(
        client.generate(&Settings::default()).await,
        Err(GenerationError::InvalidPayload(_))
    ));
}

#[tokio::test]
async fn test_batch_response() {
    let transport = StubTransport::ok(200, r#"{"passwords":["a","b","c"],"password":"ignored"}"#);
    let client = GenerationClient::new(transport, "/");
    assert_eq!(
        client.generate(&Settings::default()).await.unwrap(),
        GenerationResult::Batch {
            credentials: vec!["a".to_string(), "b".to_string(), "c".to_string()]
        }
    );
}

/// Serves exactly one HTTP request with `body` and hands back the raw request.
async fn serve_once(body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let lower = line.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .map(|v| v.trim().parse::<usize>().unwrap())
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + content_length || n == 0 {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    });

    (base, server)
}

#[tokio::test]
async fn test_end_to_end_password_over_http() {
    let (base, server) = serve_once(r#"{"password":"Q9!vR2#mT4@z","entropy":78.8}"#).await;

    let client = GenerationClient::new(HttpTransport::new(Duration::from_secs(5)).unwrap(), &base);
    let mut settings = Settings::default();
    settings.length = 12;
    let result = client.generate(&settings).await.unwrap();

    assert_eq!(
        result,
        GenerationResult::Single {
            credential: "Q9!vR2#mT4@z".to_string()
        }
    );

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /generate-password "));
    assert!(request
        .to_ascii_lowercase()
        .contains("content-type: application/x-www-form-urlencoded"));
    assert!(request.contains("type=password"));
    assert!(request.contains("length=12"));
    assert!(request.contains("include_uppercase=true"));
}

#[tokio::test]
async fn test_end_to_end_unreachable_generator() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let client = GenerationClient::new(HttpTransport::new(Duration::from_secs(2)).unwrap(), &base);
    assert!(matches!(
        client.generate(&Settings::default()).await,
        Err(GenerationError::Network(_))
    ));
}
