use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;

use crate::document::Document;
use crate::error::{ConvertError, FetchError};

/// Fetches raw document bytes.
pub trait Transport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Transport settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpOptions {
    pub timeout: Duration,
    /// Accept invalid TLS certificates, e.g. self-signed internal hosts.
    pub insecure: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            insecure: false,
        }
    }
}

/// Blocking HTTP(S) transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(options: HttpOptions) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.insecure)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_client(client))
    }

    /// Use an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let parsed = parse_url(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.bytes().map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            log::error!("GET {url} returned {status}: {body}");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body.to_vec())
    }
}

fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

/// Fetch and parse a Swagger document.
pub fn fetch_document(transport: &dyn Transport, url: &str) -> Result<Document, ConvertError> {
    log::info!("fetching {url}");
    let bytes = transport.get(url)?;
    let document = Document::from_slice(&bytes)?;
    Ok(document)
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;
    use crate::error::ParseError;

    struct FakeTransport {
        response: Result<Vec<u8>, u16>,
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(status) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *status,
                    body: "not here".to_string(),
                }),
            }
        }
    }

    /// Serve a single HTTP/1.1 response on a local port and return the base URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            stream.flush().unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_fetch_document_with_fake_transport() {
        let transport = FakeTransport {
            response: Ok(br#"{"swagger": "2.0", "paths": {}}"#.to_vec()),
        };
        let doc = fetch_document(&transport, "http://example.test/doc.json").unwrap();
        assert_eq!(doc.swagger_version(), Some("2.0"));
    }

    #[test]
    fn test_fetch_document_surfaces_status() {
        let transport = FakeTransport { response: Err(404) };
        let err = fetch_document(&transport, "http://example.test/doc.json").unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Fetch(FetchError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn test_fetch_document_rejects_bad_json() {
        let transport = FakeTransport {
            response: Ok(b"<html>".to_vec()),
        };
        let err = fetch_document(&transport, "http://example.test/doc.json").unwrap_err();
        assert!(matches!(err, ConvertError::Parse(ParseError::Json(_))));
    }

    fn local_transport() -> HttpTransport {
        HttpTransport::with_client(Client::builder().no_proxy().build().unwrap())
    }

    #[test]
    fn test_http_transport_success() {
        let base = serve_once("200 OK", r#"{"swagger":"2.0","paths":{}}"#);
        let transport = local_transport();
        let bytes = transport.get(&format!("{base}/v2/api-docs")).unwrap();
        assert_eq!(bytes, br#"{"swagger":"2.0","paths":{}}"#);
    }

    #[test]
    fn test_http_transport_error_status_keeps_body() {
        let base = serve_once("500 Internal Server Error", "boom");
        let transport = local_transport();
        let err = transport.get(&format!("{base}/doc.json")).unwrap_err();
        match err {
            FetchError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_http_transport_rejects_non_http_url() {
        let transport = HttpTransport::new(HttpOptions::default()).unwrap();
        let err = transport.get("ftp://example.test/doc.json").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));

        let err = transport.get("not a url").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
