// HTTP seam between the client and the network.
//
// `MochiClient` builds a `Request` and hands it to a `Transport`. The real
// transport is a reqwest blocking client; tests plug in a double that
// records requests and returns canned responses.

use crate::error::ApiError;
use reqwest::blocking::Client;
use tracing::debug;

pub use reqwest::Method;

/// Basic-Auth credentials attached to every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

/// A fully built request: absolute URL, credentials and optional form body.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub auth: BasicAuth,
    pub form: Option<Vec<(String, String)>>,
}

/// Status code and raw body of whatever the service answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    /// Send one request and wait for the answer. Only failures to get an
    /// answer at all are errors here; status checking is the caller's job.
    fn send(&self, request: &Request) -> Result<Response, ApiError>;
}

/// Transport backed by a reusable reqwest blocking client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &Request) -> Result<Response, ApiError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .basic_auth(&request.auth.username, Some(&request.auth.password));
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let res = builder.send()?;
        let status = res.status().as_u16();
        // A body that can't be read is as good as no answer.
        let body = res.text()?;
        debug!(status, bytes = body.len(), "response received");
        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Accept one connection, capture the raw request, answer with `reply`.
    fn serve_once(reply: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let content_length = text[..end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }
            stream.write_all(reply.as_bytes()).unwrap();
            String::from_utf8(raw).unwrap()
        });
        (format!("http://{}", addr), handle)
    }

    fn local_transport() -> HttpTransport {
        HttpTransport {
            client: Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[test]
    fn http_transport_sends_basic_auth_and_form_body() {
        let (base, server) = serve_once(
            "HTTP/1.1 201 Created\r\nContent-Type: application/json\r\nContent-Length: 11\r\nConnection: close\r\n\r\n{\"id\":\"c1\"}",
        );
        let request = Request {
            method: Method::POST,
            url: format!("{}/api/cards", base),
            auth: BasicAuth {
                username: "key".into(),
                password: String::new(),
            },
            form: Some(vec![
                ("deck-id".into(), "d1".into()),
                ("content".into(), "a\n---\nb".into()),
            ]),
        };

        let res = local_transport().send(&request).unwrap();
        assert_eq!(res, Response { status: 201, body: "{\"id\":\"c1\"}".into() });

        let raw = server.join().unwrap();
        let lower = raw.to_lowercase();
        assert!(raw.starts_with("POST /api/cards HTTP/1.1\r\n"));
        // base64("key:")
        assert!(lower.contains("authorization: basic a2v5og==\r\n"));
        assert!(lower.contains("content-type: application/x-www-form-urlencoded"));
        assert!(raw.ends_with("\r\n\r\ndeck-id=d1&content=a%0A---%0Ab"));
    }

    #[test]
    fn http_transport_returns_error_statuses_as_responses() {
        let (base, server) = serve_once(
            "HTTP/1.1 401 Unauthorized\r\nContent-Length: 12\r\nConnection: close\r\n\r\nUnauthorized",
        );
        let request = Request {
            method: Method::GET,
            url: format!("{}/api/decks?limit=100", base),
            auth: BasicAuth {
                username: String::new(),
                password: String::new(),
            },
            form: None,
        };

        let res = local_transport().send(&request).unwrap();
        assert_eq!(res.status, 401);
        assert_eq!(res.body, "Unauthorized");
        let raw = server.join().unwrap();
        assert!(raw.starts_with("GET /api/decks?limit=100 HTTP/1.1\r\n"));
        // base64(":")
        assert!(raw.to_lowercase().contains("authorization: basic og==\r\n"));
    }

    #[test]
    fn success_means_any_2xx() {
        for status in [200, 201, 204, 299] {
            assert!(Response { status, body: String::new() }.is_success());
        }
        for status in [199, 301, 401, 404, 500] {
            assert!(!Response { status, body: String::new() }.is_success());
        }
    }
}
