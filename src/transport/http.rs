use crate::query::request::GraphQlRequest;
use crate::transport::error::TransportError;
use crate::transport::retry::{with_retry, Retried, RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::transport::{RawResponse, Transport};
use bon::bon;
use log::{debug, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://www.vegvesen.no/trafikkdata/api/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends requests to the traffic service over HTTP.
///
/// Every attempt is a single POST bounded by `timeout`. Attempts that time out are retried
/// immediately, up to `max_attempts` in total; any other failure ends the request.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    timeout: Duration,
    retry: RetryPolicy,
}

#[bon]
impl HttpTransport {
    /// Creates a transport. Every setting is optional.
    ///
    /// * `.endpoint(String)`: defaults to [`DEFAULT_ENDPOINT`].
    /// * `.timeout(Duration)`: per-attempt timeout, defaults to 5 seconds.
    /// * `.max_attempts(u32)`: defaults to 10.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::ClientBuild`] if the HTTP client cannot be initialized.
    #[builder]
    pub fn new(
        #[builder(into)] endpoint: Option<String>,
        timeout: Option<Duration>,
        max_attempts: Option<u32>,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .build()
            .map_err(TransportError::ClientBuild)?;
        Ok(Self {
            client,
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            retry: RetryPolicy::new(max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS)),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn attempt(&self, body: &str, attempt: u32) -> Result<RawResponse, TransportError> {
        debug!("POST {} (attempt {})", self.endpoint, attempt);
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e, attempt))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("HTTP error for {}: {}", self.endpoint, status);
            return Err(TransportError::HttpStatus {
                url: self.endpoint.clone(),
                status,
            });
        }

        response.text().await.map_err(|e| self.classify(e, attempt))
    }

    fn classify(&self, error: reqwest::Error, attempt: u32) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                url: self.endpoint.clone(),
                attempts: attempt,
            }
        } else {
            TransportError::NetworkRequest(self.endpoint.clone(), error)
        }
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: &GraphQlRequest) -> Result<RawResponse, TransportError> {
        let body = request.to_body()?;
        with_retry(self.retry, TransportError::is_timeout, |attempt| {
            self.attempt(&body, attempt)
        })
        .await
        .map_err(|Retried { error, .. }| error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one HTTP request (headers plus `content-length` bytes of body).
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
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
                if buf.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serves every connection with the same canned response and counts requests.
    async fn serve(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicU32>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/", listener.local_addr().unwrap());
        let requests = Arc::new(AtomicU32::new(0));
        let counter = requests.clone();
        tokio::spawn(async move {
            loop {
                let (mut stream, _) = listener.accept().await.unwrap();
                let counter = counter.clone();
                tokio::spawn(async move {
                    let request = read_request(&mut stream).await;
                    assert!(request.starts_with("POST /api/"));
                    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
                    counter.fetch_add(1, Ordering::SeqCst);
                    let response = format!(
                        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status_line,
                        body.len(),
                        body
                    );
                    stream.write_all(response.as_bytes()).await.unwrap();
                    stream.shutdown().await.ok();
                });
            }
        });
        (url, requests)
    }

    /// Accepts connections and never answers.
    async fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                let (stream, _) = listener.accept().await.unwrap();
                held.push(stream);
            }
        });
        url
    }

    #[test]
    fn builder_defaults_to_the_public_service() {
        let transport = HttpTransport::builder().build().unwrap();
        assert_eq!(transport.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(transport.timeout, DEFAULT_TIMEOUT);
        assert_eq!(transport.retry, RetryPolicy::default());

        let transport = HttpTransport::builder()
            .endpoint("http://localhost:8080/graphql")
            .build()
            .unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:8080/graphql");
    }

    #[tokio::test]
    async fn returns_body_on_success_after_one_request() {
        let (url, requests) = serve("200 OK", r#"{"data":{}}"#).await;
        let transport = HttpTransport::builder().endpoint(url).build().unwrap();

        let body = transport
            .execute(&GraphQlRequest::new("{ping}"))
            .await
            .unwrap();

        assert_eq!(body, r#"{"data":{}}"#);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_ok_status_fails_without_retry() {
        let (url, requests) = serve("503 Service Unavailable", "").await;
        let transport = HttpTransport::builder().endpoint(url).build().unwrap();

        let err = transport
            .execute(&GraphQlRequest::new("{ping}"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransportError::HttpStatus { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts_of_timeouts() {
        let url = serve_silence().await;
        let transport = HttpTransport::builder()
            .endpoint(url)
            .timeout(Duration::from_millis(100))
            .max_attempts(3)
            .build()
            .unwrap();

        let err = transport
            .execute(&GraphQlRequest::new("{ping}"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Timeout { attempts: 3, .. }));
    }

    #[tokio::test]
    async fn connection_failure_is_not_a_timeout() {
        // Bind then drop to get a port nobody listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/", listener.local_addr().unwrap());
        drop(listener);
        let transport = HttpTransport::builder().endpoint(url).build().unwrap();

        let err = transport
            .execute(&GraphQlRequest::new("{ping}"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::NetworkRequest(..)));
    }
}
