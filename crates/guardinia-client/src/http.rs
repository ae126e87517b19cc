//! HTTP client for the analysis webhook.

use std::time::Duration;

use async_trait::async_trait;
use guardinia_core::{AnalysisRequest, AnalysisResult, DEFAULT_ENDPOINT, DEFAULT_ORIGIN};
use thiserror::Error;
use tracing::{info, warn};

use crate::Analyzer;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where and how to reach the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// Sent as `origem` in every request body when set.
    pub origin: Option<String>,
    /// Per-request timeout. `None` leaves the platform default in place.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            origin: Some(DEFAULT_ORIGIN.to_string()),
            timeout: None,
        }
    }
}

/// Posts submissions to the webhook and interprets the JSON reply.
///
/// One POST per call: no retries, no caching.
pub struct WebhookClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl WebhookClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Submit one request and parse the verdict.
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
        let body = request.to_webhook(self.config.origin.as_deref());

        info!(url = %self.config.endpoint, mode = request.mode().as_str(), "submitting for analysis");
        let resp = self
            .client
            .post(&self.config.endpoint)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "webhook rejected submission");
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text().await?;
        let result = AnalysisResult::from_json(&text)?;
        info!(
            verdict = result.verdict.as_str(),
            reasons = result.reasons.len(),
            "analysis complete"
        );
        Ok(result)
    }
}

#[async_trait]
impl Analyzer for WebhookClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, ClientError> {
        self.submit(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Analyzer;
    use guardinia_core::{ImageFile, Verdict};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer a single HTTP request with a canned response; yields the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{addr}/prod/teste"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
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
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn client(endpoint: String) -> WebhookClient {
        WebhookClient::new(ClientConfig {
            endpoint,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    fn body_of(request: &str) -> serde_json::Value {
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.origin.as_deref(), Some("web"));
        assert!(config.timeout.is_none());
    }

    #[tokio::test]
    async fn posts_text_and_parses_verdict() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"cor":"vermelho","motivos":["link suspeito","urgência artificial"]}"#,
        )
        .await;

        let request = AnalysisRequest::text("  Confirme seus dados: bit.ly/x ").unwrap();
        let result = client(url).submit(&request).await.unwrap();
        assert_eq!(result.verdict, Verdict::Danger);
        assert_eq!(result.reasons, vec!["link suspeito", "urgência artificial"]);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /prod/teste HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        assert_eq!(
            body_of(&raw),
            serde_json::json!({"mensagem": "Confirme seus dados: bit.ly/x", "origem": "web"})
        );
    }

    #[tokio::test]
    async fn posts_image_as_base64() {
        let (url, server) = serve_once("200 OK", r#"{"cor":"verde","texto_analisado":"oi"}"#).await;

        let file = ImageFile::new("print.png", "image/png", b"hello".to_vec());
        let request = AnalysisRequest::image(&file).unwrap();
        let result = client(url).analyze(&request).await.unwrap();
        assert_eq!(result.verdict, Verdict::Safe);
        assert_eq!(result.extracted_text.as_deref(), Some("oi"));

        let raw = server.await.unwrap();
        assert_eq!(
            body_of(&raw),
            serde_json::json!({"imagem": "aGVsbG8=", "tipo": "imagem", "origem": "web"})
        );
    }

    #[tokio::test]
    async fn non_success_status_is_server_error() {
        let (url, _server) = serve_once("502 Bad Gateway", r#"{"erro":"Erro interno"}"#).await;

        let request = AnalysisRequest::text("oi").unwrap();
        let err = client(url).submit(&request).await.unwrap_err();
        match err {
            ClientError::Server { status, body } => {
                assert_eq!(status, 502);
                assert!(body.contains("Erro interno"));
            }
            other => panic!("expected server error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let (url, _server) = serve_once("200 OK", "not json").await;

        let request = AnalysisRequest::text("oi").unwrap();
        let err = client(url).submit(&request).await.unwrap_err();
        assert!(matches!(err, ClientError::Json(_)));
    }

    #[tokio::test]
    async fn connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = AnalysisRequest::text("oi").unwrap();
        let err = client(format!("http://{addr}/prod/teste"))
            .submit(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
