//! HTTP client for the analysis backend.
//!
//! One request per call, no retries. Failures are classified into
//! [`AnalysisError`] and handed back to the caller unchanged.

use crate::analysis::AnalysisResult;
use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::session::{Mode, SelectedFile};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod dispatch;
pub mod wire;

pub use dispatch::Dispatcher;
pub use wire::HealthStatus;

/// One outgoing request, built from session state by the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    Legal {
        file: SelectedFile,
        language: String,
    },
    Sustainability {
        file: Option<SelectedFile>,
        text: Option<String>,
        language: String,
    },
    Chat {
        question: String,
        context: Option<AnalysisResult>,
        mode: Mode,
        language: String,
    },
}

impl AnalysisRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Legal { .. } => "legal",
            Self::Sustainability { .. } => "sustainability",
            Self::Chat { .. } => "chat",
        }
    }
}

#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze_legal(
        &self,
        file: &SelectedFile,
        language: &str,
    ) -> Result<AnalysisResult, AnalysisError>;

    async fn analyze_sustainability(
        &self,
        file: Option<&SelectedFile>,
        text: Option<&str>,
        language: &str,
    ) -> Result<AnalysisResult, AnalysisError>;

    async fn chat(
        &self,
        question: &str,
        context: Option<&AnalysisResult>,
        mode: Mode,
        language: &str,
    ) -> Result<String, AnalysisError>;

    async fn health(&self) -> Result<HealthStatus, AnalysisError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    #[cfg(test)]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = config.api.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    async fn file_part(file: &SelectedFile) -> Result<Part, AnalysisError> {
        let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
            warn!(path = %file.path.display(), error = %err, "failed to read selected file");
            AnalysisError::transport()
        })?;

        Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime)
            .map_err(|err| {
                warn!(mime = %file.mime, error = %err, "invalid mime type for upload");
                AnalysisError::transport()
            })
    }

    async fn post_form(&self, route: &str, form: Form) -> Result<Response, AnalysisError> {
        self.client
            .post(self.url(route))
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_failure(route, err))
    }
}

async fn read_body(
    route: &str,
    response: Response,
) -> Result<(reqwest::StatusCode, Vec<u8>), AnalysisError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| transport_failure(route, err))?;
    debug!(route, %status, bytes = body.len(), "response received");
    Ok((status, body.to_vec()))
}

fn transport_failure(route: &str, err: reqwest::Error) -> AnalysisError {
    warn!(route, error = %err, "request failed in transport");
    AnalysisError::transport()
}

#[async_trait]
impl AnalysisBackend for HttpBackend {
    async fn analyze_legal(
        &self,
        file: &SelectedFile,
        language: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        const ROUTE: &str = "/analyze/legal";
        info!(file = %file.name, language, "submitting legal analysis");

        let form = Form::new()
            .part("file", Self::file_part(file).await?)
            .text("language", language.to_string());
        let response = self.post_form(ROUTE, form).await?;
        let (status, body) = read_body(ROUTE, response).await?;
        wire::classify_analysis(Mode::Legal, status, &body)
    }

    async fn analyze_sustainability(
        &self,
        file: Option<&SelectedFile>,
        text: Option<&str>,
        language: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        const ROUTE: &str = "/analyze/sustainability";
        info!(
            has_file = file.is_some(),
            has_text = text.is_some(),
            language,
            "submitting sustainability analysis"
        );

        let mut form = Form::new().text("language", language.to_string());
        if let Some(file) = file {
            form = form.part("file", Self::file_part(file).await?);
        }
        if let Some(text) = text {
            form = form.text("text", text.to_string());
        }

        let response = self.post_form(ROUTE, form).await?;
        let (status, body) = read_body(ROUTE, response).await?;
        wire::classify_analysis(Mode::Sustainability, status, &body)
    }

    async fn chat(
        &self,
        question: &str,
        context: Option<&AnalysisResult>,
        mode: Mode,
        language: &str,
    ) -> Result<String, AnalysisError> {
        const ROUTE: &str = "/chat";
        info!(%mode, language, has_context = context.is_some(), "sending chat question");

        let body = wire::ChatBody {
            question,
            context: context.map(AnalysisResult::to_context),
            mode,
            language,
        };
        let response = self
            .client
            .post(self.url(ROUTE))
            .json(&body)
            .send()
            .await
            .map_err(|err| transport_failure(ROUTE, err))?;
        let (status, body) = read_body(ROUTE, response).await?;
        wire::classify_chat(status, &body)
    }

    async fn health(&self) -> Result<HealthStatus, AnalysisError> {
        const ROUTE: &str = "/health";
        let response = self
            .client
            .get(self.url(ROUTE))
            .send()
            .await
            .map_err(|err| transport_failure(ROUTE, err))?;
        let (_status, body) = read_body(ROUTE, response).await?;
        serde_json::from_slice(&body).map_err(|err| {
            warn!(error = %err, "health response is not JSON");
            AnalysisError::transport()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;
    use tokio::time::{timeout, Duration};

    /// Accept one connection, answer with `status` and `body`, return the raw request.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("listener should have an address");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("client should connect");
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                match timeout(Duration::from_millis(300), socket.read(&mut chunk)).await {
                    Ok(Ok(0)) | Err(_) => break,
                    Ok(Ok(n)) => {
                        request.extend_from_slice(&chunk[..n]);
                        if request_complete(&request) {
                            break;
                        }
                    }
                    Ok(Err(_)) => break,
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket
                .write_all(response.as_bytes())
                .await
                .expect("response should write");
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{addr}"), handle)
    }

    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            });
        match content_length {
            Some(length) => raw.len() >= header_end + 4 + length,
            None => text.starts_with("GET "),
        }
    }

    fn pdf_fixture() -> (tempfile::NamedTempFile, SelectedFile) {
        let mut tmp = tempfile::Builder::new()
            .suffix(".pdf")
            .tempfile()
            .expect("temp file should be created");
        tmp.write_all(b"%PDF-1.4 notice").expect("temp file should write");
        let file = SelectedFile::new(tmp.path(), "application/pdf", 15);
        (tmp, file)
    }

    #[tokio::test]
    async fn legal_failure_surfaces_backend_error() {
        let (base_url, server) =
            serve_once("500 Internal Server Error", r#"{"error":"Analysis failed"}"#).await;
        let (_guard, file) = pdf_fixture();

        let backend = HttpBackend::new(base_url);
        let err = backend
            .analyze_legal(&file, "Hindi")
            .await
            .expect_err("500 should fail");
        assert_eq!(err.message, "Analysis failed");

        let request = server.await.expect("server task should finish");
        assert!(request.starts_with("POST /analyze/legal "));
        assert!(request.contains("name=\"language\"\r\n\r\nHindi"));
        assert!(request.contains("name=\"file\"; filename=\""));
    }

    #[tokio::test]
    async fn sustainability_text_only_sends_no_file_part() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"success":true,"mode":"sustainability","analysis":{"impact_score":6}}"#,
        )
        .await;

        let backend = HttpBackend::new(base_url);
        let result = backend
            .analyze_sustainability(None, Some("I drive 50km daily"), "English")
            .await
            .expect("should succeed");
        assert_eq!(result.mode(), Mode::Sustainability);

        let request = server.await.expect("server task should finish");
        assert!(request.starts_with("POST /analyze/sustainability "));
        assert!(request.contains("name=\"text\"\r\n\r\nI drive 50km daily"));
        assert!(!request.contains("name=\"file\""));
    }

    #[tokio::test]
    async fn chat_posts_json_with_null_context() {
        let (base_url, server) = serve_once("200 OK", r#"{"success":true,"answer":"Yes."}"#).await;

        let backend = HttpBackend::new(base_url);
        let answer = backend
            .chat("Can I appeal?", None, Mode::Legal, "English")
            .await
            .expect("should succeed");
        assert_eq!(answer, "Yes.");

        let request = server.await.expect("server task should finish");
        assert!(request.starts_with("POST /chat "));
        assert!(request.contains("\"context\":null"));
        assert!(request.contains("\"mode\":\"legal\""));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("listener should have an address");
        drop(listener);

        let backend = HttpBackend::new(format!("http://{addr}"));
        let err = backend
            .chat("hello", None, Mode::Sustainability, "English")
            .await
            .expect_err("closed port should fail");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn missing_file_on_disk_is_transport_failure() {
        let backend = HttpBackend::new("http://127.0.0.1:9");
        let file = SelectedFile::new("/definitely/not/here.pdf", "application/pdf", 10);
        let err = backend
            .analyze_legal(&file, "English")
            .await
            .expect_err("missing file should fail");
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn health_reports_groq_configuration() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"status":"healthy","groq_configured":false,"text_model":"llama"}"#,
        )
        .await;

        let backend = HttpBackend::new(base_url);
        let health = backend.health().await.expect("should succeed");
        assert!(!health.groq_configured);
        assert_eq!(health.status.as_deref(), Some("healthy"));

        let request = server.await.expect("server task should finish");
        assert!(request.starts_with("GET /health "));
    }
}
