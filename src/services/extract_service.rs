use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, warn};

pub const EXTRACTION_ERROR_TEXT: &str = "Error extracting resume content";
pub const NO_TEXT_FOUND_TEXT: &str = "No text could be extracted from resume";

/// Resume text extraction capability. Total by contract: a broken document
/// must not abort the screening of an otherwise valid application, so every
/// internal failure degrades to a diagnostic placeholder string.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, resume_url: &str) -> String;
}

#[derive(Clone)]
pub struct HttpTextExtractor {
    client: Client,
}

impl HttpTextExtractor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_and_extract(&self, resume_url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(resume_url)
            .timeout(Duration::from_secs(30))
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();
        let body = response.bytes().await?;

        if is_pdf(resume_url, &content_type, &body) {
            extract_pdf_text(body).await
        } else {
            Ok(String::from_utf8_lossy(&body).into_owned())
        }
    }
}

#[async_trait]
impl TextExtractor for HttpTextExtractor {
    async fn extract_text(&self, resume_url: &str) -> String {
        match self.fetch_and_extract(resume_url).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!(url = %resume_url, "Resume document contained no extractable text");
                NO_TEXT_FOUND_TEXT.to_string()
            }
            Err(e) => {
                error!(url = %resume_url, error = ?e, "Error extracting text from resume");
                EXTRACTION_ERROR_TEXT.to_string()
            }
        }
    }
}

fn is_pdf(url: &str, content_type: &str, body: &[u8]) -> bool {
    content_type.contains("application/pdf")
        || url.split('?').next().unwrap_or(url).ends_with(".pdf")
        || body.starts_with(b"%PDF")
}

/// pdf-extract is CPU bound and occasionally slow on scanned documents, so
/// it runs off the async runtime.
async fn extract_pdf_text(body: Bytes) -> anyhow::Result<String> {
    tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&body)
            .map_err(|e| anyhow::anyhow!("PDF extraction error: {}", e))
    })
    .await?
}
