use super::AnalysisBackend;
use crate::error::AnalyzeError;
use crate::model::{AnalyzeRequest, AnalyzeResponse, RunConfig};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Url;

/// Upper bound on how much of an error body is kept for the log.
const MAX_ERROR_BODY_CHARS: usize = 512;

pub struct HttpAnalysisClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpAnalysisClient {
    pub fn new(cfg: &RunConfig) -> Result<Self> {
        let endpoint = Url::parse(&cfg.endpoint)
            .with_context(|| format!("invalid endpoint URL: {}", cfg.endpoint))?;

        let mut builder = reqwest::Client::builder().user_agent(cfg.user_agent.clone());
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;

        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn analyze(&self, text: &str) -> Result<AnalyzeResponse, AnalyzeError> {
        let body = AnalyzeRequest {
            text_to_analyze: text.to_string(),
        };
        tracing::debug!(
            endpoint = %self.endpoint,
            chars = text.chars().count(),
            "posting analysis request"
        );

        let resp = self
            .http
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let raw = resp.text().await?;

        if !status.is_success() {
            return Err(AnalyzeError::Status {
                status: status.as_u16(),
                body: truncate(&raw, MAX_ERROR_BODY_CHARS),
            });
        }

        serde_json::from_str::<AnalyzeResponse>(&raw)
            .map_err(|e| AnalyzeError::Decode(e.to_string()))
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}
