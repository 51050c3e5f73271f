use crate::error::AnalyzeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Serialized only for the debug log, so it reads like a config file.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub endpoint: String,
    pub user_agent: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

/// Request body sent to the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub text_to_analyze: String,
}

/// Response envelope returned by the analysis endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<AnalysisResult>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(default)]
    pub sentiment: String,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub final_result: String,
}

/// Confidence score as sent by the service; some deployments send a number,
/// others a preformatted string. Rendered verbatim either way.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Confidence {
    Number(f64),
    Text(String),
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::Text(String::new())
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Number(n) => write!(f, "{n}"),
            Confidence::Text(s) => f.write_str(s),
        }
    }
}

/// Events sent from the orchestrator to presentation layers.
#[derive(Debug)]
pub enum AppEvent {
    RequestStarted,
    Completed {
        outcome: Result<AnalyzeResponse, AnalyzeError>,
    },
    Info(InfoEvent),
}

/// Structured info events consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Message(String),
    SubmitIgnored,
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::SubmitIgnored => {
                "A request is already in flight; wait for it to finish".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

/// Machine-readable summary of one analysis, printed by `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub completed_at_utc: String,
    pub endpoint: String,
    pub input: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
    #[serde(default)]
    pub error: Option<String>,
}
