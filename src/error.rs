//! Error types for the analysis request path.
//!
//! Every variant collapses to the same user-facing message; the variant and its
//! payload only ever reach the diagnostic log.

use thiserror::Error;

/// Message shown when the input is empty or whitespace only.
pub const VALIDATION_MESSAGE: &str = "Please enter some text to analyze";

/// Message shown for every remote or transport failure.
pub const FAILURE_MESSAGE: &str = "Failed to analyze text. Please check the console for details.";

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AnalyzeError {
    /// The service answered with `success: false`.
    #[error("Analysis failed: {0}")]
    Remote(String),

    /// The service answered with `success: true` but no `data` payload.
    #[error("Analysis failed: no result received")]
    MissingData,

    /// Non-2xx HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection, TLS or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the expected JSON envelope.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The task running the request died before reporting back.
    #[error("analysis task failed: {0}")]
    Internal(String),
}

impl AnalyzeError {
    /// Build a remote failure from the service's optional `error` field.
    pub fn remote(detail: Option<&str>) -> Self {
        let detail = detail
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("Unknown error");
        AnalyzeError::Remote(detail.to_string())
    }

    /// The only text a user ever sees for this error.
    pub fn user_message(&self) -> &'static str {
        FAILURE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_falls_back_to_unknown_error() {
        assert_eq!(
            AnalyzeError::remote(None).to_string(),
            "Analysis failed: Unknown error"
        );
        assert_eq!(
            AnalyzeError::remote(Some("  ")).to_string(),
            "Analysis failed: Unknown error"
        );
        assert_eq!(
            AnalyzeError::remote(Some("quota exceeded")).to_string(),
            "Analysis failed: quota exceeded"
        );
    }

    #[test]
    fn user_message_hides_detail() {
        let errs = [
            AnalyzeError::remote(Some("boom")),
            AnalyzeError::MissingData,
            AnalyzeError::Status {
                status: 500,
                body: "stack trace".into(),
            },
            AnalyzeError::Decode("eof".into()),
        ];
        for e in errs {
            assert_eq!(e.user_message(), FAILURE_MESSAGE);
        }
    }
}
