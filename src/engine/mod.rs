mod http;

pub use http::HttpAnalysisClient;

use crate::error::AnalyzeError;
use crate::model::AnalyzeResponse;
use async_trait::async_trait;

/// The remote collaborator that turns text into an analysis.
///
/// Implementations make exactly one request per call and never retry.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<AnalyzeResponse, AnalyzeError>;
}
