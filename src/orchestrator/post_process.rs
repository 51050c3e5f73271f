//! Post-request processing.
//!
//! Turns a settled form state into the report printed by `--json`.

use crate::lifecycle::{FormState, LifecycleState};
use crate::model::{AnalysisReport, ReportStatus};

/// Build a report from a form whose request has settled.
pub(crate) fn build_report(endpoint: &str, form: &FormState) -> AnalysisReport {
    let (status, result, error) = match form.lifecycle() {
        LifecycleState::Succeeded(r) => (ReportStatus::Success, Some(r.clone()), None),
        LifecycleState::Failed(msg) => (ReportStatus::Error, None, Some(msg.to_string())),
        // A settled form is never loading; an idle one produced nothing.
        LifecycleState::Idle | LifecycleState::Loading => (ReportStatus::Error, None, None),
    };

    AnalysisReport {
        completed_at_utc: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "now".into()),
        endpoint: endpoint.to_string(),
        input: form.input.clone(),
        status,
        result,
        error,
    }
}
