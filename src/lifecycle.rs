//! Request lifecycle controller.
//!
//! Owns the form state (input, result, loading flag, error message) and the
//! transitions between idle, loading, error and success. Transitions are plain
//! methods on [`FormState`] so presentation layers can drive them from their
//! own event loops; [`FormState::submit`] composes them around one backend call.

use crate::engine::AnalysisBackend;
use crate::error::{AnalyzeError, VALIDATION_MESSAGE};
use crate::model::{AnalysisResult, AnalyzeResponse};

/// What the result region should currently display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifecycleState<'a> {
    Idle,
    Loading,
    Failed(&'a str),
    Succeeded(&'a AnalysisResult),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub input: String,
    pub result: Option<AnalysisResult>,
    pub loading: bool,
    pub error: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Validate and enter the loading state.
    ///
    /// Returns the text to send, or `None` when no request should be made:
    /// either one is already in flight or the input is blank (in which case
    /// the validation message is set).
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.loading {
            tracing::warn!("submit ignored: request already in flight");
            return None;
        }
        if self.input.trim().is_empty() {
            self.error = VALIDATION_MESSAGE.to_string();
            return None;
        }

        self.loading = true;
        self.error.clear();
        self.result = None;
        Some(self.input.clone())
    }

    /// Apply the outcome of the backend call and leave the loading state.
    pub fn finish(&mut self, outcome: Result<AnalyzeResponse, AnalyzeError>) {
        match outcome.and_then(accept_response) {
            Ok(result) => {
                tracing::info!(sentiment = %result.sentiment, "analysis succeeded");
                self.result = Some(result);
            }
            Err(e) => {
                tracing::error!(error = %e, "analysis failed");
                self.error = e.user_message().to_string();
            }
        }
        self.loading = false;
    }

    /// Run one full submit: validate, call the backend once, record the outcome.
    pub async fn submit<B>(&mut self, backend: &B)
    where
        B: AnalysisBackend + ?Sized,
    {
        let Some(text) = self.begin_submit() else {
            return;
        };
        let outcome = backend.analyze(&text).await;
        self.finish(outcome);
    }

    pub fn lifecycle(&self) -> LifecycleState<'_> {
        if self.loading {
            LifecycleState::Loading
        } else if !self.error.is_empty() {
            LifecycleState::Failed(&self.error)
        } else if let Some(r) = self.result.as_ref() {
            LifecycleState::Succeeded(r)
        } else {
            LifecycleState::Idle
        }
    }
}

/// Map a decoded envelope to a result, treating `success: false` and a
/// missing `data` payload as remote failures.
fn accept_response(resp: AnalyzeResponse) -> Result<AnalysisResult, AnalyzeError> {
    if !resp.success {
        return Err(AnalyzeError::remote(resp.error.as_deref()));
    }
    resp.data.ok_or(AnalyzeError::MissingData)
}
