//! Request lifecycle orchestration.
//!
//! Runs at most one analysis request at a time on behalf of the UI and emits
//! events for presentation layers.

use crate::engine::AnalysisBackend;
use crate::error::AnalyzeError;
use crate::model::{AnalyzeResponse, AppEvent, InfoEvent};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Commands emitted by UI layers.
#[derive(Debug, Clone)]
pub(crate) enum UiCommand {
    Submit(String),
    Quit,
}

/// Internal handle for the in-flight request task.
struct RequestCtx {
    handle: Option<JoinHandle<Result<AnalyzeResponse, AnalyzeError>>>,
}

fn start_request(backend: Arc<dyn AnalysisBackend>, text: String) -> RequestCtx {
    let handle = tokio::spawn(async move { backend.analyze(&text).await });
    RequestCtx {
        handle: Some(handle),
    }
}

/// Serve UI commands until `Quit` or until the command channel closes.
pub(crate) async fn run_controller(
    backend: Arc<dyn AnalysisBackend>,
    event_tx: UnboundedSender<AppEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut in_flight: Option<RequestCtx> = None;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Submit(text)) => {
                        if in_flight.is_some() {
                            tracing::warn!("submit received while a request is in flight; ignoring");
                            let _ = event_tx.send(AppEvent::Info(InfoEvent::SubmitIgnored));
                            continue;
                        }
                        in_flight = Some(start_request(backend.clone(), text));
                        let _ = event_tx.send(AppEvent::RequestStarted);
                    }
                    Some(UiCommand::Quit) | None => {
                        if let Some(h) = in_flight.as_mut().and_then(|ctx| ctx.handle.take()) {
                            tracing::debug!("aborting in-flight request on shutdown");
                            h.abort();
                        }
                        break;
                    }
                }
            }
            // Do not take the JoinHandle before this branch wins; otherwise it can be dropped
            // if the command branch is chosen, and we'll never observe completion.
            maybe_done = async {
                if let Some(ctx) = &mut in_flight {
                    if let Some(h) = ctx.handle.as_mut() {
                        return Some(h.await);
                    }
                }
                futures::future::pending().await
            } => {
                if let Some(join_res) = maybe_done {
                    in_flight = None;
                    let outcome = match join_res {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            let _ = event_tx.send(AppEvent::Info(InfoEvent::Message(format!(
                                "Request task failed: {e}"
                            ))));
                            Err(AnalyzeError::Internal(e.to_string()))
                        }
                    };
                    let _ = event_tx.send(AppEvent::Completed { outcome });
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct SlowBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisBackend for SlowBackend {
        async fn analyze(&self, _text: &str) -> Result<AnalyzeResponse, AnalyzeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err(AnalyzeError::remote(None))
        }
    }

    #[tokio::test]
    async fn overlapping_submit_is_ignored_and_outcome_is_delivered() {
        let backend = Arc::new(SlowBackend {
            calls: AtomicUsize::new(0),
        });
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        let ctrl = tokio::spawn(run_controller(backend.clone(), event_tx, cmd_rx));
        cmd_tx.send(UiCommand::Submit("first".into())).unwrap();
        cmd_tx.send(UiCommand::Submit("second".into())).unwrap();

        let mut ignored = 0;
        let mut started = 0;
        loop {
            match event_rx.recv().await.unwrap() {
                AppEvent::RequestStarted => started += 1,
                AppEvent::Info(InfoEvent::SubmitIgnored) => ignored += 1,
                AppEvent::Completed { outcome } => {
                    assert!(matches!(outcome, Err(AnalyzeError::Remote(_))));
                    break;
                }
                AppEvent::Info(_) => {}
            }
        }

        cmd_tx.send(UiCommand::Quit).unwrap();
        ctrl.await.unwrap().unwrap();

        assert_eq!(started, 1);
        assert_eq!(ignored, 1);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn closed_command_channel_stops_controller() {
        let backend = Arc::new(SlowBackend {
            calls: AtomicUsize::new(0),
        });
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
        drop(cmd_tx);

        run_controller(backend, event_tx, cmd_rx).await.unwrap();
    }
}
