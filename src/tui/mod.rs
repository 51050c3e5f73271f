mod clipboard;
mod help;
mod state;

use crate::cli::{build_config, log_target, Cli};
use crate::engine::{AnalysisBackend, HttpAnalysisClient};
use crate::lifecycle::LifecycleState;
use crate::logging::LogTarget;
use crate::model::{AnalysisResult, AppEvent};
use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{push_wrapped_kv, push_wrapped_status_kv, KeyAction, UiState, TAB_ANALYZE};
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

const INPUT_PLACEHOLDER: &str = "Type or paste your text here...";
const LOADING_TEXT: &str = "Analyzing... please wait.";

pub async fn run(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let backend: Arc<dyn AnalysisBackend> = Arc::new(HttpAnalysisClient::new(&cfg)?);

    // Unbounded channels avoid backpressure between the UI thread and the runtime.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let log_path = match log_target(&args) {
        LogTarget::File(p) => Some(p.display().to_string()),
        LogTarget::Off | LogTarget::Stderr => None,
    };
    let endpoint = cfg.endpoint.clone();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle =
        std::thread::spawn(move || run_threaded(endpoint, log_path, event_rx, cmd_tx));

    let res = orchestrator::run_controller(backend, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    endpoint: String,
    log_path: Option<String>,
    mut event_rx: UnboundedReceiver<AppEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState {
        endpoint,
        log_path,
        ..Default::default()
    };
    tracing::info!(endpoint = %state.endpoint, "tui started");

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match state.on_key(k) {
                    KeyAction::None => {}
                    KeyAction::Submit(text) => {
                        if cmd_tx.send(UiCommand::Submit(text)).is_err() {
                            // Controller is gone; nothing will ever answer this request.
                            break Err(anyhow::anyhow!("request controller stopped"));
                        }
                    }
                    KeyAction::Copy(text) => {
                        state.info = match clipboard::copy_to_clipboard(&text) {
                            Ok(()) => "✓ Copied final result to clipboard".into(),
                            Err(e) => format!("Clipboard copy failed: {e:#}"),
                        };
                    }
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn apply_event(state: &mut UiState, ev: AppEvent) {
    match ev {
        AppEvent::RequestStarted => {
            state.info = "Request sent".into();
        }
        AppEvent::Completed { outcome } => {
            state.form.finish(outcome);
            state.info = match state.form.lifecycle() {
                LifecycleState::Succeeded(_) => "Analysis complete".into(),
                LifecycleState::Failed(_) => match state.log_path.as_deref() {
                    Some(p) => format!("Request failed; details in {p}"),
                    None => "Request failed".into(),
                },
                LifecycleState::Idle | LifecycleState::Loading => String::new(),
            };
        }
        AppEvent::Info(info) => state.info = info.to_message(),
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ]
            .as_ref(),
        )
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Analyze"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("Text Analyzer"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_ANALYZE => draw_analyze(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f, state.log_path.as_deref()),
    }

    draw_status(chunks[2], f, state);
}

fn draw_analyze(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage(40), // Input
                Constraint::Length(3),      // Submit control
                Constraint::Min(0),         // Result / error
            ]
            .as_ref(),
        )
        .split(area);

    let input = input_lines(&state.form.input);
    let inner_height = rows[0].height.saturating_sub(2) as usize;
    let scroll = input.len().saturating_sub(inner_height) as u16;
    f.render_widget(
        Paragraph::new(input)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(Block::default().borders(Borders::ALL).title("Your Text")),
        rows[0],
    );

    let (label, style) = if state.form.loading {
        ("⏳ Analyzing...", Style::default().fg(Color::DarkGray))
    } else {
        (
            "✨ Analyze Text (Enter)",
            Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
        )
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(label, style)))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(style)),
        rows[1],
    );

    let (title, border) = match state.form.lifecycle() {
        LifecycleState::Idle => return,
        LifecycleState::Loading => ("Status", Color::Gray),
        LifecycleState::Failed(_) => ("Error", Color::Red),
        LifecycleState::Succeeded(_) => ("Analysis Result", Color::Blue),
    };
    f.render_widget(
        Paragraph::new(result_lines(state, rows[2].width))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title(title),
            ),
        rows[2],
    );
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    if !state.info.is_empty() {
        lines.push(Line::from(Span::styled(
            state.info.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }
    push_wrapped_status_kv(&mut lines, "Endpoint", &state.endpoint, area.width);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status")),
        area,
    );
}

/// Input text split into display lines, with a cursor block at the end.
fn input_lines(input: &str) -> Vec<Line<'static>> {
    if input.is_empty() {
        return vec![Line::from(vec![
            Span::styled("█", Style::default().fg(Color::Gray)),
            Span::styled(INPUT_PLACEHOLDER, Style::default().fg(Color::DarkGray)),
        ])];
    }
    let mut lines: Vec<Line<'static>> = input
        .split('\n')
        .map(|l| Line::from(l.to_string()))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.spans.push(Span::styled("█", Style::default().fg(Color::Gray)));
    }
    lines
}

/// Lines for the result region; exactly one of loading, error or result.
fn result_lines(state: &UiState, width: u16) -> Vec<Line<'static>> {
    match state.form.lifecycle() {
        LifecycleState::Idle => Vec::new(),
        LifecycleState::Loading => vec![Line::from(Span::styled(
            LOADING_TEXT,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ))],
        LifecycleState::Failed(msg) => vec![
            Line::from(Span::styled(
                "Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Red))),
        ],
        LifecycleState::Succeeded(r) => success_lines(r, width),
    }
}

fn success_lines(r: &AnalysisResult, width: u16) -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();
    push_wrapped_kv(&mut lines, "Sentiment", &r.sentiment, width);
    push_wrapped_kv(&mut lines, "Confidence", &r.confidence.to_string(), width);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Explanation:", heading)));
    lines.extend(r.explanation.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Final Result:",
        heading.fg(Color::LightBlue),
    )));
    lines.extend(
        r.final_result
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Cyan)))),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AnalyzeError, FAILURE_MESSAGE};
    use crate::model::{AnalyzeResponse, Confidence, InfoEvent};

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn loading_state() -> UiState {
        let mut state = UiState::default();
        state.form.update_input("I love this!");
        assert!(state.form.begin_submit().is_some());
        state
    }

    #[test]
    fn loading_shows_only_the_wait_message() {
        let state = loading_state();
        assert_eq!(text(&result_lines(&state, 80)), vec![LOADING_TEXT]);
    }

    #[test]
    fn completed_success_renders_fields_verbatim() {
        let mut state = loading_state();
        apply_event(
            &mut state,
            AppEvent::Completed {
                outcome: Ok(AnalyzeResponse {
                    success: true,
                    data: Some(AnalysisResult {
                        sentiment: "positive".into(),
                        confidence: Confidence::Text("0.95".into()),
                        explanation: "...".into(),
                        final_result: "Positive sentiment detected".into(),
                    }),
                    error: None,
                }),
            },
        );

        assert!(!state.form.loading);
        assert_eq!(state.info, "Analysis complete");
        let rendered = text(&result_lines(&state, 80));
        assert_eq!(
            rendered,
            vec![
                "Sentiment: positive",
                "Confidence: 0.95",
                "",
                "Explanation:",
                "...",
                "",
                "Final Result:",
                "Positive sentiment detected",
            ]
        );
    }

    #[test]
    fn blank_fields_keep_their_labels() {
        let r = AnalysisResult {
            sentiment: String::new(),
            confidence: Confidence::Text(String::new()),
            explanation: String::new(),
            final_result: String::new(),
        };
        let rendered = text(&success_lines(&r, 80));
        assert_eq!(rendered[0], "Sentiment: ");
        assert_eq!(rendered[1], "Confidence: ");
        assert!(rendered.iter().any(|l| l == "Explanation:"));
        assert!(rendered.iter().any(|l| l == "Final Result:"));
    }

    #[test]
    fn completed_failure_renders_generic_error() {
        let mut state = loading_state();
        state.log_path = Some("/tmp/text-analyzer.log".into());
        apply_event(
            &mut state,
            AppEvent::Completed {
                outcome: Err(AnalyzeError::Status {
                    status: 500,
                    body: "boom".into(),
                }),
            },
        );

        assert!(!state.form.loading);
        assert_eq!(text(&result_lines(&state, 80)), vec!["Error", FAILURE_MESSAGE]);
        assert!(state.info.contains("/tmp/text-analyzer.log"));
    }

    #[test]
    fn info_event_updates_status() {
        let mut state = UiState::default();
        apply_event(&mut state, AppEvent::Info(InfoEvent::SubmitIgnored));
        assert!(state.info.contains("already in flight"));
    }

    #[test]
    fn input_lines_show_placeholder_then_text() {
        assert!(text(&input_lines(""))[0].contains(INPUT_PLACEHOLDER));
        assert_eq!(text(&input_lines("a\nb")), vec!["a", "b█"]);
    }
}
