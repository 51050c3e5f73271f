use crate::lifecycle::{FormState, LifecycleState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::Color,
    style::Style,
    text::{Line, Span},
};

pub const TAB_ANALYZE: usize = 0;
pub const TAB_HELP: usize = 1;
const TAB_COUNT: usize = 2;

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub form: FormState,
    pub endpoint: String,
    pub log_path: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TAB_ANALYZE,
            info: String::new(),
            form: FormState::new(),
            endpoint: String::new(),
            log_path: None,
        }
    }
}

/// What the UI loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Submit(String),
    Copy(String),
    Quit,
}

impl UiState {
    /// Apply a key press to local state and report any side effect to perform.
    pub fn on_key(&mut self, k: KeyEvent) -> KeyAction {
        match (k.modifiers, k.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Esc) => {
                return KeyAction::Quit;
            }
            (_, KeyCode::Tab) => {
                self.tab = (self.tab + 1) % TAB_COUNT;
                return KeyAction::None;
            }
            (_, KeyCode::F(1)) => {
                self.tab = TAB_HELP;
                return KeyAction::None;
            }
            _ => {}
        }

        if self.tab != TAB_ANALYZE {
            return KeyAction::None;
        }

        match (k.modifiers, k.code) {
            (m, KeyCode::Enter) if m.contains(KeyModifiers::ALT) => {
                self.form.push_char('\n');
            }
            (_, KeyCode::Enter) => {
                let was_loading = self.form.loading;
                match self.form.begin_submit() {
                    Some(text) => {
                        self.info = "Analyzing…".into();
                        return KeyAction::Submit(text);
                    }
                    None if was_loading => {
                        self.info = "Already analyzing; wait for the current request".into();
                    }
                    None => {}
                }
            }
            (_, KeyCode::Backspace) => self.form.pop_char(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.form.clear_input(),
            (KeyModifiers::CONTROL, KeyCode::Char('y')) => {
                if let LifecycleState::Succeeded(r) = self.form.lifecycle() {
                    return KeyAction::Copy(r.final_result.clone());
                }
                self.info = "No result to copy yet".into();
            }
            (m, KeyCode::Char(c)) if is_text_input(m) => {
                self.form.push_char(c);
            }
            _ => {}
        }
        KeyAction::None
    }
}

/// Plain or shifted characters, plus AltGr, which some platforms report as
/// Ctrl+Alt.
fn is_text_input(m: KeyModifiers) -> bool {
    let ctrl_alt = KeyModifiers::CONTROL | KeyModifiers::ALT;
    !m.intersects(ctrl_alt) || m.contains(ctrl_alt)
}

/// Status-bar variant: trims the value and skips it entirely when blank.
pub fn push_wrapped_status_kv(
    out: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    status_area_width: u16,
) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    push_wrapped_kv(out, label, value, status_area_width);
}

/// Push `label: value`, wrapping the value to the area width. The label line is
/// always emitted, even for an empty value.
pub fn push_wrapped_kv(out: &mut Vec<Line<'static>>, label: &str, value: &str, area_width: u16) {
    // Account for borders (2 chars on each side)
    let usable_width = usize::from(area_width.saturating_sub(4).max(1));
    let label_text = format!("{label}:");
    let label_width = label_text.chars().count();

    let value_chars: Vec<char> = value.chars().collect();
    let first_width = usable_width.saturating_sub(label_width + 1).max(1);
    let (head, mut remaining) = value_chars.split_at(value_chars.len().min(first_width));

    out.push(Line::from(vec![
        Span::styled(label_text, Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::raw(head.iter().collect::<String>()),
    ]));

    let line_width = usable_width.saturating_sub(2).max(1);
    while !remaining.is_empty() {
        let (line_chars, rest) = remaining.split_at(remaining.len().min(line_width));
        out.push(Line::from(vec![
            Span::raw("  "),
            Span::raw(line_chars.iter().collect::<String>()),
        ]));
        remaining = rest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VALIDATION_MESSAGE;
    use crate::model::{AnalysisResult, Confidence};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(state: &mut UiState, text: &str) {
        for c in text.chars() {
            assert_eq!(state.on_key(key(KeyCode::Char(c))), KeyAction::None);
        }
    }

    #[test]
    fn typing_and_enter_submits_input() {
        let mut state = UiState::default();
        type_text(&mut state, "I love this!");

        let action = state.on_key(key(KeyCode::Enter));

        assert_eq!(action, KeyAction::Submit("I love this!".into()));
        assert!(state.form.loading);
    }

    #[test]
    fn enter_on_blank_input_shows_validation_error() {
        let mut state = UiState::default();
        type_text(&mut state, "   ");

        assert_eq!(state.on_key(key(KeyCode::Enter)), KeyAction::None);
        assert_eq!(state.form.error, VALIDATION_MESSAGE);
        assert!(!state.form.loading);
    }

    #[test]
    fn enter_while_loading_does_not_resubmit() {
        let mut state = UiState::default();
        type_text(&mut state, "hi");
        assert!(matches!(state.on_key(key(KeyCode::Enter)), KeyAction::Submit(_)));

        assert_eq!(state.on_key(key(KeyCode::Enter)), KeyAction::None);
        assert!(state.info.contains("Already analyzing"));
    }

    #[test]
    fn alt_enter_inserts_newline() {
        let mut state = UiState::default();
        type_text(&mut state, "a");
        state.on_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        type_text(&mut state, "b");
        assert_eq!(state.form.input, "a\nb");
    }

    #[test]
    fn editing_keys() {
        let mut state = UiState::default();
        type_text(&mut state, "abc");
        state.on_key(key(KeyCode::Backspace));
        assert_eq!(state.form.input, "ab");
        state.on_key(ctrl('u'));
        assert_eq!(state.form.input, "");
    }

    #[test]
    fn quit_keys() {
        let mut state = UiState::default();
        assert_eq!(state.on_key(ctrl('c')), KeyAction::Quit);
        assert_eq!(state.on_key(key(KeyCode::Esc)), KeyAction::Quit);
    }

    #[test]
    fn help_tab_swallows_typing() {
        let mut state = UiState::default();
        state.on_key(key(KeyCode::Tab));
        assert_eq!(state.tab, TAB_HELP);
        type_text(&mut state, "x");
        assert_eq!(state.form.input, "");
        state.on_key(key(KeyCode::Tab));
        assert_eq!(state.tab, TAB_ANALYZE);
    }

    #[test]
    fn copy_requires_result() {
        let mut state = UiState::default();
        assert_eq!(state.on_key(ctrl('y')), KeyAction::None);
        assert_eq!(state.info, "No result to copy yet");

        state.form.result = Some(AnalysisResult {
            sentiment: "positive".into(),
            confidence: Confidence::Number(0.9),
            explanation: String::new(),
            final_result: "Positive sentiment detected".into(),
        });
        assert_eq!(
            state.on_key(ctrl('y')),
            KeyAction::Copy("Positive sentiment detected".into())
        );
    }

    #[test]
    fn wrapped_kv_splits_long_values() {
        let mut out = Vec::new();
        push_wrapped_status_kv(&mut out, "Endpoint", &"x".repeat(30), 20);
        assert!(out.len() > 1);

        let mut empty = Vec::new();
        push_wrapped_status_kv(&mut empty, "Endpoint", "   ", 20);
        assert!(empty.is_empty());
    }

    #[test]
    fn wrapped_kv_terminates_on_very_long_values() {
        let value = "x".repeat(65536);
        let mut out = Vec::new();
        push_wrapped_kv(&mut out, "Sentiment", &value, 80);

        let total: usize = out
            .iter()
            .map(|l| l.spans.last().map_or(0, |s| s.content.chars().count()))
            .sum();
        assert_eq!(total, value.len());
    }

    #[test]
    fn wrapped_kv_keeps_label_and_whitespace() {
        let mut out = Vec::new();
        push_wrapped_kv(&mut out, "Sentiment", "", 80);
        push_wrapped_kv(&mut out, "Confidence", " 0.9 ", 80);

        let rendered: Vec<String> = out
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(rendered, vec!["Sentiment: ", "Confidence:  0.9 "]);
    }

    #[test]
    fn altgr_characters_are_typed() {
        let mut state = UiState::default();
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        state.on_key(KeyEvent::new(KeyCode::Char('@'), altgr));
        state.on_key(KeyEvent::new(KeyCode::Char('{'), altgr));
        state.on_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT));
        state.on_key(ctrl('x'));
        assert_eq!(state.form.input, "@{");
    }
}
