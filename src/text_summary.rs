//! Text summary builder for CLI output.
//!
//! Formats an analysis result as human-readable lines for text mode.

use crate::model::AnalysisResult;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary from a successful analysis. Field values are printed verbatim.
pub(crate) fn build_text_summary(result: &AnalysisResult) -> TextSummary {
    let mut lines = Vec::new();

    lines.push(format!("Sentiment: {}", result.sentiment));
    lines.push(format!("Confidence: {}", result.confidence));
    lines.push(String::new());
    lines.push("Explanation:".to_string());
    lines.extend(result.explanation.lines().map(|l| format!("  {l}")));
    lines.push(String::new());
    lines.push("Final Result:".to_string());
    lines.extend(result.final_result.lines().map(|l| format!("  {l}")));

    TextSummary { lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Confidence;

    #[test]
    fn prints_all_four_fields_verbatim() {
        let summary = build_text_summary(&AnalysisResult {
            sentiment: "positive".into(),
            confidence: Confidence::Text("0.95".into()),
            explanation: "...".into(),
            final_result: "Positive sentiment detected".into(),
        });

        assert_eq!(
            summary.lines,
            vec![
                "Sentiment: positive",
                "Confidence: 0.95",
                "",
                "Explanation:",
                "  ...",
                "",
                "Final Result:",
                "  Positive sentiment detected",
            ]
        );
    }

    #[test]
    fn multiline_explanation_is_indented() {
        let summary = build_text_summary(&AnalysisResult {
            explanation: "line one\nline two".into(),
            ..Default::default()
        });
        assert!(summary.lines.contains(&"  line one".to_string()));
        assert!(summary.lines.contains(&"  line two".to_string()));
    }
}
