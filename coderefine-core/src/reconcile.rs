//! Maps a review response onto every dependent view region in one pass.
//!
//! The reconciler never touches a screen. All writes go through a
//! [`RenderPort`], which the terminal app implements on its view model and the
//! tests implement with a recording struct.

use crate::format::{format_explanation, Markup};
use crate::issues::{IssueBoard, SeverityFilter};
use crate::score::{present, ScorePresentation};
use crate::types::{Issue, ReviewResult, Severity};

/// Text shown when the service left a value out.
pub const PLACEHOLDER: &str = "—";

/// Named text regions written by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    DetectedLanguage,
    LineCount,
    Complexity,
    ComplexityReduction,
    QualityScore,
    SecurityScore,
    PerformanceScore,
    MaintainabilityScore,
    /// Optimized code in the result pane.
    OptimizedCode,
    /// Left side of the diff: the code that was submitted.
    DiffOriginal,
    /// Right side of the diff: the optimized code.
    DiffOptimized,
    LinesReduced,
    IssuesFixed,
}

/// Sink for every UI mutation the reconciler performs.
pub trait RenderPort {
    fn set_text(&mut self, region: Region, value: String);
    /// `None` when the response carried no quality score.
    fn set_score(&mut self, score: Option<ScorePresentation>);
    /// The issues visible under the current filter, in order.
    fn set_issues(&mut self, visible: &[Issue]);
    fn set_explanation(&mut self, markup: Markup);
}

/// Owns the view state that outlives a single response: the issue list and
/// the severity filter.
#[derive(Debug, Default)]
pub struct Reconciler {
    board: IssueBoard,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self) -> &IssueBoard {
        &self.board
    }

    /// Applies a freshly received response to every region.
    pub fn reconcile<P: RenderPort>(
        &mut self,
        response: &ReviewResult,
        original_code: &str,
        port: &mut P,
    ) {
        port.set_text(
            Region::DetectedLanguage,
            text_or_placeholder(response.detected_language.as_deref()),
        );
        port.set_text(
            Region::LineCount,
            response
                .line_count
                .map(|n| n.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_owned()),
        );
        port.set_text(
            Region::Complexity,
            text_or_placeholder(response.complexity.as_deref()),
        );
        port.set_text(
            Region::ComplexityReduction,
            text_or_placeholder(response.complexity_reduction.as_deref()),
        );

        port.set_text(Region::SecurityScore, percent(response.security_score));
        port.set_text(Region::PerformanceScore, percent(response.performance_score));
        port.set_text(
            Region::MaintainabilityScore,
            percent(response.maintainability_score),
        );

        let score = response.quality_score.map(present);
        port.set_text(
            Region::QualityScore,
            score
                .map(|s| format!("{:.0}", s.score))
                .unwrap_or_else(|| PLACEHOLDER.to_owned()),
        );
        port.set_score(score);

        self.board.set_issues(response.issues.clone());
        port.set_issues(&self.board.visible());

        port.set_text(Region::OptimizedCode, response.optimized_code.clone());
        port.set_text(Region::DiffOptimized, response.optimized_code.clone());
        port.set_text(Region::DiffOriginal, original_code.to_owned());

        port.set_text(
            Region::LinesReduced,
            lines_reduced_label(original_code, &response.optimized_code),
        );
        port.set_text(
            Region::IssuesFixed,
            critical_count(&response.issues).to_string(),
        );

        port.set_explanation(format_explanation(&response.explanation));
    }

    /// Changes the severity filter and re-renders the issue list only.
    pub fn set_filter<P: RenderPort>(&mut self, filter: SeverityFilter, port: &mut P) {
        self.board.set_filter(filter);
        port.set_issues(&self.board.visible());
    }
}

fn text_or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_owned(),
        _ => PLACEHOLDER.to_owned(),
    }
}

/// Sub-score label. Zero is a real score; only a missing value is a placeholder.
fn percent(score: Option<f64>) -> String {
    match score {
        Some(s) if s.is_finite() => format!("{:.0}%", s),
        _ => PLACEHOLDER.to_owned(),
    }
}

/// Number of lines as a browser `split('\n')` would count them; `""` is one line.
pub fn line_count(code: &str) -> usize {
    code.split('\n').count()
}

/// `-N` when the optimized code is N lines shorter, otherwise `0`.
pub fn lines_reduced_label(original: &str, optimized: &str) -> String {
    let reduced = line_count(original) as i64 - line_count(optimized) as i64;
    if reduced > 0 {
        format!("-{reduced}")
    } else {
        "0".to_owned()
    }
}

/// Critical issues in a response; displayed as "issues fixed".
pub fn critical_count(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Recorder {
        texts: BTreeMap<Region, String>,
        score: Option<ScorePresentation>,
        issues: Vec<Issue>,
        issue_renders: usize,
        explanation: Markup,
    }

    impl RenderPort for Recorder {
        fn set_text(&mut self, region: Region, value: String) {
            self.texts.insert(region, value);
        }
        fn set_score(&mut self, score: Option<ScorePresentation>) {
            self.score = score;
        }
        fn set_issues(&mut self, visible: &[Issue]) {
            self.issues = visible.to_vec();
            self.issue_renders += 1;
        }
        fn set_explanation(&mut self, markup: Markup) {
            self.explanation = markup;
        }
    }

    fn response() -> ReviewResult {
        ReviewResult {
            detected_language: Some("Python".into()),
            quality_score: Some(83.0),
            security_score: Some(70.0),
            performance_score: Some(100.0),
            maintainability_score: Some(0.0),
            line_count: Some(3),
            complexity: Some("Low".into()),
            complexity_reduction: Some("33.3%".into()),
            issues: vec![
                Issue::new("eval", Severity::Critical),
                Issue::new("tabs", Severity::Warning),
            ],
            optimized_code: "a\nb".into(),
            explanation: "**Summary**\n\n- fixed eval".into(),
        }
    }

    #[test]
    fn reconcile_fills_every_region() {
        let mut port = Recorder::default();
        Reconciler::new().reconcile(&response(), "a\nb\nc", &mut port);

        assert_eq!(port.texts[&Region::DetectedLanguage], "Python");
        assert_eq!(port.texts[&Region::LineCount], "3");
        assert_eq!(port.texts[&Region::Complexity], "Low");
        assert_eq!(port.texts[&Region::SecurityScore], "70%");
        assert_eq!(port.texts[&Region::PerformanceScore], "100%");
        assert_eq!(port.texts[&Region::QualityScore], "83");
        assert_eq!(port.texts[&Region::OptimizedCode], "a\nb");
        assert_eq!(port.texts[&Region::DiffOptimized], "a\nb");
        assert_eq!(port.texts[&Region::DiffOriginal], "a\nb\nc");
        assert_eq!(port.texts[&Region::LinesReduced], "-1");
        assert_eq!(port.texts[&Region::IssuesFixed], "1");
        assert_eq!(port.score.map(|s| s.grade), Some("A"));
        assert_eq!(port.issues.len(), 2);
        assert_eq!(
            port.explanation.to_html(),
            "<h4>Summary</h4><ul><li>fixed eval</li></ul>"
        );
    }

    #[test]
    fn zero_sub_score_is_shown_as_zero() {
        let mut port = Recorder::default();
        Reconciler::new().reconcile(&response(), "", &mut port);
        assert_eq!(port.texts[&Region::MaintainabilityScore], "0%");
    }

    #[test]
    fn missing_fields_degrade_to_placeholders() {
        let mut port = Recorder::default();
        Reconciler::new().reconcile(&ReviewResult::default(), "x", &mut port);
        assert_eq!(port.texts[&Region::DetectedLanguage], PLACEHOLDER);
        assert_eq!(port.texts[&Region::SecurityScore], PLACEHOLDER);
        assert_eq!(port.texts[&Region::QualityScore], PLACEHOLDER);
        assert_eq!(port.texts[&Region::LineCount], PLACEHOLDER);
        assert!(port.score.is_none());
        assert!(port.issues.is_empty());
        assert_eq!(port.texts[&Region::IssuesFixed], "0");
        assert!(port.explanation.is_empty());
    }

    #[test]
    fn lines_reduced_is_never_negative() {
        assert_eq!(lines_reduced_label("a\nb\nc", "a\nb"), "-1");
        assert_eq!(lines_reduced_label("a", "a\nb\nc"), "0");
        assert_eq!(lines_reduced_label("a\nb", "c\nd"), "0");
    }

    #[test]
    fn filter_applies_to_next_response() {
        let mut port = Recorder::default();
        let mut reconciler = Reconciler::new();
        reconciler.set_filter(SeverityFilter::Warning, &mut port);
        assert!(port.issues.is_empty());

        reconciler.reconcile(&response(), "", &mut port);
        assert_eq!(port.issues, vec![Issue::new("tabs", Severity::Warning)]);

        reconciler.set_filter(SeverityFilter::All, &mut port);
        assert_eq!(port.issues.len(), 2);
        assert_eq!(port.issue_renders, 3);
    }

    #[test]
    fn displayed_count_matches_filter() {
        let mut port = Recorder::default();
        let mut reconciler = Reconciler::new();
        reconciler.reconcile(&response(), "", &mut port);
        for filter in SeverityFilter::ALL {
            reconciler.set_filter(filter, &mut port);
            let expected = reconciler
                .board()
                .issues()
                .iter()
                .filter(|i| filter.matches(i.severity))
                .count();
            assert_eq!(port.issues.len(), expected);
        }
    }
}
