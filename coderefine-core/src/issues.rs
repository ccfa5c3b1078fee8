//! Issue list plus the active severity filter.

use crate::types::{Issue, Severity};

/// Severity filter selected by the user. Survives across result sets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeverityFilter {
    #[default]
    All,
    Critical,
    Warning,
    Info,
}

impl SeverityFilter {
    pub const ALL: [SeverityFilter; 4] = [
        SeverityFilter::All,
        SeverityFilter::Critical,
        SeverityFilter::Warning,
        SeverityFilter::Info,
    ];

    pub fn matches(self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Critical => severity == Severity::Critical,
            SeverityFilter::Warning => severity == Severity::Warning,
            SeverityFilter::Info => severity == Severity::Info,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityFilter::All => "All",
            SeverityFilter::Critical => "Critical",
            SeverityFilter::Warning => "Warning",
            SeverityFilter::Info => "Info",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SeverityFilter::All => SeverityFilter::Critical,
            SeverityFilter::Critical => SeverityFilter::Warning,
            SeverityFilter::Warning => SeverityFilter::Info,
            SeverityFilter::Info => SeverityFilter::All,
        }
    }
}

/// Icon shown next to an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityIcon {
    WarningTriangle,
    WarningCircle,
    InfoCircle,
}

impl SeverityIcon {
    pub fn for_severity(severity: Severity) -> Self {
        match severity {
            Severity::Critical => SeverityIcon::WarningTriangle,
            Severity::Warning => SeverityIcon::WarningCircle,
            Severity::Info | Severity::Unknown => SeverityIcon::InfoCircle,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            SeverityIcon::WarningTriangle => "▲",
            SeverityIcon::WarningCircle => "●",
            SeverityIcon::InfoCircle => "ⓘ",
        }
    }
}

/// The last-fetched issues and the current filter.
///
/// The list is only ever swapped wholesale; individual issues are never edited.
#[derive(Debug, Default, Clone)]
pub struct IssueBoard {
    issues: Vec<Issue>,
    filter: SeverityFilter,
}

impl IssueBoard {
    pub fn set_issues(&mut self, issues: Vec<Issue>) {
        self.issues = issues;
    }

    pub fn set_filter(&mut self, filter: SeverityFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> SeverityFilter {
        self.filter
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues matching the current filter, in received order.
    pub fn visible(&self) -> Vec<Issue> {
        self.issues
            .iter()
            .filter(|issue| self.filter.matches(issue.severity))
            .cloned()
            .collect()
    }

    /// Number of issues each filter would show, in [`SeverityFilter::ALL`] order.
    pub fn counts(&self) -> [(SeverityFilter, usize); 4] {
        SeverityFilter::ALL.map(|f| {
            (f, self.issues.iter().filter(|i| f.matches(i.severity)).count())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Issue> {
        vec![
            Issue::new("c1", Severity::Critical),
            Issue::new("w1", Severity::Warning),
            Issue::new("c2", Severity::Critical),
            Issue::new("i1", Severity::Info),
            Issue::new("u1", Severity::Unknown),
        ]
    }

    fn titles(issues: &[Issue]) -> Vec<&str> {
        issues.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn critical_filter_keeps_order() {
        let mut board = IssueBoard::default();
        board.set_issues(sample());
        board.set_filter(SeverityFilter::Critical);
        assert_eq!(titles(&board.visible()), vec!["c1", "c2"]);
    }

    #[test]
    fn all_filter_returns_full_list() {
        let mut board = IssueBoard::default();
        board.set_issues(sample());
        board.set_filter(SeverityFilter::Warning);
        board.set_filter(SeverityFilter::All);
        assert_eq!(board.visible(), sample());
    }

    #[test]
    fn filter_survives_new_issue_list() {
        let mut board = IssueBoard::default();
        board.set_filter(SeverityFilter::Info);
        board.set_issues(sample());
        assert_eq!(titles(&board.visible()), vec!["i1"]);
        board.set_issues(vec![Issue::new("w9", Severity::Warning)]);
        assert!(board.visible().is_empty());
        assert_eq!(board.filter(), SeverityFilter::Info);
    }

    #[test]
    fn counts_match_visible_lengths() {
        let mut board = IssueBoard::default();
        board.set_issues(sample());
        for (filter, count) in board.counts() {
            board.set_filter(filter);
            assert_eq!(board.visible().len(), count);
        }
    }

    #[test]
    fn icon_lookup() {
        assert_eq!(SeverityIcon::for_severity(Severity::Critical), SeverityIcon::WarningTriangle);
        assert_eq!(SeverityIcon::for_severity(Severity::Warning), SeverityIcon::WarningCircle);
        assert_eq!(SeverityIcon::for_severity(Severity::Info), SeverityIcon::InfoCircle);
        assert_eq!(SeverityIcon::for_severity(Severity::Unknown), SeverityIcon::InfoCircle);
    }
}
