//! Review panel: quality gauge, sub-scores, stats, severity filter bar and
//! the filtered issue list.
//!
//! Everything shown here comes from `AppState::view`, which only the
//! reconciler writes.

use coderefine_core::Region;
use coderefine_core::issues::{SeverityFilter, SeverityIcon};
use coderefine_core::reconcile::PLACEHOLDER;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};

/// Renders the Review panel.
///
/// The gauge row is fixed; everything below it scrolls with `review_scroll`.
/// The content height is cached into `state` for `G` and page scrolling.
pub fn render_review(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let is_focused = state.focus == PanelFocus::Review;
    frame.render_widget(panel_block(" Review ", is_focused, theme), area);

    let inner = inner_rect(area);
    let [gauge_area, _, body_area] = inner.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ]));

    render_gauge(frame, gauge_area, state, theme);

    let lines = body_lines(state, theme);
    let content_height = lines.len();
    let scroll = state.review_scroll.min(lines.len().saturating_sub(1));
    frame.render_widget(
        Paragraph::new(lines).scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0)),
        body_area,
    );
    state.review_content_height = content_height;
    state.review_viewport_height = body_area.height;
}

/// Horizontal stand-in for the score ring: fill is the ring's filled fraction,
/// colored by grade.
fn render_gauge(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let gauge = match state.view.score {
        Some(score) => Gauge::default()
            .ratio(score.fill_fraction().clamp(0.0, 1.0))
            .label(format!("{:.0} · {}", score.score, score.grade))
            .gauge_style(
                Style::default()
                    .fg(theme.grade(score.color))
                    .bg(theme.status_bar_bg)
                    .add_modifier(Modifier::BOLD),
            ),
        None => Gauge::default()
            .ratio(0.0)
            .label(PLACEHOLDER)
            .gauge_style(Style::default().fg(theme.muted).bg(theme.status_bar_bg)),
    };
    frame.render_widget(gauge, area);
}

fn stat<'a>(label: &'a str, value: &'a str, theme: &Theme) -> [Span<'a>; 2] {
    [
        Span::styled(format!("{label} "), Style::default().fg(theme.muted)),
        Span::styled(
            format!("{value}  "),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]
}

fn body_lines<'a>(state: &'a AppState, theme: &Theme) -> Vec<Line<'a>> {
    let view = &state.view;
    let row = |pairs: &[(&'a str, Region)]| {
        Line::from(
            pairs
                .iter()
                .flat_map(|(label, region)| stat(*label, view.text(*region), theme))
                .collect::<Vec<_>>(),
        )
    };

    let mut lines = vec![
        row(&[
            ("Language", Region::DetectedLanguage),
            ("Lines", Region::LineCount),
        ]),
        row(&[
            ("Complexity", Region::Complexity),
            ("Reduction", Region::ComplexityReduction),
        ]),
        row(&[
            ("Security", Region::SecurityScore),
            ("Performance", Region::PerformanceScore),
        ]),
        row(&[("Maintainability", Region::MaintainabilityScore)]),
        row(&[
            ("Lines reduced", Region::LinesReduced),
            ("Critical fixed", Region::IssuesFixed),
        ]),
    ];

    if view.has_result() {
        let stats = state.panes.stats;
        lines.push(Line::from(vec![
            Span::styled("Diff ", Style::default().fg(theme.muted)),
            Span::styled(format!("+{} ", stats.added), Style::default().fg(theme.diff_added)),
            Span::styled(format!("-{}", stats.removed), Style::default().fg(theme.diff_removed)),
        ]));
    }

    lines.push(Line::default());
    lines.push(filter_bar(state, theme));
    lines.push(Line::default());

    if view.issues.is_empty() {
        let msg = if !view.has_result() {
            "No review yet."
        } else if state.reconciler.board().issues().is_empty() {
            "No issues found."
        } else {
            "No issues match this filter."
        };
        lines.push(Line::styled(msg, Style::default().fg(theme.muted)));
        return lines;
    }

    for issue in &view.issues {
        let color = theme.severity(issue.severity);
        let mut head = vec![
            Span::styled(
                format!("{} ", SeverityIcon::for_severity(issue.severity).glyph()),
                Style::default().fg(color),
            ),
            Span::styled(
                issue.title.as_str(),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(location) = issue.location {
            head.push(Span::styled(
                format!("  line {location}"),
                Style::default().fg(theme.muted),
            ));
        }
        lines.push(Line::from(head));
        for desc in issue.description.lines().filter(|l| !l.trim().is_empty()) {
            lines.push(Line::styled(
                format!("  {desc}"),
                Style::default().fg(theme.muted),
            ));
        }
    }
    lines
}

/// `[1] All (n)  [2] Critical (n) ...` with the active filter highlighted.
fn filter_bar<'a>(state: &AppState, theme: &Theme) -> Line<'a> {
    let active = state.reconciler.board().filter();
    let spans = state
        .reconciler
        .board()
        .counts()
        .into_iter()
        .zip(1..)
        .flat_map(|((filter, count), key)| {
            let style = if filter == active {
                Style::default()
                    .fg(theme.selected)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(filter_color(filter, theme))
            };
            [
                Span::styled(format!("{key}:{} ({count})", filter.label()), style),
                Span::raw(" "),
            ]
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

fn filter_color(filter: SeverityFilter, theme: &Theme) -> ratatui::style::Color {
    match filter {
        SeverityFilter::All => theme.text,
        SeverityFilter::Critical => theme.badge_critical,
        SeverityFilter::Warning => theme.badge_warning,
        SeverityFilter::Info => theme.badge_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderefine_core::types::{Issue, ReviewResult, Severity};
    use uuid::Uuid;

    use crate::review::types::{HighlightedPanes, ReviewPayload};

    fn text_of(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn before_first_review_everything_is_placeholder() {
        let state = AppState::default();
        let lines = text_of(&body_lines(&state, &Theme::dark()));
        assert!(lines[0].contains("Language —"));
        assert!(lines.iter().any(|l| l == "No review yet."));
    }

    #[test]
    fn issues_render_with_icon_and_location() {
        let mut state = AppState::default();
        let mut issue = Issue::new("Dangerous eval", Severity::Critical);
        issue.location = Some(12);
        issue.description = "Avoid eval.".into();
        state.apply_review(ReviewPayload {
            id: Uuid::new_v4(),
            original_code: "x".into(),
            outcome: Ok(ReviewResult {
                issues: vec![issue, Issue::new("Naming", Severity::Info)],
                ..ReviewResult::default()
            }),
            panes: HighlightedPanes::default(),
        });

        let lines = text_of(&body_lines(&state, &Theme::dark()));
        assert!(lines.iter().any(|l| l == "▲ Dangerous eval  line 12"));
        assert!(lines.iter().any(|l| l == "  Avoid eval."));
        assert!(lines.iter().any(|l| l.starts_with("1:All (2) 2:Critical (1)")));

        state.set_filter(SeverityFilter::Warning);
        let lines = text_of(&body_lines(&state, &Theme::dark()));
        assert!(lines.iter().any(|l| l == "No issues match this filter."));
    }
}
