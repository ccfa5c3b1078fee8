//! Wire and domain types shared by the client, the reconciler and the terminal app.
//!
//! Field names follow the review service's snake_case JSON contract. Every field
//! of [`ReviewResult`] is optional on the wire so a partial response still
//! renders (missing values become placeholders downstream).

use serde::{Deserialize, Deserializer, Serialize};

/// Classification of a reported issue.
///
/// Unrecognised strings are kept as `Unknown` rather than failing the whole
/// response; they are only shown under the `all` filter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Severity {
    Critical,
    Warning,
    #[default]
    Info,
    Unknown,
}

impl From<String> for Severity {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "critical" => Severity::Critical,
            "warning" => Severity::Warning,
            "info" => Severity::Info,
            _ => Severity::Unknown,
        }
    }
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
            Severity::Unknown => "unknown",
        }
    }
}

/// One finding returned by the review service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIssue")]
pub struct Issue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// 1-based line number the issue points at, when the service provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<u32>,
}

impl Issue {
    pub fn new(title: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            severity,
            location: None,
        }
    }
}

/// Accepted shapes of an issue entry.
///
/// The minimal backend reports issues as bare strings; the extended one sends
/// objects whose `location` is a string holding a line number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIssue {
    Full {
        #[serde(default, deserialize_with = "null_as_default")]
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        description: String,
        #[serde(default, deserialize_with = "null_as_default")]
        severity: Severity,
        #[serde(default, deserialize_with = "deserialize_location")]
        location: Option<u32>,
    },
    Bare(String),
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        match raw {
            RawIssue::Full {
                title,
                description,
                severity,
                location,
            } => Issue {
                title,
                description,
                severity,
                location,
            },
            RawIssue::Bare(title) => Issue::new(title, Severity::Info),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLocation {
    Line(u32),
    Text(String),
}

fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawLocation> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawLocation::Line(n)) => Some(n),
        Some(RawLocation::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `null` list is empty, and `null` entries inside it are dropped.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let raw = Option::<Vec<Option<T>>>::deserialize(deserializer)?;
    Ok(raw.into_iter().flatten().flatten().collect())
}

/// Source language hint sent with a review request.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Auto,
    Python,
    Javascript,
    Typescript,
    Java,
    Cpp,
    C,
    Csharp,
    Go,
    Rust,
    Php,
    Ruby,
    Swift,
    Kotlin,
}

impl Language {
    pub const ALL: [Language; 14] = [
        Language::Auto,
        Language::Python,
        Language::Javascript,
        Language::Typescript,
        Language::Java,
        Language::Cpp,
        Language::C,
        Language::Csharp,
        Language::Go,
        Language::Rust,
        Language::Php,
        Language::Ruby,
        Language::Swift,
        Language::Kotlin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Auto => "auto",
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::Csharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
        }
    }

    /// Returns the next language in [`Language::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|l| *l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// How thorough the service should be.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Quick,
    #[default]
    Standard,
    Deep,
}

impl Depth {
    pub fn as_str(self) -> &'static str {
        match self {
            Depth::Quick => "quick",
            Depth::Standard => "standard",
            Depth::Deep => "deep",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Depth::Quick => Depth::Standard,
            Depth::Standard => Depth::Deep,
            Depth::Deep => Depth::Quick,
        }
    }
}

/// User-selected options copied into every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOptions {
    pub language: Language,
    pub depth: Depth,
    pub check_security: bool,
    pub check_performance: bool,
    pub check_best_practices: bool,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            language: Language::Auto,
            depth: Depth::Standard,
            check_security: true,
            check_performance: true,
            check_best_practices: true,
        }
    }
}

impl ReviewOptions {
    /// Builds the extended request body for `code`.
    pub fn request(&self, code: impl Into<String>) -> ReviewRequest {
        ReviewRequest {
            code: code.into(),
            language: Some(self.language),
            depth: Some(self.depth),
            check_security: self.check_security,
            check_performance: self.check_performance,
            check_best_practices: self.check_best_practices,
        }
    }
}

/// Body of `POST /review`. Built fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRequest {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<Depth>,
    pub check_security: bool,
    pub check_performance: bool,
    pub check_best_practices: bool,
}

impl ReviewRequest {
    /// Request in the minimal variant's shape: no language or depth hint.
    pub fn minimal(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: None,
            depth: None,
            check_security: true,
            check_performance: true,
            check_best_practices: true,
        }
    }
}

/// Successful response body of `POST /review`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewResult {
    pub detected_language: Option<String>,
    pub quality_score: Option<f64>,
    pub security_score: Option<f64>,
    pub performance_score: Option<f64>,
    pub maintainability_score: Option<f64>,
    pub line_count: Option<u64>,
    pub complexity: Option<String>,
    pub complexity_reduction: Option<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub issues: Vec<Issue>,
    #[serde(deserialize_with = "null_as_default")]
    pub optimized_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub explanation: String,
}

/// Response body of `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub message: String,
    pub status: String,
    pub version: Option<String>,
    pub ai_enabled: Option<bool>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_request_uses_snake_case_keys() {
        let req = ReviewOptions::default().request("print(1)");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["code"], "print(1)");
        assert_eq!(json["language"], "auto");
        assert_eq!(json["depth"], "standard");
        assert_eq!(json["check_security"], true);
        assert_eq!(json["check_performance"], true);
        assert_eq!(json["check_best_practices"], true);
    }

    #[test]
    fn minimal_request_omits_hints() {
        let json = serde_json::to_value(ReviewRequest::minimal("x = 1")).unwrap();
        assert!(json.get("language").is_none());
        assert!(json.get("depth").is_none());
    }

    #[test]
    fn result_tolerates_missing_and_null_fields() {
        let result: ReviewResult =
            serde_json::from_str(r#"{"quality_score": 72, "issues": null}"#).unwrap();
        assert_eq!(result.quality_score, Some(72.0));
        assert!(result.security_score.is_none());
        assert!(result.issues.is_empty());
        assert_eq!(result.optimized_code, "");
    }

    #[test]
    fn null_text_fields_and_null_issue_entries_degrade() {
        let result: ReviewResult = serde_json::from_str(
            r#"{
                "quality_score": 50,
                "optimized_code": null,
                "explanation": null,
                "issues": [null, {"title": "t", "description": null, "severity": null}]
            }"#,
        )
        .unwrap();
        assert_eq!(result.optimized_code, "");
        assert_eq!(result.explanation, "");
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].title, "t");
        assert_eq!(result.issues[0].description, "");
        assert_eq!(result.issues[0].severity, Severity::Info);
    }

    #[test]
    fn issue_location_accepts_number_or_string() {
        let issues: Vec<Issue> = serde_json::from_str(
            r#"[
                {"title": "a", "severity": "critical", "location": 4},
                {"title": "b", "severity": "warning", "location": "17"},
                {"title": "c", "severity": "info", "location": "line five"},
                {"title": "d", "severity": "info", "location": null}
            ]"#,
        )
        .unwrap();
        let locations: Vec<_> = issues.iter().map(|i| i.location).collect();
        assert_eq!(locations, vec![Some(4), Some(17), None, None]);
    }

    #[test]
    fn bare_string_issue_becomes_info() {
        let issues: Vec<Issue> =
            serde_json::from_str(r#"["Limited comments.", {"title": "x", "severity": "CRITICAL"}]"#)
                .unwrap();
        assert_eq!(issues[0].title, "Limited comments.");
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[1].severity, Severity::Critical);
    }

    #[test]
    fn unknown_severity_is_preserved_as_unknown() {
        let issue: Issue = serde_json::from_str(r#"{"title": "t", "severity": "blocker"}"#).unwrap();
        assert_eq!(issue.severity, Severity::Unknown);
    }

    #[test]
    fn language_cycle_wraps() {
        assert_eq!(Language::Auto.next(), Language::Python);
        assert_eq!(Language::Kotlin.next(), Language::Auto);
        assert_eq!(Depth::Deep.next(), Depth::Quick);
    }
}
