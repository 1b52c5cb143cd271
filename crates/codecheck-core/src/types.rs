use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Optional output filter for a check run. Each filter belongs to one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Filter {
    /// Report only files with a message whose code starts with the given code.
    Select(String),
    /// Print message lines only; suppress per-file scores and the average.
    ErrorsOnly,
    /// Report only files whose score is strictly below the threshold.
    ScoresLessThan(f64),
}

impl Filter {
    /// Command-line flag that introduces this filter.
    pub fn flag(&self) -> &'static str {
        match self {
            Filter::Select(_) => "--select",
            Filter::ErrorsOnly => "--errors-only",
            Filter::ScoresLessThan(_) => "--scores-less-than",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Select(code) => write!(f, "select {code}"),
            Filter::ErrorsOnly => write!(f, "errors only"),
            Filter::ScoresLessThan(threshold) => write!(f, "scores < {threshold}"),
        }
    }
}

/// A single check invocation: one tool, one source path, at most one filter.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub tool: String,
    pub source: PathBuf,
    pub filter: Option<Filter>,
}

impl CheckRequest {
    pub fn new(tool: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            source: source.into(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }
}

/// Unstructured output of one checker run against one file.
#[derive(Debug, Clone, Default)]
pub struct RawCheckerOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl RawCheckerOutput {
    pub fn new(stdout: impl Into<String>, exit_code: i32) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(exit_code),
        }
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        let mut out = self.stdout.clone();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&self.stderr);
        out
    }
}

/// One reported violation. `text` holds the checker's lines verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub code: Option<String>,
    pub text: String,
}

impl Message {
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            line: None,
            column: None,
            code: None,
            text: text.into(),
        }
    }

    /// True when this message's code starts with `prefix` (`E1` matches `E101`).
    pub fn code_matches(&self, prefix: &str) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| !prefix.is_empty() && code.starts_with(prefix))
    }
}

/// Parsed result for one analyzed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub messages: Vec<Message>,
}

impl FileResult {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            score: None,
            messages: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Why a file produced no usable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "code")]
pub enum FailureKind {
    /// Checker output did not have the expected shape.
    Parse,
    /// Checker exited with a status it never uses for findings.
    Exit(Option<i32>),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Parse => write!(f, "parse failure"),
            FailureKind::Exit(Some(code)) => write!(f, "exit code {code}"),
            FailureKind::Exit(None) => write!(f, "terminated by signal"),
        }
    }
}

/// A file skipped during the run, reported alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub detail: String,
}

/// Score statistics for tools that rate files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub processed_count: usize,
    pub scored_count: usize,
    pub average_score: Option<f64>,
}

/// Everything a renderer needs for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Number of files handed to the checker.
    pub checked_count: usize,
    /// Files surviving the filter, in traversal order.
    pub files: Vec<FileResult>,
    pub failures: Vec<FileFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateReport>,
}

impl CheckReport {
    pub fn errors_only(&self) -> bool {
        matches!(self.filter, Some(Filter::ErrorsOnly))
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_code(code: &str) -> Message {
        Message {
            line: Some(1),
            column: Some(1),
            code: Some(code.to_string()),
            text: format!("a.py:1:1: {code} something"),
        }
    }

    #[test]
    fn test_code_matches_prefix() {
        let msg = with_code("E101");
        assert!(msg.code_matches("E101"));
        assert!(msg.code_matches("E1"));
        assert!(msg.code_matches("E"));
        assert!(!msg.code_matches("E102"));
        assert!(!msg.code_matches("W1"));
    }

    #[test]
    fn test_code_matches_empty_and_missing() {
        assert!(!with_code("E101").code_matches(""));
        assert!(!Message::raw("no code here").code_matches("E"));
    }

    #[test]
    fn test_combined_output() {
        let mut raw = RawCheckerOutput::new("out", 0);
        assert_eq!(raw.combined(), "out");
        raw.stderr = "err\n".to_string();
        assert_eq!(raw.combined(), "out\nerr\n");
    }

    #[test]
    fn test_filter_flags() {
        assert_eq!(Filter::Select("E".into()).flag(), "--select");
        assert_eq!(Filter::ErrorsOnly.flag(), "--errors-only");
        assert_eq!(Filter::ScoresLessThan(8.0).flag(), "--scores-less-than");
    }

    #[test]
    fn test_failure_kind_display() {
        assert_eq!(FailureKind::Parse.to_string(), "parse failure");
        assert_eq!(FailureKind::Exit(Some(32)).to_string(), "exit code 32");
        assert_eq!(FailureKind::Exit(None).to_string(), "terminated by signal");
    }
}
