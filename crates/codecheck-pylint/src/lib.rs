use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use codecheck_core::checker::Checker;
use codecheck_core::error::ParseError;
use codecheck_core::types::{FileResult, Filter, Message, RawCheckerOutput};

/// pylint's exit status is a bit mask; 32 marks a usage error.
const USAGE_ERROR_BIT: i32 = 32;

/// pylint checker plugin.
pub struct PylintChecker {
    score_re: Regex,
    message_re: Regex,
}

impl PylintChecker {
    pub fn new() -> Result<Self> {
        let score_re = Regex::new(r"Your code has been rated at (?P<score>-?\d+(?:\.\d+)?)/10")
            .context("failed to compile score pattern")?;
        let message_re = Regex::new(
            r"^(?P<path>.+?):(?P<line>\d+):(?P<col>\d+): (?P<code>[A-Z]\d{4}): (?P<message>.*)$",
        )
        .context("failed to compile message pattern")?;
        Ok(Self {
            score_re,
            message_re,
        })
    }

    /// Score from a `Your code has been rated at X.XX/10` line.
    pub fn parse_score(&self, line: &str) -> Option<Result<f64, ParseError>> {
        let caps = self.score_re.captures(line)?;
        let text = &caps["score"];
        Some(
            text.parse::<f64>()
                .map_err(|_| ParseError::InvalidScore(text.to_string())),
        )
    }

    fn message(&self, line: &str) -> Message {
        match self.message_re.captures(line) {
            Some(caps) => Message {
                line: caps["line"].parse().ok(),
                column: caps["col"].parse().ok(),
                code: Some(caps["code"].to_string()),
                text: line.to_string(),
            },
            None => Message::raw(line),
        }
    }
}

/// Module banners, separator rules and blank lines carry no findings.
fn is_decoration(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with("*************")
        || trimmed.chars().all(|c| c == '-')
}

impl Checker for PylintChecker {
    fn name(&self) -> &'static str {
        "pylint"
    }

    fn accepts_exit_code(&self, code: i32) -> bool {
        (0..USAGE_ERROR_BIT).contains(&code)
    }

    fn supports(&self, filter: &Filter) -> bool {
        matches!(filter, Filter::ErrorsOnly | Filter::ScoresLessThan(_))
    }

    fn scores_files(&self) -> bool {
        true
    }

    /// Messages are the lines before the trailing score line.
    fn parse(&self, path: &Path, raw: &RawCheckerOutput) -> Result<FileResult, ParseError> {
        let mut result = FileResult::new(path);
        for line in raw.stdout.lines() {
            if let Some(score) = self.parse_score(line) {
                result.score = Some(score?);
                return Ok(result);
            }
            if !is_decoration(line) {
                result.messages.push(self.message(line));
            }
        }
        Err(ParseError::MissingScore)
    }
}
