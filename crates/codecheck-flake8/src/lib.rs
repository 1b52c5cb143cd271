use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use codecheck_core::checker::Checker;
use codecheck_core::error::ParseError;
use codecheck_core::types::{FileResult, Filter, Message, RawCheckerOutput};

/// flake8's default report line: `path:line:col: CODE message`.
const LINE_PATTERN: &str =
    r"^(?P<path>.+?):(?P<line>\d+):(?P<col>\d+): (?P<code>[A-Za-z]+\d+) (?P<message>.*)$";

/// flake8 checker plugin.
pub struct Flake8Checker {
    line_re: Regex,
}

impl Flake8Checker {
    pub fn new() -> Result<Self> {
        let line_re = Regex::new(LINE_PATTERN).context("failed to compile flake8 line pattern")?;
        Ok(Self { line_re })
    }

    /// Turn one report line into a message, keeping the line verbatim.
    pub fn parse_line(&self, line: &str) -> Option<Message> {
        let caps = self.line_re.captures(line)?;
        Some(Message {
            line: Some(caps["line"].parse().ok()?),
            column: Some(caps["col"].parse().ok()?),
            code: Some(caps["code"].to_string()),
            text: line.to_string(),
        })
    }
}

impl Checker for Flake8Checker {
    fn name(&self) -> &'static str {
        "flake8"
    }

    fn args(&self, path: &Path) -> Vec<String> {
        vec![
            "--format=default".to_string(),
            path.to_string_lossy().into_owned(),
        ]
    }

    fn supports(&self, filter: &Filter) -> bool {
        matches!(filter, Filter::Select(_))
    }

    fn parse(&self, path: &Path, raw: &RawCheckerOutput) -> Result<FileResult, ParseError> {
        let mut result = FileResult::new(path);
        for (idx, text) in raw.stdout.lines().enumerate() {
            if text.trim().is_empty() {
                continue;
            }
            let message = self
                .parse_line(text)
                .ok_or_else(|| ParseError::UnexpectedLine {
                    line: idx + 1,
                    text: text.to_string(),
                })?;
            result.messages.push(message);
        }
        Ok(result)
    }
}
