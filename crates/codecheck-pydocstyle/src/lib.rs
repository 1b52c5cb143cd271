use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use codecheck_core::checker::Checker;
use codecheck_core::error::ParseError;
use codecheck_core::types::{FileResult, Message, RawCheckerOutput};

/// pydocstyle checker plugin.
///
/// Each violation is a `path:line <context>:` header followed by indented
/// explanation lines; the group is kept verbatim as one message.
pub struct PydocstyleChecker {
    header_re: Regex,
    code_re: Regex,
}

impl PydocstyleChecker {
    pub fn new() -> Result<Self> {
        let header_re = Regex::new(r"^(?P<path>\S.*?):(?P<line>\d+)\b")
            .context("failed to compile header pattern")?;
        let code_re =
            Regex::new(r"^\s+(?P<code>D\d{3}):").context("failed to compile code pattern")?;
        Ok(Self { header_re, code_re })
    }
}

impl Checker for PydocstyleChecker {
    fn name(&self) -> &'static str {
        "pydocstyle"
    }

    fn parse(&self, path: &Path, raw: &RawCheckerOutput) -> Result<FileResult, ParseError> {
        let mut result = FileResult::new(path);
        let mut current: Option<Message> = None;

        for (idx, line) in raw.stdout.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let unexpected = || ParseError::UnexpectedLine {
                line: idx + 1,
                text: line.to_string(),
            };

            if line.starts_with(char::is_whitespace) {
                let msg = current.as_mut().ok_or_else(unexpected)?;
                if msg.code.is_none() {
                    msg.code = self
                        .code_re
                        .captures(line)
                        .map(|caps| caps["code"].to_string());
                }
                msg.text.push('\n');
                msg.text.push_str(line);
                continue;
            }

            let caps = self.header_re.captures(line).ok_or_else(unexpected)?;
            result.messages.extend(current.take());
            current = Some(Message {
                line: caps["line"].parse().ok(),
                column: None,
                code: None,
                text: line.to_string(),
            });
        }
        result.messages.extend(current);
        Ok(result)
    }
}
