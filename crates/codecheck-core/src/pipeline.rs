use std::path::Path;

use crate::aggregate::{apply_filter, ScoreAccumulator};
use crate::checker::Checker;
use crate::config::Config;
use crate::discovery::FileDiscovery;
use crate::error::CheckError;
use crate::invoker::{Invoker, ProcessRunner, Runner};
use crate::registry::CheckerRegistry;
use crate::types::{
    CheckReport, CheckRequest, FailureKind, FileFailure, FileResult, Filter, RawCheckerOutput,
};

/// Outcome of checking one file, before filtering.
enum FileOutcome {
    Checked(FileResult),
    Failed(FileFailure),
}

/// Reusable check pipeline: dispatch, discovery, invocation, aggregation.
pub struct CheckPipeline<R: Runner = ProcessRunner> {
    registry: CheckerRegistry,
    config: Config,
    runner: R,
}

impl CheckPipeline<ProcessRunner> {
    pub fn new(registry: CheckerRegistry, config: Config) -> Self {
        Self::with_runner(registry, config, ProcessRunner)
    }
}

impl<R: Runner> CheckPipeline<R> {
    pub fn with_runner(registry: CheckerRegistry, config: Config, runner: R) -> Self {
        Self {
            registry,
            config,
            runner,
        }
    }

    /// Run one check request to completion.
    ///
    /// Fatal errors (unknown tool, misused filter, missing source, checker
    /// that can't be started) abort the run. Unexpected exit codes and
    /// unparseable output are recorded per file and the run continues.
    pub fn run(&self, request: &CheckRequest) -> Result<CheckReport, CheckError> {
        let checker = self.registry.dispatch(&request.tool)?;
        validate_filter(checker, request.filter.as_ref())?;

        let discovery = FileDiscovery::new(
            checker.file_extensions(),
            &self.config.project.exclude_patterns,
        );
        let files = discovery.collect(&request.source)?;

        let invoker = Invoker::with_runner(&self.runner, self.config.tool(checker.name()));
        if !files.is_empty() {
            invoker.ensure_available(checker)?;
        }

        let mut scores = ScoreAccumulator::new();
        let mut results = Vec::new();
        let mut failures = Vec::new();

        for file in &files {
            let raw = invoker.invoke(checker, file)?;
            match check_output(checker, file, &raw) {
                FileOutcome::Checked(result) => {
                    if checker.scores_files() {
                        scores.add(result.score);
                    }
                    results.push(result);
                }
                FileOutcome::Failed(failure) => {
                    tracing::warn!(
                        "{}: {} ({})",
                        failure.path.display(),
                        failure.kind,
                        failure.detail
                    );
                    if checker.scores_files() {
                        scores.add(None);
                    }
                    failures.push(failure);
                }
            }
        }

        let reported = apply_filter(results, request.filter.as_ref());
        let aggregate = checker.scores_files().then(|| scores.finish());

        tracing::info!(
            tool = checker.name(),
            checked = files.len(),
            reported = reported.len(),
            failed = failures.len(),
            "check finished"
        );

        Ok(CheckReport {
            tool: checker.name().to_string(),
            filter: request.filter.clone(),
            checked_count: files.len(),
            files: reported,
            failures,
            aggregate,
        })
    }
}

fn validate_filter(checker: &dyn Checker, filter: Option<&Filter>) -> Result<(), CheckError> {
    let Some(filter) = filter else {
        return Ok(());
    };
    if !checker.supports(filter) {
        return Err(CheckError::Usage(format!(
            "{} is not supported by {}",
            filter.flag(),
            checker.name()
        )));
    }
    match filter {
        Filter::Select(code) if code.trim().is_empty() => Err(CheckError::Usage(
            "--select requires a non-empty error code".to_string(),
        )),
        Filter::ScoresLessThan(threshold) if !threshold.is_finite() => Err(CheckError::Usage(
            format!("--scores-less-than requires a finite number, got {threshold}"),
        )),
        _ => Ok(()),
    }
}

fn check_output(checker: &dyn Checker, file: &Path, raw: &RawCheckerOutput) -> FileOutcome {
    match raw.exit_code {
        Some(code) if checker.accepts_exit_code(code) => {}
        other => {
            return FileOutcome::Failed(FileFailure {
                path: file.to_path_buf(),
                kind: FailureKind::Exit(other),
                detail: first_line(&raw.combined()),
            });
        }
    }

    if !raw.stderr.trim().is_empty() {
        tracing::debug!(
            path = %file.display(),
            stderr = %raw.stderr.trim_end(),
            "checker wrote to stderr"
        );
    }

    match checker.parse(file, raw) {
        Ok(result) => FileOutcome::Checked(result),
        Err(e) => FileOutcome::Failed(FileFailure {
            path: file.to_path_buf(),
            kind: FailureKind::Parse,
            detail: e.to_string(),
        }),
    }
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("no output")
        .to_string()
}
