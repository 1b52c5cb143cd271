//! Subprocess invocation of external checkers.

use std::io;
use std::path::Path;
use std::process::Command;

use crate::checker::Checker;
use crate::config::ToolConfig;
use crate::error::CheckError;
use crate::types::RawCheckerOutput;

/// Runs a program and captures its output.
pub trait Runner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<RawCheckerOutput>;

    /// Whether `program` can be started at all.
    fn is_available(&self, _program: &str) -> bool {
        true
    }
}

impl<R: Runner + ?Sized> Runner for &R {
    fn run(&self, program: &str, args: &[String]) -> io::Result<RawCheckerOutput> {
        (**self).run(program, args)
    }

    fn is_available(&self, program: &str) -> bool {
        (**self).is_available(program)
    }
}

/// Runner backed by real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<RawCheckerOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(RawCheckerOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        let as_path = Path::new(program);
        if as_path.components().count() > 1 {
            return as_path.is_file();
        }
        which::which(program).is_ok()
    }
}

/// Builds the command line for a checker and runs it through a [`Runner`].
pub struct Invoker<R: Runner = ProcessRunner> {
    runner: R,
    tool: ToolConfig,
}

impl Invoker<ProcessRunner> {
    pub fn new(tool: ToolConfig) -> Self {
        Self::with_runner(ProcessRunner, tool)
    }
}

impl<R: Runner> Invoker<R> {
    pub fn with_runner(runner: R, tool: ToolConfig) -> Self {
        Self { runner, tool }
    }

    /// Program to execute: the configured override or the checker default.
    pub fn program<'a>(&'a self, checker: &'a dyn Checker) -> &'a str {
        self.tool.program.as_deref().unwrap_or(checker.program())
    }

    /// Configured extra args followed by the checker's own args for `path`.
    pub fn args(&self, checker: &dyn Checker, path: &Path) -> Vec<String> {
        let mut args = self.tool.args.clone();
        args.extend(checker.args(path));
        args
    }

    /// Fails with `ToolNotFound` unless the program can be started.
    pub fn ensure_available(&self, checker: &dyn Checker) -> Result<(), CheckError> {
        let program = self.program(checker);
        if self.runner.is_available(program) {
            Ok(())
        } else {
            Err(CheckError::ToolNotFound {
                program: program.to_string(),
            })
        }
    }

    /// Runs the checker against one file. Only a failure to start the
    /// program is an error; any exit status is returned to the caller.
    pub fn invoke(
        &self,
        checker: &dyn Checker,
        path: &Path,
    ) -> Result<RawCheckerOutput, CheckError> {
        let program = self.program(checker);
        let args = self.args(checker, path);
        tracing::debug!(program, ?args, "invoking checker");
        let raw = self
            .runner
            .run(program, &args)
            .map_err(|source| CheckError::Invocation {
                program: program.to_string(),
                path: path.to_path_buf(),
                source,
            })?;
        tracing::trace!(
            exit_code = ?raw.exit_code,
            stdout = %raw.stdout,
            stderr = %raw.stderr,
            "checker finished"
        );
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;
    use crate::error::ParseError;
    use crate::types::FileResult;

    struct Echo;

    impl Checker for Echo {
        fn name(&self) -> &'static str {
            "echo-check"
        }

        fn args(&self, path: &Path) -> Vec<String> {
            vec!["--flag".to_string(), path.to_string_lossy().into_owned()]
        }

        fn parse(&self, path: &Path, _raw: &RawCheckerOutput) -> Result<FileResult, ParseError> {
            Ok(FileResult::new(path))
        }
    }

    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<(String, Vec<String>)>>,
    }

    impl Runner for Recording {
        fn run(&self, program: &str, args: &[String]) -> io::Result<RawCheckerOutput> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            Ok(RawCheckerOutput::new("ok", 0))
        }
    }

    struct Missing;

    impl Runner for Missing {
        fn run(&self, _program: &str, _args: &[String]) -> io::Result<RawCheckerOutput> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn is_available(&self, _program: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_builds_command_line() {
        let recording = Recording::default();
        let tool = ToolConfig {
            program: Some("/opt/bin/echo-check".to_string()),
            args: vec!["--config=x".to_string()],
        };
        let invoker = Invoker::with_runner(&recording, tool);
        let raw = invoker.invoke(&Echo, Path::new("pkg/a.py")).unwrap();
        assert_eq!(raw.stdout, "ok");

        let calls = recording.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/opt/bin/echo-check");
        assert_eq!(calls[0].1, vec!["--config=x", "--flag", "pkg/a.py"]);
    }

    #[test]
    fn test_default_program_is_checker_program() {
        let invoker = Invoker::with_runner(Missing, ToolConfig::default());
        assert_eq!(invoker.program(&Echo), "echo-check");
    }

    #[test]
    fn test_spawn_failure_is_invocation_error() {
        let invoker = Invoker::with_runner(Missing, ToolConfig::default());
        let err = invoker.invoke(&Echo, Path::new("a.py")).unwrap_err();
        match err {
            CheckError::Invocation { program, path, .. } => {
                assert_eq!(program, "echo-check");
                assert_eq!(path, PathBuf::from("a.py"));
            }
            other => panic!("expected Invocation, got {other:?}"),
        }
    }

    #[test]
    fn test_ensure_available_missing_program() {
        let tool = ToolConfig {
            program: Some("codecheck-definitely-not-installed".to_string()),
            args: Vec::new(),
        };
        let invoker = Invoker::new(tool);
        assert!(matches!(
            invoker.ensure_available(&Echo),
            Err(CheckError::ToolNotFound { .. })
        ));

        let invoker = Invoker::with_runner(Missing, ToolConfig::default());
        match invoker.ensure_available(&Echo) {
            Err(CheckError::ToolNotFound { program }) => assert_eq!(program, "echo-check"),
            other => panic!("expected ToolNotFound, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_finds_sh() {
        assert!(ProcessRunner.is_available("sh"));
        assert!(!ProcessRunner.is_available("/nonexistent/bin/sh"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_output() {
        let raw = ProcessRunner
            .run("sh", &["-c".to_string(), "echo out; echo err >&2; exit 3".to_string()])
            .unwrap();
        assert_eq!(raw.stdout, "out\n");
        assert_eq!(raw.stderr, "err\n");
        assert_eq!(raw.exit_code, Some(3));
    }
}
