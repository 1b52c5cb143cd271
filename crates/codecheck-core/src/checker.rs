use std::path::Path;

use crate::error::ParseError;
use crate::types::{FileResult, Filter, RawCheckerOutput};

/// Trait that each checker plugin must implement.
///
/// A plugin is a pair of pure functions around one external program: the
/// argument builder ([`Checker::args`]) and the output parser
/// ([`Checker::parse`]). Everything else describes how the pipeline should
/// treat the program.
pub trait Checker: Send + Sync {
    /// Tool name used for dispatch (e.g., "flake8")
    fn name(&self) -> &'static str;

    /// Default executable name looked up on `PATH`
    fn program(&self) -> &'static str {
        self.name()
    }

    /// File extensions collected when walking a directory (e.g., &["py"])
    fn file_extensions(&self) -> &[&str] {
        &["py"]
    }

    /// Arguments passed to the program to check a single file.
    fn args(&self, path: &Path) -> Vec<String> {
        vec![path.to_string_lossy().into_owned()]
    }

    /// Whether an exit code is one the program uses for a normal run,
    /// with or without findings.
    fn accepts_exit_code(&self, code: i32) -> bool {
        code == 0 || code == 1
    }

    /// Whether the given filter applies to this tool's output.
    fn supports(&self, _filter: &Filter) -> bool {
        false
    }

    /// Whether the tool rates files, enabling score aggregation.
    fn scores_files(&self) -> bool {
        false
    }

    /// Parse the program's output for one file.
    fn parse(&self, path: &Path, raw: &RawCheckerOutput) -> Result<FileResult, ParseError>;
}
