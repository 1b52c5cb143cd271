use std::path::PathBuf;

/// Errors that end a check run.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Flags that don't make sense together or for the selected tool
    #[error("{0}")]
    Usage(String),

    /// Tool name missing from the dispatch table
    #[error("unknown tool '{name}' (expected one of: {known})")]
    UnknownTool { name: String, known: String },

    /// Checker program could not be located
    #[error("checker '{program}' not found. Please install it and ensure it's in your PATH.")]
    ToolNotFound { program: String },

    /// Checker program could not be started at all
    #[error("failed to run '{program}' on {}", .path.display())]
    Invocation {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source path '{}' does not exist", .0.display())]
    SourceNotFound(PathBuf),
}

/// Checker output that doesn't match the shape the plugin expects.
/// Recorded per file; the run continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: unexpected output '{text}'")]
    UnexpectedLine { line: usize, text: String },

    #[error("no score line found in output")]
    MissingScore,

    #[error("invalid score '{0}'")]
    InvalidScore(String),
}
