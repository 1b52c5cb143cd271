pub mod aggregate;
pub mod checker;
pub mod config;
pub mod discovery;
pub mod error;
pub mod invoker;
pub mod pipeline;
pub mod registry;
pub mod types;

pub use checker::Checker;
pub use config::Config;
pub use error::{CheckError, ParseError};
pub use pipeline::CheckPipeline;
pub use registry::CheckerRegistry;
pub use types::*;
