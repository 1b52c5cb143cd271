//! Renderers for codecheck reports.

pub mod json;
pub mod text;
