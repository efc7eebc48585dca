//! # docsense-cli
//!
//! The `docsense` binary: load documents, index them, and ask questions.
//!
//! ```text
//! docsense ask manual.pdf notes.docx --query "why does the receiver lose fix?"
//! docsense search ./docs --query "battery storage" --top-k 3 --format json
//! docsense chat ./docs --mode document
//! ```

pub mod cli;
pub mod commands;
pub mod embedder;
pub mod telemetry;

pub use cli::{Cli, Command};
