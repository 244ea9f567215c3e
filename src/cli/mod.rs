//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Workspace | Setup and identity | `init`, `whoami` |
//! | Authoring | Jott lifecycle | `create`, `edit`, `publish`, `delete` |
//! | Reading | Lookups and dashboards | `list`, `show`, `view` |
//! | Account | Quota and subscription | `quota`, `profile` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! jott --verbose list
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod jott;
mod output;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
