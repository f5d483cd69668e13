//! Local build driver for liftoff
//!
//! Shells out to the Xcode toolchain to bump version numbers, archive the
//! app, export an IPA and upload it with `altool`. Every subprocess goes
//! through a [`CommandRunner`], so the pipeline can be driven without Xcode.

pub mod error;
pub mod export_options;
pub mod pipeline;
pub mod prerequisites;
pub mod runner;

pub use error::{BuildError, Result};
pub use export_options::{ensure_export_options, ExportOptions};
pub use pipeline::{BuildPipeline, BuildSettings, BuildStep};
pub use prerequisites::{check_prerequisites, ToolStatus};
pub use runner::{CommandOutput, CommandRunner, ToolCommand, SystemRunner};
