//! Entry point pipelines.
//!
//! Each submodule runs one binary's Composing → Executing sequence:
//! - `build` - configure, compile and install fofimon
//! - `package` - create the date-stamped source archive

pub mod build;
pub mod package;

pub use build::cmd_build;
pub use package::cmd_package;
