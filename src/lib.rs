//! Build and source-packaging helpers for the fofimon project.
//!
//! Two binaries share this library:
//! - `install-fofimon` resolves build options, composes the
//!   cmake/make/install sequence and runs it in `build/`
//! - `fofimon-sourcepackage` plans and creates `fofimon-YYYYMMDD.tar.gz`

pub mod archive;
pub mod commands;
pub mod compose;
pub mod config;
pub mod error;
pub mod options;
pub mod preflight;
pub mod process;
pub mod telemetry;
pub mod timing;

pub use error::{Error, Result};
