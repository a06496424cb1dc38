//! Source archive planning.
//!
//! The archive is created by `tar` from the parent of the project root so
//! that it extracts to a single top-level project directory.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::compose::Step;
use crate::error::{Error, Result};

/// Project name used in the archive file name.
pub const PROJECT_NAME: &str = "fofimon";

/// Build output, generated configure scripts and IDE metadata.
pub const BASE_EXCLUDES: &[&str] = &[
    "build*",
    "configure",
    "nbproject*",
    ".project",
    ".cproject",
    ".settings",
    "core",
];

/// UI sources, icons, desktop launchers and their third-party licenses.
pub const CLI_ONLY_EXCLUDES: &[&str] = &["gui*", "icons*", "applications*", "LICENSE.3rdparty"];

/// Excluded from every archive regardless of policy.
pub const ALWAYS_EXCLUDED: &[&str] = &[".git", "stuff", ".metadata", "core"];

/// Everything needed to create one source archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePlan {
    pub cli_only: bool,
    /// Duplicate-free, in a fixed order
    pub exclusion_patterns: Vec<String>,
    /// `<project>-<YYYYMMDD>.tar.gz`
    pub archive_name: String,
    /// Base name of the project directory, as stored on disk
    pub source_root_name: OsString,
    /// Parent of the project root; tar runs here
    pub working_dir: PathBuf,
}

impl ArchivePlan {
    /// Plan an archive of `project_root` stamped with `date`.
    pub fn new(cli_only: bool, project_root: &Path, project: &str, date: NaiveDate) -> Result<Self> {
        let source_root_name = project_root
            .file_name()
            .map(|n| n.to_os_string())
            .ok_or_else(|| no_parent(project_root))?;
        let working_dir = project_root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| no_parent(project_root))?
            .to_path_buf();

        Ok(Self {
            cli_only,
            exclusion_patterns: exclusion_patterns(cli_only),
            archive_name: archive_name(project, date),
            source_root_name,
            working_dir,
        })
    }

    /// The `tar` invocation, relative to [`ArchivePlan::working_dir`].
    pub fn step(&self) -> Step {
        let mut argv: Vec<OsString> = vec![
            "tar".into(),
            "-zcf".into(),
            self.archive_name.clone().into(),
            "-v".into(),
        ];
        argv.extend(
            self.exclusion_patterns
                .iter()
                .map(|p| OsString::from(format!("--exclude={p}"))),
        );
        argv.push(self.source_root_name.clone());
        Step::new("archive", argv)
    }

    /// Where the archive ends up.
    pub fn archive_path(&self) -> PathBuf {
        self.working_dir.join(&self.archive_name)
    }
}

/// Exclusion patterns for the given policy, first occurrence wins.
pub fn exclusion_patterns(cli_only: bool) -> Vec<String> {
    let extra: &[&str] = if cli_only { CLI_ONLY_EXCLUDES } else { &[] };

    let mut patterns: Vec<String> = Vec::new();
    for pattern in BASE_EXCLUDES.iter().chain(extra).chain(ALWAYS_EXCLUDED) {
        if !patterns.iter().any(|p| p == pattern) {
            patterns.push(pattern.to_string());
        }
    }
    patterns
}

/// `<project>-<YYYYMMDD>.tar.gz`
pub fn archive_name(project: &str, date: NaiveDate) -> String {
    format!("{}-{}.tar.gz", project, date.format("%Y%m%d"))
}

/// Fail unless a file can be created in `dir`.
pub fn check_destination_writable(dir: &Path) -> Result<()> {
    tempfile::Builder::new()
        .prefix(".fofimon-write-check")
        .tempfile_in(dir)
        .map(drop)
        .map_err(|e| Error::filesystem(dir, e))
}

fn no_parent(project_root: &Path) -> Error {
    Error::filesystem(
        project_root,
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "project root has no parent directory to archive from",
        ),
    )
}
