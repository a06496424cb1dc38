//! Shared test utilities for fofimon-tools tests.
#![allow(dead_code)]

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use fofimon_tools::compose::Step;
use fofimon_tools::config::Config;
use fofimon_tools::process::Executor;
use tempfile::TempDir;

/// Temporary workspace holding a mock `fofimon` project tree.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Parent of the project root; archives land here
    pub parent: PathBuf,
    /// Project root
    pub project: PathBuf,
}

impl TestEnv {
    /// Create a workspace with a project directory holding only `CMakeLists.txt`.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let parent = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        let project = parent.join("fofimon");
        fs::create_dir_all(&project).expect("Failed to create project dir");
        fs::write(project.join("CMakeLists.txt"), "project(fofimon)\n")
            .expect("Failed to write CMakeLists.txt");

        Self {
            _temp_dir: temp_dir,
            parent,
            project,
        }
    }

    /// Tool configuration pointing at the project, preflight disabled.
    pub fn config(&self, make_options: Option<&str>) -> Config {
        Config {
            source_dir: self.project.clone(),
            make_options: make_options.map(str::to_string),
            skip_preflight: true,
        }
    }
}

/// Populate a project tree with sources and the clutter the archive skips.
pub fn create_mock_project(project: &Path) {
    let files = [
        "CMakeLists.txt",
        "LICENSE",
        "LICENSE.3rdparty",
        "src/main.cc",
        "src/fofimodel.cc",
        "gui/window.cc",
        "icons/hicolor/fofimon.svg",
        "applications/fofimon.desktop",
        "build/CMakeCache.txt",
        "build-debug/Makefile",
        "nbproject/project.xml",
        ".git/HEAD",
        "stuff/notes.txt",
        ".settings/prefs",
        "core",
    ];

    for file in files {
        let path = project.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create mock dir");
        }
        fs::write(&path, file).expect("Failed to write mock file");
    }
}

/// Write an executable shell script.
pub fn write_script(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create script dir");
    }
    fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    let mut perms = fs::metadata(path).expect("Failed to get metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
}

/// Executor that records each step instead of spawning it.
#[derive(Default)]
pub struct RecordingExecutor {
    /// Steps seen, with the working directory at the time
    pub calls: Vec<(Step, PathBuf)>,
    /// Exit code to report for the named step
    pub fail: Option<(&'static str, i32)>,
}

impl RecordingExecutor {
    pub fn failing(step: &'static str, code: i32) -> Self {
        Self {
            calls: Vec::new(),
            fail: Some((step, code)),
        }
    }

    pub fn step_names(&self) -> Vec<&'static str> {
        self.calls.iter().map(|(s, _)| s.name).collect()
    }

    pub fn argv(&self, name: &str) -> Vec<OsString> {
        self.calls
            .iter()
            .find(|(s, _)| s.name == name)
            .map(|(s, _)| s.argv.clone())
            .unwrap_or_else(|| panic!("step {name} was not run"))
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, step: &Step) -> fofimon_tools::Result<i32> {
        let cwd = std::env::current_dir().expect("Failed to read cwd");
        self.calls.push((step.clone(), cwd));
        match self.fail {
            Some((name, code)) if name == step.name => Ok(code),
            _ => Ok(0),
        }
    }
}
