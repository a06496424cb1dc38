//! Translate a build configuration into the configure/compile/install sequence.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::options::BuildConfiguration;

/// Name of the out-of-tree build directory under the project root.
pub const BUILD_DIR_NAME: &str = "build";

/// Privilege escalation command prefixed to the install step.
pub const SUDO: &str = "sudo";

/// One external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Short step name used in progress output and errors
    pub name: &'static str,
    /// Program followed by its arguments, paths kept byte-for-byte
    pub argv: Vec<OsString>,
}

impl Step {
    pub fn new<I, S>(name: &'static str, argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            name,
            argv: argv.into_iter().map(Into::into).collect(),
        }
    }

    /// Program to execute (first element of the vector).
    pub fn program(&self) -> &OsStr {
        self.argv
            .first()
            .map(OsString::as_os_str)
            .unwrap_or_else(|| OsStr::new(""))
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[OsString] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// Space-joined command line, as echoed to the operator.
    ///
    /// Lossy for non-UTF-8 arguments; only used for display.
    pub fn command_line(&self) -> String {
        self.argv
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Ordered build sequence plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    pub build_dir: PathBuf,
    pub steps: Vec<Step>,
}

/// Compose the build plan for a project rooted at `project_root`.
///
/// `make_args` are passed through to the compile step untouched.
pub fn compose_build(
    config: &BuildConfiguration,
    project_root: &Path,
    make_args: &[String],
) -> BuildPlan {
    BuildPlan {
        build_dir: project_root.join(BUILD_DIR_NAME),
        steps: vec![
            configure_step(config),
            compile_step(make_args),
            install_step(config.use_sudo),
        ],
    }
}

fn configure_step(config: &BuildConfiguration) -> Step {
    let mut argv: Vec<OsString> = vec![
        "cmake".into(),
        "-D".into(),
        format!("CMAKE_BUILD_TYPE={}", config.build_type).into(),
    ];

    if let Some(value) = config.test_policy.directive_value() {
        argv.push("-D".into());
        argv.push(format!("BUILD_TESTING={value}").into());
    }

    let mut prefix = OsString::from("CMAKE_INSTALL_PREFIX=");
    prefix.push(&config.install_prefix);
    argv.push("-D".into());
    argv.push(prefix);
    argv.push("..".into());

    Step::new("configure", argv)
}

fn compile_step(make_args: &[String]) -> Step {
    let argv = std::iter::once("make".to_string()).chain(make_args.iter().cloned());
    Step::new("compile", argv)
}

fn install_step(use_sudo: bool) -> Step {
    let mut argv = Vec::with_capacity(3);
    if use_sudo {
        argv.push(SUDO);
    }
    argv.push("make");
    argv.push("install");
    Step::new("install", argv)
}
