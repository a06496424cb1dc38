//! Command-line option resolution for both entry points.
//!
//! Turns raw argument tokens into validated, immutable configuration records.
//! Nothing here touches the filesystem or spawns processes.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use path_absolutize::Absolutize;

use crate::error::{Error, Result};

/// Platform-standard local install root.
pub const DEFAULT_INSTALL_PREFIX: &str = "/usr/local";

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BuildType {
    #[value(name = "Debug")]
    Debug,
    #[default]
    #[value(name = "Release")]
    Release,
    #[value(name = "MinSizeRel")]
    MinSizeRel,
    #[value(name = "RelWithDebInfo")]
    RelWithDebInfo,
}

impl BuildType {
    /// Value passed to `CMAKE_BUILD_TYPE`.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::MinSizeRel => "MinSizeRel",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the test suite is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TestPolicy {
    #[value(name = "On")]
    On,
    #[value(name = "Off")]
    Off,
    /// Keep whatever the existing build directory was configured with.
    #[default]
    #[value(name = "Cache")]
    Cache,
}

impl TestPolicy {
    /// Value for `BUILD_TESTING`, or `None` when no directive is emitted.
    pub fn directive_value(self) -> Option<&'static str> {
        match self {
            TestPolicy::On => Some("ON"),
            TestPolicy::Off => Some("OFF"),
            TestPolicy::Cache => None,
        }
    }
}

/// Validated build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    pub build_type: BuildType,
    pub test_policy: TestPolicy,
    /// Absolute, normalized install prefix
    pub install_prefix: PathBuf,
    pub use_sudo: bool,
}

impl Default for BuildConfiguration {
    fn default() -> Self {
        Self {
            build_type: BuildType::default(),
            test_policy: TestPolicy::default(),
            install_prefix: PathBuf::from(DEFAULT_INSTALL_PREFIX),
            use_sudo: true,
        }
    }
}

/// Validated package invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackageOptions {
    /// Leave UI sources, icons and launchers out of the archive
    pub cli_only: bool,
}

/// Outcome of parsing: either something to run, or text to print and exit 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed<T> {
    Run(T),
    /// `--help` or `--version` output
    Info(String),
}

#[derive(Parser, Debug)]
#[command(name = "install-fofimon")]
#[command(about = "Compiles and installs the fofimon application")]
#[command(version)]
struct InstallArgs {
    /// Build type
    #[arg(short = 'b', long = "buildtype", value_enum, default_value_t = BuildType::Release)]
    buildtype: BuildType,

    /// Build tests (Cache keeps the previous setting)
    #[arg(short = 't', long = "tests", value_enum, default_value_t = TestPolicy::Cache)]
    tests: TestPolicy,

    /// Install prefix
    #[arg(long, value_name = "DESTDIR", default_value = DEFAULT_INSTALL_PREFIX)]
    destdir: PathBuf,

    /// Don't use sudo to install
    #[arg(long)]
    no_sudo: bool,
}

#[derive(Parser, Debug)]
#[command(name = "fofimon-sourcepackage")]
#[command(about = "Create source tar.gz")]
#[command(version)]
struct PackageArgs {
    /// Only cli sources
    #[arg(long = "only-cli")]
    only_cli: bool,
}

/// Resolve build options from raw tokens (program name first).
///
/// A relative `--destdir` is resolved against `invocation_dir`.
pub fn resolve_build<I, T>(tokens: I, invocation_dir: &Path) -> Result<Parsed<BuildConfiguration>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = match parse::<InstallArgs, _, _>(tokens)? {
        Parsed::Run(args) => args,
        Parsed::Info(text) => return Ok(Parsed::Info(text)),
    };

    let install_prefix = args
        .destdir
        .absolutize_from(invocation_dir)
        .map_err(|e| Error::filesystem(&args.destdir, e))?
        .into_owned();

    let config = BuildConfiguration {
        build_type: args.buildtype,
        test_policy: args.tests,
        install_prefix,
        use_sudo: !args.no_sudo,
    };
    tracing::debug!(?config, "build options resolved");
    Ok(Parsed::Run(config))
}

/// Resolve package options from raw tokens (program name first).
pub fn resolve_package<I, T>(tokens: I) -> Result<Parsed<PackageOptions>>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(match parse::<PackageArgs, _, _>(tokens)? {
        Parsed::Run(args) => Parsed::Run(PackageOptions {
            cli_only: args.only_cli,
        }),
        Parsed::Info(text) => Parsed::Info(text),
    })
}

fn parse<P, I, T>(tokens: I) -> Result<Parsed<P>>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match P::try_parse_from(tokens) {
        Ok(args) => Ok(Parsed::Run(args)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                Ok(Parsed::Info(err.render().to_string()))
            }
            _ => {
                let rendered = err.render().to_string();
                let message = rendered
                    .strip_prefix("error: ")
                    .unwrap_or(&rendered)
                    .trim_end()
                    .to_string();
                Err(Error::Configuration { message })
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(args: &[&str]) -> Result<Parsed<BuildConfiguration>> {
        let tokens = std::iter::once("install-fofimon").chain(args.iter().copied());
        resolve_build(tokens, Path::new("/home/dev/fofimon"))
    }

    fn run(args: &[&str]) -> BuildConfiguration {
        match build(args).unwrap() {
            Parsed::Run(config) => config,
            Parsed::Info(text) => panic!("unexpected info output: {text}"),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(run(&[]), BuildConfiguration::default());
    }

    #[test]
    fn test_all_flags() {
        let config = run(&["-b", "Debug", "-t", "On", "--destdir", "/opt/fofi", "--no-sudo"]);
        assert_eq!(config.build_type, BuildType::Debug);
        assert_eq!(config.test_policy, TestPolicy::On);
        assert_eq!(config.install_prefix, PathBuf::from("/opt/fofi"));
        assert!(!config.use_sudo);
    }

    #[test]
    fn test_long_flags() {
        let config = run(&["--buildtype", "RelWithDebInfo", "--tests", "Off"]);
        assert_eq!(config.build_type, BuildType::RelWithDebInfo);
        assert_eq!(config.test_policy, TestPolicy::Off);
        assert!(config.use_sudo);
    }

    #[test]
    fn test_destdir_normalized() {
        let config = run(&["--destdir", "../stage/./usr/../prefix"]);
        assert_eq!(config.install_prefix, PathBuf::from("/home/dev/stage/prefix"));

        let config = run(&["--destdir", "/opt//x/../y"]);
        assert_eq!(config.install_prefix, PathBuf::from("/opt/y"));
    }

    #[test]
    fn test_invalid_build_type_names_flag_and_values() {
        let err = build(&["--buildtype", "Fast"]).unwrap_err();
        let Error::Configuration { message } = err else {
            panic!("expected configuration error");
        };
        assert!(message.contains("--buildtype"), "{message}");
        assert!(message.contains("Fast"));
        assert!(message.contains("MinSizeRel"));
    }

    #[test]
    fn test_invalid_test_policy() {
        let err = build(&["-t", "maybe"]).unwrap_err();
        let Error::Configuration { message } = err else {
            panic!("expected configuration error");
        };
        assert!(message.contains("--tests"), "{message}");
        assert!(message.contains("Cache"));
    }

    #[test]
    fn test_values_are_case_sensitive() {
        assert!(matches!(
            build(&["-b", "release"]),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(build(&["-t", "ON"]), Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_unknown_flag() {
        let err = build(&["--no-icons"]).unwrap_err();
        assert!(err.to_string().contains("--no-icons"));
        assert_eq!(err.exit_code(), crate::error::EXIT_USAGE);
    }

    #[test]
    fn test_help_is_not_an_error() {
        match build(&["--help"]).unwrap() {
            Parsed::Info(text) => assert!(text.contains("--destdir")),
            Parsed::Run(_) => panic!("help should not resolve a configuration"),
        }
    }

    #[test]
    fn test_package_options() {
        let parsed = resolve_package(["fofimon-sourcepackage"]).unwrap();
        assert_eq!(parsed, Parsed::Run(PackageOptions { cli_only: false }));

        let parsed = resolve_package(["fofimon-sourcepackage", "--only-cli"]).unwrap();
        assert_eq!(parsed, Parsed::Run(PackageOptions { cli_only: true }));

        assert!(matches!(
            resolve_package(["fofimon-sourcepackage", "--only-gui"]),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_directive_values() {
        assert_eq!(TestPolicy::On.directive_value(), Some("ON"));
        assert_eq!(TestPolicy::Off.directive_value(), Some("OFF"));
        assert_eq!(TestPolicy::Cache.directive_value(), None);
    }
}
