//! Build command - configures, compiles and installs fofimon.

use std::fs;

use crate::compose::compose_build;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::options::BuildConfiguration;
use crate::preflight;
use crate::process::{run_steps, Executor};

/// Marker file the configure step (`cmake ..`) expects in the project root.
const CMAKELISTS: &str = "CMakeLists.txt";

/// Execute the build command.
///
/// The build directory is created when missing and otherwise reused as-is,
/// so a previous configuration persists between runs.
pub fn cmd_build<E: Executor + ?Sized>(
    config: &Config,
    build: &BuildConfiguration,
    executor: &mut E,
) -> Result<()> {
    if !config.source_dir.is_dir() {
        return Err(Error::filesystem(
            &config.source_dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "project root not found"),
        ));
    }

    let cmakelists = config.source_dir.join(CMAKELISTS);
    if !cmakelists.is_file() {
        return Err(Error::filesystem(
            cmakelists,
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "not a fofimon project root, run from the directory holding CMakeLists.txt",
            ),
        ));
    }

    let plan = compose_build(build, &config.source_dir, &config.make_args());

    if !config.skip_preflight {
        preflight::require_tools(&plan.steps)?;
    }

    if !plan.build_dir.is_dir() {
        fs::create_dir_all(&plan.build_dir).map_err(|e| Error::filesystem(&plan.build_dir, e))?;
        println!("Created {}", plan.build_dir.display());
    }

    run_steps(executor, &plan.build_dir, &plan.steps)?;

    println!(
        "\nfofimon ({}) installed to {}",
        build.build_type,
        build.install_prefix.display()
    );
    Ok(())
}
