//! Package command - creates the source archive.

use chrono::NaiveDate;

use crate::archive::{check_destination_writable, ArchivePlan, PROJECT_NAME};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::options::PackageOptions;
use crate::preflight;
use crate::process::{run_steps, Executor};

/// Execute the package command for the archive stamped with `date`.
///
/// Returns the plan that was carried out.
pub fn cmd_package<E: Executor + ?Sized>(
    config: &Config,
    options: &PackageOptions,
    date: NaiveDate,
    executor: &mut E,
) -> Result<ArchivePlan> {
    let root = config
        .source_dir
        .canonicalize()
        .map_err(|e| Error::filesystem(&config.source_dir, e))?;

    let plan = ArchivePlan::new(options.cli_only, &root, PROJECT_NAME, date)?;
    let step = plan.step();

    if !config.skip_preflight {
        preflight::require_tools(std::slice::from_ref(&step))?;
    }
    check_destination_writable(&plan.working_dir)?;

    run_steps(executor, &plan.working_dir, &[step])?;

    println!("\nCreated {}", plan.archive_path().display());
    Ok(plan)
}
