//! fofimon-sourcepackage - creates a source tar.gz of the project.

use std::process::ExitCode;

use anyhow::Context;
use chrono::Local;

use fofimon_tools::commands::cmd_package;
use fofimon_tools::config::Config;
use fofimon_tools::options::{resolve_package, Parsed};
use fofimon_tools::process::SystemExecutor;
use fofimon_tools::{telemetry, Error};

fn main() -> ExitCode {
    telemetry::init_tracing("warn");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let code = err
                .downcast_ref::<Error>()
                .map(Error::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run() -> anyhow::Result<()> {
    let options = match resolve_package(std::env::args_os())? {
        Parsed::Run(options) => options,
        Parsed::Info(text) => {
            print!("{text}");
            return Ok(());
        }
    };

    let invocation_dir = std::env::current_dir().context("cannot determine current directory")?;
    let config = Config::load(&invocation_dir);
    let today = Local::now().date_naive();
    cmd_package(&config, &options, today, &mut SystemExecutor)?;
    Ok(())
}
