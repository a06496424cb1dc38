//! install-fofimon - compiles and installs the fofimon application.

use std::process::ExitCode;

use anyhow::Context;

use fofimon_tools::commands::cmd_build;
use fofimon_tools::config::Config;
use fofimon_tools::options::{resolve_build, Parsed};
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
    let invocation_dir = std::env::current_dir().context("cannot determine current directory")?;

    let build = match resolve_build(std::env::args_os(), &invocation_dir)? {
        Parsed::Run(build) => build,
        Parsed::Info(text) => {
            print!("{text}");
            return Ok(());
        }
    };

    let config = Config::load(&invocation_dir);
    cmd_build(&config, &build, &mut SystemExecutor)?;
    Ok(())
}
