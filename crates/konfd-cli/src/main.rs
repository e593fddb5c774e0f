//! konfd - renders ConfigMap and Secret templates in Kubernetes

use clap::Parser;
use std::process::ExitCode;

mod agent;
mod cli;
mod display;
mod error;
mod exit_codes;
mod logging;
mod settings;

use cli::Cli;

fn main() -> ExitCode {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.debug, cli.log_format);

    let result = settings::resolve(&cli).and_then(agent::run);

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}
