//! setup-sops binary entry point.

// Fatal errors are rendered on stderr after tracing may have failed
#![allow(clippy::print_stderr)]

use setup_sops::cli::{self, EXIT_FAILURE, EXIT_OK, exit_code_for};
use setup_sops::tracing::init_tracing;
use setup_sops_github::ActionsRunner;
use std::io;

fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    std::process::exit(run_with_tokio(&cli));
}

/// Create a current-thread runtime and run one installation.
fn run_with_tokio(cli: &cli::Cli) -> i32 {
    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("{e:?}");
        return EXIT_FAILURE;
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            return EXIT_FAILURE;
        }
    };

    let mut runner = ActionsRunner::from_env(io::stdout());
    match rt.block_on(setup_sops::run(cli, &mut runner)) {
        Ok(_) => EXIT_OK,
        Err(err) => {
            let code = exit_code_for(&err);
            if let Err(write_err) = runner.error(&err.to_string()) {
                tracing::debug!("Could not write error annotation: {write_err}");
            }
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    }
}
