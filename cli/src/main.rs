mod cli;
mod error;
mod generate;
mod ui;

use clap::Parser;
use cli::Cli;
use std::process;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging to stderr.
///
/// `RUST_LOG` wins over `-v`. Without either only warnings are shown:
/// - 1 (-v): INFO
/// - 2 (-vv): DEBUG
/// - 3+ (-vvv): TRACE with file/line numbers
fn init_tracing(verbose: u8) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,cli=info,changelog=info,upstream=info,git=info".to_string(),
            2 => "warn,cli=debug,changelog=debug,upstream=debug,git=debug".to_string(),
            _ => "info,cli=trace,changelog=trace,upstream=trace,git=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(verbose >= 2)
                .with_file(verbose >= 3)
                .with_line_number(verbose >= 3)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = generate::execute(cli) {
        ui::error_line(&err.user_message());
        process::exit(1);
    }
}
