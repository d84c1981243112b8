//! Logging initialization and color control.

use anyhow::Result;
use colored::control as color_control;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::cli::Cli;

/// Log level for the given flags.
///
/// JSON output drops to ERROR unless `--verbose` asked for more, so stderr
/// stays quiet for scripts.
pub fn log_level(cli: &Cli) -> Level {
    let machine_output = cli
        .command
        .output_format()
        .is_some_and(|format| format.is_machine_readable());

    if cli.verbose {
        Level::DEBUG
    } else if cli.quiet || machine_output {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Install the stderr subscriber and apply color settings.
///
/// # Errors
///
/// Returns an error if the global tracing subscriber cannot be set.
pub fn initialize_logging(cli: &Cli) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(cli))
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let env_no_color = std::env::var_os("NO_COLOR").is_some();
    let machine_output = cli
        .command
        .output_format()
        .is_some_and(|format| format.is_machine_readable());
    if cli.no_color || env_no_color || machine_output {
        color_control::set_override(false);
    }
    Ok(())
}
