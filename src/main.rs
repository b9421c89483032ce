mod browse;
mod cli;
mod config;
mod error;
pub(crate) mod github;
mod io_utils;
mod logging;
pub(crate) mod render;
pub(crate) mod revision;
pub(crate) mod serde_helpers;
mod surface;
pub(crate) mod thumbnail;
pub(crate) mod time_utils;
pub(crate) mod viewer;

pub(crate) use error::{AppError, AppResult};

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use time::UtcOffset;
use tracing::error;

use crate::cli::{Cli, GetVerbosity};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Only answerable while the process still has a single thread.
    let local_offset = UtcOffset::current_local_offset();

    let cli = Cli::parse();
    let ansi = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stderr().is_terminal(),
    };
    logging::setup_logger(cli.cmd.get_verbosity().tracing_level_filter(), ansi);
    let offset = time_utils::offset_or_utc(local_offset);

    match cli.cmd.run(offset).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
