//! sfconv - SoundFont conversion and compression utility
//!
//! Converts banks between SF2, SF3 (Ogg Vorbis) and SF4 (FLAC) and dumps
//! their preset tables.

use clap::Parser;
use std::process::ExitCode;

use sfconv_cli::{commands, Cli, Exit};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                Exit::Usage.into()
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    commands::run(&cli).into()
}
