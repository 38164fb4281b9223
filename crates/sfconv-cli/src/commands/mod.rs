//! CLI command implementations

pub mod convert;
pub mod dump;

use anyhow::Context;
use clap::CommandFactory;
use colored::Colorize;
use sfconv_backend_codec::default_registry;
use sfconv_core::SoundFont;
use std::process::ExitCode;

use crate::cli_args::{Cli, PlanError};

/// Process outcome, one variant per exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Everything requested completed.
    Success,
    /// Bad arguments or conflicting flags.
    Usage,
    /// No conversion or dump requested.
    NoAction,
    /// The input bank could not be read.
    ReadFailed,
    /// The output could not be produced.
    WriteFailed,
}

impl Exit {
    /// Numeric process status.
    pub fn code(self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::Usage => 1,
            Exit::NoAction => 2,
            Exit::ReadFailed => 3,
            Exit::WriteFailed => 4,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Run the requested dump and/or conversion.
///
/// # Returns
/// Exit status: 0 success, 1 usage, 2 nothing to do, 3 read failure, 4 write failure
pub fn run(cli: &Cli) -> Exit {
    let plan = match cli.plan() {
        Ok(plan) => plan,
        Err(PlanError::NoAction) => {
            eprintln!("{}", Cli::command().render_usage());
            eprintln!("no conversion or dump flag given (try -x, -zo, -zf or -d)");
            return Exit::NoAction;
        }
        Err(PlanError::MissingOutput) => {
            report(&anyhow::anyhow!("an output file is required for conversion"));
            eprintln!("{}", Cli::command().render_usage());
            return Exit::Usage;
        }
    };

    let codecs = default_registry();
    let mut bank = match SoundFont::open(&cli.infile, codecs)
        .with_context(|| format!("Failed to read {}", cli.infile.display()))
    {
        Ok(bank) => bank,
        Err(e) => {
            report(&e);
            return Exit::ReadFailed;
        }
    };

    if let Some(json) = plan.dump {
        if let Err(e) = dump::run(&bank, json) {
            report(&e);
            return Exit::WriteFailed;
        }
    }

    if let Some((options, out)) = plan.convert {
        if let Err(e) = convert::run(&mut bank, &options, &out, codecs) {
            report(&e);
            return Exit::WriteFailed;
        }
    }

    Exit::Success
}

fn report(err: &anyhow::Error) {
    eprintln!("{}: {:#}", "error".red().bold(), err);
}
