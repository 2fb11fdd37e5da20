// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Operator binding generator command-line interface.
//!
//! This is the main entry point for the `opgen` command.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

mod commands;
mod manifest;

/// opgen: generate C++ operator bindings from YAML operator schemas
#[derive(Debug, Parser)]
#[command(name = "opgen")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v: info, -vv: debug, -vvv+: trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: opgen.toml in the working directory)
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the eager and static tensor operants sources
    Operants(commands::operants::OperantsArgs),

    /// Generate the extra attribute maps for operator compatibility
    ExtraInfo(commands::extra_info::ExtraInfoArgs),
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = manifest::load(cli.config.as_deref()).and_then(|manifest| match cli.command {
        Command::Operants(args) => commands::operants::run(&args.resolve(&manifest.operants)),
        Command::ExtraInfo(args) => {
            commands::extra_info::run(&args.resolve(&manifest.extra_info))
        }
    });

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn directive_for_verbosity(v: u8) -> &'static str {
    // Targets are module paths: the binary is `opgen`, the library `opgen_core`.
    match v {
        0 => "opgen=warn,opgen_core=warn",
        1 => "opgen=info,opgen_core=info",
        2 => "opgen=debug,opgen_core=debug",
        _ => "opgen=trace,opgen_core=trace",
    }
}
