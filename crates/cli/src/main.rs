use std::path::PathBuf;
use std::process::ExitCode;

use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};

mod cmd;
mod logging;
mod output;
mod prompts;

use cmd::{RebuildArgs, cmd_diff, cmd_init, cmd_rebuild};

/// nixrb - Rebuild a NixOS configuration and record the result in git
#[derive(Parser)]
#[command(name = "nixrb")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the settings document (default: ./configuration.yaml, then the user config dir)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Print plain status lines instead of animated progress
  #[arg(long, global = true, env = "ACCESSIBLE", value_parser = FalseyValueParser::new())]
  accessible: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fill in missing paths, rebuild, and optionally commit the new generation
  Rebuild {
    /// Answer yes to every yes/no question
    #[arg(short, long)]
    yes: bool,

    /// Do not rebuild when no tracked file changed
    #[arg(long)]
    skip_unchanged: bool,

    /// Write paths entered in the form back to the settings document
    #[arg(long)]
    save: bool,
  },

  /// Show changes to tracked configuration files
  Diff,

  /// Write a settings document with default values
  Init {
    /// Where to write the document
    #[arg(default_value = "configuration.yaml")]
    path: PathBuf,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  let config = cli.config.as_deref();

  let result = match cli.command {
    Commands::Rebuild {
      yes,
      skip_unchanged,
      save,
    } => cmd_rebuild(
      config,
      RebuildArgs {
        assume_yes: yes,
        skip_unchanged,
        save,
        accessible: cli.accessible,
      },
      cli.verbose,
    ),
    Commands::Diff => cmd_diff(config, cli.verbose),
    Commands::Init { path } => cmd_init(&path),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      output::print_error(&format!("{:#}", e));
      ExitCode::FAILURE
    }
  }
}
