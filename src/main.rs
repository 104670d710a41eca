mod checks;
mod commands;
mod core;
mod release;
mod surface;
mod sync;
mod ui;

use clap::{Parser, Subcommand};
use core::error::{FleetError, print_error};

/// Keep versions, dependency pins, and required files consistent across a fleet of repositories
#[derive(Parser)]
#[command(name = "fleet")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct FleetCli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run consistency checks across all repositories (exit code = error count)
  Check {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Sync manifest dependency pins against the dependency registry
  Sync {
    /// Name of a single repository to sync (default: all)
    repo: Option<String>,
    /// Show planned changes without writing any file
    #[arg(long)]
    dry_run: bool,
    /// Print per-repository details, including skipped packages
    #[arg(short, long)]
    verbose: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Coordinate a platform release: bump, test, propagate, commit, tag
  #[command(disable_version_flag = true)]
  Release {
    /// Release version (strict MAJOR.MINOR.PATCH, no 'v' prefix)
    version: String,
    /// Release channel: dev, alpha, beta, stable
    #[arg(long, default_value = "dev")]
    channel: String,
    /// Show the release plan without making changes
    #[arg(long)]
    dry_run: bool,
    /// Skip the pre-release test gate
    #[arg(long)]
    skip_tests: bool,
  },

  /// Validate that SDK repositories expose the required method surface
  Surface {
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = FleetCli::parse();

  let result = match cli.command {
    Commands::Check { json } => commands::run_check(json),
    Commands::Sync {
      repo,
      dry_run,
      verbose,
      json,
    } => commands::run_sync(repo, dry_run, verbose, json),
    Commands::Release {
      version,
      channel,
      dry_run,
      skip_tests,
    } => commands::run_release(version, channel, dry_run, skip_tests),
    Commands::Surface { json } => commands::run_surface(json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: FleetError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
