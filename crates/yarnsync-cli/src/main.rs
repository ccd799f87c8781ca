//! sync-yarn-lock - Sync package.json versions with yarn.lock

use clap::Parser;
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::ffi::OsString;
use std::process::ExitCode;

mod output;
mod sync;

/// Environment variable selecting the diagnostic log level.
const LOG_ENV: &str = "SYNC_YARN_LOCK_LOG";

#[derive(Parser, Debug)]
#[command(name = "sync-yarn-lock")]
#[command(about = "Sync package.json versions with yarn.lock", long_about = None)]
#[command(disable_version_flag = true)]
#[command(after_help = "\
DESCRIPTION
  Updates all dependency versions in package.json to match the exact
  versions resolved in yarn.lock. Works with Yarn 4 (Berry).

EXAMPLES
  sync-yarn-lock             Sync versions and save
  sync-yarn-lock --dry-run   Preview changes only")]
struct Cli {
    /// Show version number
    #[arg(short = 'v', long)]
    version: bool,

    /// Preview changes without modifying package.json
    #[arg(short, long)]
    dry_run: bool,

    /// Only output errors
    #[arg(short, long)]
    silent: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(recognized_args(std::env::args_os()));

    if cli.version {
        println!("sync-yarn-lock v{}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    init_logger();

    let options = sync::SyncCommandOptions {
        dry_run: cli.dry_run,
        silent: cli.silent,
    };

    match sync::run(&options) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", output::error_line(&format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

/// Keep the program name and the flags this tool knows, dropping anything
/// else so unknown arguments never fail the run. Repeated flags are kept once.
fn recognized_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    let mut seen: Vec<&'static str> = Vec::new();

    for arg in args {
        let flag = match arg.to_str() {
            Some("-h" | "--help") => "help",
            Some("-v" | "--version") => "version",
            Some("-d" | "--dry-run") => "dry-run",
            Some("-s" | "--silent") => "silent",
            _ => continue,
        };
        if !seen.contains(&flag) {
            seen.push(flag);
            kept.push(arg);
        }
    }

    kept
}

/// Route `log` records to stderr at the level named by `SYNC_YARN_LOCK_LOG`.
fn init_logger() {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);

    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();

    // Only fails if a logger is already installed.
    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto).ok();
}
