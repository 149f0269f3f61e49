use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

pub mod checkpoints;
pub mod dataset;

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Download a dataset archive once and unpack it without escaping the target directory"
)]
#[clap(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    command: Command,

    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only report errors and hide progress bars.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Dataset(dataset::Dataset),
    Checkpoints(checkpoints::Checkpoints),
}

pub fn execute() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet)?;

    match args.command {
        Command::Dataset(cmd) => cmd.run(args.quiet),
        Command::Checkpoints(cmd) => cmd.run(),
    }
}

fn level_filter(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn init_logging(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter(verbose, quiet).into())
        .from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}
