use clap::{Parser, Subcommand};
use ngxstat_core::cli::{
    ConfigCmd, ExitStatus, RecordsArgs, StatsArgs, run_config, run_records, run_stats,
};
use ngxstat_core::logging::{LoggingOptions, init_logging};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(
    name = "ngxstat",
    version,
    about = "ngxstat: streaming statistics for nginx access logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize one or more access logs
    Stats(StatsArgs),

    /// Print parsed records as JSON lines
    Records(RecordsArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Command::Stats(args) => args.analyze.verbose,
        Command::Records(args) => args.analyze.verbose,
        Command::Config { .. } => false,
    };
    init_logging(LoggingOptions { verbose });

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = Arc::clone(&cancel);
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)) {
            warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    let result = match cli.command {
        Command::Stats(args) => run_stats(&args, cancel),
        Command::Records(args) => run_records(&args, cancel),
        Command::Config { cmd } => run_config(cmd),
    };

    let status = match result {
        Ok(status) => status,
        Err(e) => {
            eprintln!("ngxstat: {e:#}");
            ExitStatus::Failure
        }
    };

    std::process::exit(status.code());
}
