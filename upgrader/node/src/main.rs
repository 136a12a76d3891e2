mod config;
mod run;

use {crate::run::RunCmd, clap::Parser, tracing::metadata::LevelFilter};

#[derive(Parser)]
#[command(author, version, about, next_display_order = None)]
struct Cli {
    /// Logging verbosity: error|warn|info|debug|trace
    #[arg(long, global = true, default_value = "info")]
    tracing_level: LevelFilter,

    /// Print logs as JSON instead of human-readable text
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Run a simulated chain until it halts or the block limit is reached
    Run(RunCmd),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_max_level(cli.tracing_level)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(cli.tracing_level)
            .init();
    }

    match cli.command {
        Command::Run(cmd) => cmd.run(),
    }
}
