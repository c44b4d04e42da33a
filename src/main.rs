use clap::Parser;
use foodgle_insights::cli::Cli;
use foodgle_insights::logging::init_tracing;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    cli.run()
}
