use clap::Parser;
use modelgen::cli::{run_cli, Cli};
use modelgen::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;
    run_cli(cli)
}
