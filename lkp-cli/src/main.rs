//! Lake preparation CLI - generates simulator input files and scores output.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "lkp-cli",
    version,
    about = "Lake simulation preparation and calibration toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: lkp_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    lkp_cmd::run(cli.command)
}
