//! CLI entry point for tile catalog extraction and map generation

use clap::Parser;
use tileweave::io::cli::{Cli, CommandRunner};
use tileweave::io::logging::init_logging;

fn main() -> tileweave::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let mut runner = CommandRunner::new(cli);
    runner.run()
}
