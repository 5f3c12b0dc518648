use clap::Parser;

use cli::args::{Cli, Command};
use cli::commands;
use common::logger::{RunId, init_logger, init_logger_json, run_span};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        init_logger_json("tickdenoise");
    } else {
        init_logger("tickdenoise");
    }

    let run_id = RunId::new();
    let _span = run_span(cli.command.name(), &run_id).entered();

    match &cli.command {
        Command::Denoise(args) => commands::run_denoise(args),
        Command::Evaluate(args) => commands::run_evaluate(args),
        Command::Search(args) => commands::run_search(args),
    }
}
