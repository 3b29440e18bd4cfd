use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    recipe_convert::logging::init().context("init logging")?;

    let cli = recipe_convert::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        recipe_convert::cli::Command::ConvertAll(args) => {
            recipe_convert::pass::run(args).context("convert-all")?;
        }
        recipe_convert::cli::Command::Convert(args) => {
            recipe_convert::convert::run(args).context("convert")?;
        }
        recipe_convert::cli::Command::Index(args) => {
            recipe_convert::pass::preview(args).context("index")?;
        }
    }

    Ok(())
}
