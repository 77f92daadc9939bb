mod annot;
mod mix;
mod simulate;
mod stats;
mod strings;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use mix::MixArgs;
use simulate::SimulateArgs;
use stats::StatsArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Average every k-subset of a population into synthetic samples.
    Simulate {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SimulateArgs,
    },

    /// Blend tumor samples into normal samples at a fixed tumor fraction.
    Mix {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  MixArgs,
    },

    /// Compute per-probe min, max, mean and standard deviation.
    Stats {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  StatsArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Simulate { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Mix { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Stats { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
