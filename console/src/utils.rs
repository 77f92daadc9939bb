use clap::Args;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::strings::shared as strings;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        long,
        default_value_t = false,
        help_heading = "UTILS",
        help = strings::PROGRESS
    )]
    pub progress: bool,
    #[arg(
        long,
        default_value_t = false,
        help_heading = "UTILS",
        help = strings::VERBOSE
    )]
    pub verbose:  bool,
    #[arg(long, help_heading = "UTILS", help = strings::SEED)]
    pub seed:     Option<u64>,
}

impl UtilsArgs {
    /// Initialises logging to stderr. `RUST_LOG` overrides the level.
    pub fn setup(&self) -> anyhow::Result<()> {
        let level = if self.verbose {
            LevelFilter::Debug
        }
        else {
            LevelFilter::Info
        };
        pretty_env_logger::formatted_builder()
            .filter_level(level)
            .parse_default_env()
            .try_init()?;
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn pbar(
        &self,
        total: Option<usize>,
    ) -> anyhow::Result<ProgressBar> {
        if !self.progress {
            return Ok(ProgressBar::hidden());
        }
        match total {
            Some(total) => init_pbar(total),
            None => init_spinner(),
        }
    }
}

pub fn init_pbar(total: usize) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new(total as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}, ETA: {eta}] \
                 [{bar:40.cyan/blue}] {pos:>5.green}/{len:5} {msg}",
            )?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

/// For inputs whose row count is unknown up front.
pub fn init_spinner() -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos:>5.green} {msg}")?,
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}
