use std::path::PathBuf;

use clap::Args;
use console::style;
use heisenberg::data_structs::typedef::MethylValue;
use heisenberg::io::compression::open_writer;
use heisenberg::io::load_probe_list;
use heisenberg::tools::{
    ProbeStatsCalculator,
    StatsConfig,
};

use crate::strings::shared;
use crate::strings::stats as strings;
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct StatsArgs {
    #[arg(short = 'i', long, required = true, help = strings::INPUT)]
    input:        PathBuf,
    #[arg(short = 'o', long, default_value = "-", help = strings::OUTPUT)]
    output:       PathBuf,
    #[arg(short = 'p', long, default_value_t = 4, help = strings::PROBE_START)]
    probe_start:  usize,
    #[arg(
        short = 'x',
        long,
        default_value_t = 25_000,
        help = strings::MAX_PROBES
    )]
    max_probes:   usize,
    #[arg(short = 'l', long, help = strings::PROBES)]
    probes:       Option<PathBuf>,
    #[arg(
        short = 'm',
        long,
        default_value_t = -1.0,
        allow_hyphen_values = true,
        help = shared::MISSING
    )]
    missing:      MethylValue,
    #[arg(long, default_value_t = false, help = strings::SKIP_MISSING)]
    skip_missing: bool,
}

impl StatsArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let probes = match self.probes.as_ref() {
            Some(path) => Some(load_probe_list(path)?),
            None => None,
        };
        let config = StatsConfig::default()
            .with_max_probes(self.max_probes)
            .with_probe_start(self.probe_start)
            .with_missing((!self.skip_missing).then_some(self.missing))
            .with_probes(probes);
        let calculator = ProbeStatsCalculator::new(config)?;

        let pbar = utils.pbar(Some(0))?;
        let written = calculator.run_with(
            &self.input,
            open_writer(&self.output)?,
            |done, total| {
                pbar.set_length(total as u64);
                pbar.set_position(done as u64);
            },
        )?;
        pbar.finish_and_clear();

        eprintln!(
            "{} statistics for {} probes written to {}",
            style("[DONE]").green().bold(),
            style(written).green(),
            self.output.display()
        );
        Ok(())
    }
}
