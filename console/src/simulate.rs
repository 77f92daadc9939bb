use std::path::PathBuf;

use clap::Args;
use console::style;
use heisenberg::io::compression::open_writer;
use heisenberg::io::{
    load_samples,
    MatrixWriter,
};
use heisenberg::tools::{
    AggregateConfig,
    Aggregator,
};
use log::{
    debug,
    info,
};

use crate::annot::{
    AnnotArgs,
    ProbeListArgs,
};
use crate::strings::simulate as strings;
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct SimulateArgs {
    #[arg(short = 'i', long, required = true, help = strings::INPUT)]
    input:            PathBuf,
    #[arg(short = 'o', long, default_value = "-", help = strings::OUTPUT)]
    output:           PathBuf,
    #[arg(
        short = 'k',
        long,
        default_value_t = 2,
        help_heading = "SIMULATION",
        help = strings::CHOOSE
    )]
    choose:           usize,
    #[arg(
        short = 'x',
        long,
        help_heading = "SIMULATION",
        help = strings::MAX_INDIVIDUALS
    )]
    max_individuals:  Option<usize>,
    #[arg(
        short = 'r',
        long,
        default_value_t = false,
        help_heading = "SIMULATION",
        help = strings::WITH_REPLACEMENT
    )]
    with_replacement: bool,
    #[arg(
        short = 'b',
        long,
        default_value = "normal peripheral blood",
        help_heading = "SIMULATION",
        help = strings::TISSUE
    )]
    tissue:           String,
    #[arg(
        short = 's',
        long,
        default_value = "none",
        help_heading = "SIMULATION",
        help = strings::STAGE
    )]
    stage:            String,
    #[arg(short = 'p', long, default_value_t = 4, help = strings::PROBE_START)]
    probe_start:      usize,

    #[clap(flatten)]
    probes: ProbeListArgs,
    #[clap(flatten)]
    annot:  AnnotArgs,
}

impl SimulateArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let parse_config = self.probes.parse_config()?;
        let (schema, samples) =
            load_samples(&self.input, self.probe_start, parse_config.clone())?;
        info!("{} samples loaded from {}", samples.len(), self.input.display());

        let store = self.annot.load()?;
        let config = AggregateConfig::default()
            .with_choose(self.choose)
            .with_with_replacement(self.with_replacement)
            .with_max_outputs(self.max_individuals)
            .with_tissue(self.tissue.clone())
            .with_stage(self.stage.clone())
            .with_missing(self.probes.missing());
        let aggregator = Aggregator::new(config, &store)?;

        let include_demographics = schema.has_demographics();
        let header = schema.output_header(
            include_demographics,
            parse_config.required.as_ref(),
            parse_config.required_only,
        );
        let mut writer = MatrixWriter::try_new(
            open_writer(&self.output)?,
            &header,
            include_demographics,
        )?;

        let pbar = utils.pbar(Some(aggregator.n_outputs(samples.len())))?;
        let mut rng = utils.rng();
        for sample in aggregator.iter(&samples, &mut rng) {
            debug!("Simulated sample {}", sample.sample());
            writer.write_sample(&sample)?;
            pbar.inc(1);
        }
        pbar.finish_and_clear();

        let written = writer.written();
        writer.finish()?;
        eprintln!(
            "{} {} simulated samples written to {}",
            style("[DONE]").green().bold(),
            style(written).green(),
            self.output.display()
        );
        Ok(())
    }
}
