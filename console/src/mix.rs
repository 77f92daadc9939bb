use std::path::PathBuf;

use clap::Args;
use console::style;
use heisenberg::error::ConfigError;
use heisenberg::io::compression::{
    open_reader,
    open_writer,
};
use heisenberg::io::metadata::{
    load_sra_demographics_file,
    load_tcga_demographics_file,
};
use heisenberg::io::{
    load_samples,
    MatrixReader,
    MatrixWriter,
};
use heisenberg::tools::{
    MixConfig,
    Mixer,
};
use log::{
    info,
    warn,
};

use crate::annot::{
    AnnotArgs,
    ProbeListArgs,
};
use crate::strings::mix as strings;
use crate::utils::UtilsArgs;

#[derive(Args, Debug, Clone)]
pub(crate) struct MixArgs {
    #[arg(short = 'n', long, required = true, help = strings::NORMAL)]
    normal:             PathBuf,
    #[arg(short = 't', long, required = true, help = strings::TUMOR)]
    tumor:              PathBuf,
    #[arg(short = 'o', long, default_value = "-", help = strings::OUTPUT)]
    output:             PathBuf,
    #[arg(
        short = 'f',
        long,
        required = true,
        help_heading = "MIXING",
        help = strings::TUMOR_FRACTION
    )]
    tumor_fraction:     f64,
    #[arg(
        long,
        default_value_t = false,
        help_heading = "MIXING",
        help = strings::ALL_BY_ALL
    )]
    all_by_all:         bool,
    #[arg(
        short = 'g',
        long,
        default_value_t = false,
        requires = "tumor_metadata",
        help_heading = "DEMOGRAPHICS",
        help = strings::DEMOGRAPHIC
    )]
    demographic:        bool,
    #[arg(
        short = 'm',
        long,
        help_heading = "DEMOGRAPHICS",
        help = strings::NORMAL_METADATA
    )]
    normal_metadata:    Option<PathBuf>,
    #[arg(
        short = 'u',
        long,
        help_heading = "DEMOGRAPHICS",
        help = strings::TUMOR_METADATA
    )]
    tumor_metadata:     Option<PathBuf>,
    #[arg(
        short = 'e',
        long,
        default_value_t = 35.0,
        help_heading = "DEMOGRAPHICS",
        help = strings::MIN_AGE
    )]
    min_age:            f64,
    #[arg(long, default_value_t = 4, help = strings::NORMAL_PROBE_START)]
    normal_probe_start: usize,
    #[arg(long, default_value_t = 4, help = strings::TUMOR_PROBE_START)]
    tumor_probe_start:  usize,

    #[clap(flatten)]
    probes: ProbeListArgs,
    #[clap(flatten)]
    annot:  AnnotArgs,
}

impl MixArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let parse_config = self.probes.parse_config()?;
        let (schema, mut normals) = load_samples(
            &self.normal,
            self.normal_probe_start,
            parse_config.clone(),
        )?;
        info!("{} normal samples loaded", normals.len());

        if let Some(path) = self.normal_metadata.as_ref() {
            let found = load_sra_demographics_file(path, &mut normals)?;
            info!("Demographics set for {} normal samples", found);
        }

        let tumor_metadata = match self.tumor_metadata.as_ref() {
            Some(path) => Some(load_tcga_demographics_file(path)?),
            None => None,
        };

        if self.demographic && tumor_metadata.is_none() {
            return Err(ConfigError::MissingMetadata("tumor samples".to_string()).into());
        }

        let store = self.annot.load()?;
        let config = MixConfig::default()
            .with_tumor_fraction(self.tumor_fraction)
            .with_demographic_match(self.demographic)
            .with_all_by_all(self.all_by_all)
            .with_min_age(self.min_age)
            .with_missing(self.probes.missing());
        let mixer = Mixer::new(config, &store)?;

        let (normals, dropped) = mixer.filter_normals(normals);
        if self.demographic {
            info!(
                "{} normal samples kept for demographic matching, {} dropped",
                normals.len(),
                dropped
            );
        }

        let tumors = MatrixReader::try_new(
            open_reader(&self.tumor)?,
            self.tumor_probe_start,
            parse_config.clone(),
        )?;
        let include_demographics =
            tumor_metadata.is_some() || tumors.schema().has_demographics();
        // Mixed samples carry the normal's probe labels.
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

        let pbar = utils.pbar(None)?;
        let mut rng = utils.rng();
        let summary = mixer.mix_tumors(
            tumors.inspect(|_| pbar.inc(1)),
            &normals,
            tumor_metadata.as_ref(),
            &mut writer,
            &mut rng,
        )?;
        pbar.finish_and_clear();
        writer.finish()?;

        if summary.metastatic > 0 {
            info!("{} metastatic tumor samples skipped", summary.metastatic);
        }
        if summary.unmatched > 0 {
            warn!("{} tumor samples had no matching normal", summary.unmatched);
        }
        if summary.missing_metadata > 0 {
            warn!(
                "{} tumor samples skipped without demographics",
                summary.missing_metadata
            );
        }
        eprintln!(
            "{} {} mixed samples written to {}",
            style("[DONE]").green().bold(),
            style(summary.written).green(),
            self.output.display()
        );
        Ok(())
    }
}
