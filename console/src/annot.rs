use std::path::PathBuf;

use clap::Args;
use heisenberg::data_structs::annotation::{
    AnnotLoadConfig,
    ProbeAnnotStore,
};
use heisenberg::data_structs::typedef::MethylValue;
use heisenberg::data_structs::SampleParseConfig;
use heisenberg::io::load_probe_list;
use log::info;

use crate::strings::shared as strings;

/// Annotation inputs feeding the noise injector.
#[derive(Args, Debug, Clone)]
pub(crate) struct AnnotArgs {
    #[arg(
        short = 'v',
        long,
        help_heading = "ANNOTATION",
        help = strings::STRUCTURAL_VARIANTS
    )]
    structural_variants: Option<PathBuf>,
    #[arg(
        short = 'c',
        long,
        help_heading = "ANNOTATION",
        help = strings::CONFOUNDING_SNPS
    )]
    confounding_snps:    Option<PathBuf>,
    #[arg(
        short = 'a',
        long,
        help_heading = "ANNOTATION",
        help = strings::PROBE_STATS
    )]
    probe_stats:         Option<PathBuf>,
    #[arg(
        long,
        default_value_t = 2,
        help_heading = "ANNOTATION",
        help = strings::MAX_DISTANCE
    )]
    max_distance:        i64,
    #[arg(
        long,
        default_value_t = 0.2,
        help_heading = "ANNOTATION",
        help = strings::MAX_SNP_MAF
    )]
    max_snp_maf:         f64,
    #[arg(
        long,
        default_value_t = 0.3,
        help_heading = "ANNOTATION",
        help = strings::MAX_SV_MAF
    )]
    max_sv_maf:          f64,
}

impl AnnotArgs {
    pub fn load(&self) -> anyhow::Result<ProbeAnnotStore> {
        let config = AnnotLoadConfig::default()
            .with_max_distance(self.max_distance)
            .with_max_snp_maf(self.max_snp_maf)
            .with_max_sv_maf(self.max_sv_maf);
        let store = ProbeAnnotStore::from_files(
            self.probe_stats.as_deref(),
            self.structural_variants.as_deref(),
            self.confounding_snps.as_deref(),
            &config,
        )?;
        if !store.is_empty() {
            info!(
                "Annotations loaded: {} probes, {} structural variants, {} SNPs",
                store.len(),
                store.n_svs(),
                store.n_snps()
            );
        }
        Ok(store)
    }
}

/// Required probe selection shared by the matrix-writing commands.
#[derive(Args, Debug, Clone)]
pub(crate) struct ProbeListArgs {
    #[arg(
        short = 'l',
        long,
        help_heading = "PROBES",
        help = strings::REQUIRED_PROBES
    )]
    required_probes: Option<PathBuf>,
    #[arg(
        short = 'y',
        long,
        default_value_t = false,
        requires = "required_probes",
        help_heading = "PROBES",
        help = strings::REQUIRED_ONLY
    )]
    required_only:   bool,
    #[arg(
        long,
        default_value_t = -1.0,
        allow_hyphen_values = true,
        help_heading = "PROBES",
        help = strings::MISSING
    )]
    missing:         MethylValue,
}

impl ProbeListArgs {
    pub fn missing(&self) -> MethylValue { self.missing }

    pub fn parse_config(&self) -> anyhow::Result<SampleParseConfig> {
        let required = match self.required_probes.as_ref() {
            Some(path) => {
                let probes = load_probe_list(path)?;
                info!("{} required probes loaded", probes.len());
                Some(probes)
            },
            None => None,
        };
        Ok(SampleParseConfig::default()
            .with_required(required)
            .with_required_only(self.required_only)
            .with_missing(self.missing))
    }
}
