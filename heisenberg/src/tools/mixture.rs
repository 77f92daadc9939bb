use std::io::Write;

use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};
use rand::seq::SliceRandom;
use rand::Rng;

use super::noise::NoiseInjector;
use crate::data_structs::annotation::ProbeAnnotStore;
use crate::data_structs::typedef::{
    MethylValue,
    SampleSet,
    DEFAULT_MISSING,
};
use crate::data_structs::{
    Demographics,
    Sample,
    TissueClass,
};
use crate::error::ConfigError;
use crate::io::MatrixWriter;
use crate::utils::format_fraction;
use crate::with_field_fn;

pub const MIXED_CASE: &str = "ct-sim";
pub const MIXED_TISSUE: &str = "tumor";
/// Tumor rows whose tissue label contains this are never mixed.
pub const METASTATIC: &str = "Metastatic";

#[derive(Debug, Clone)]
pub struct MixConfig {
    /// Share of the tumor signal in every mixed value, within `[0, 1]`.
    pub tumor_fraction:    f64,
    /// Only mix with normals of the tumor's age group and gender.
    pub demographic_match: bool,
    /// Mix with every candidate normal instead of one random partner.
    pub all_by_all:        bool,
    pub min_age:           f64,
    pub missing:           MethylValue,
}

impl MixConfig {
    with_field_fn!(tumor_fraction, f64);
    with_field_fn!(demographic_match, bool);
    with_field_fn!(all_by_all, bool);
    with_field_fn!(min_age, f64);
    with_field_fn!(missing, MethylValue);

    pub fn normal_fraction(&self) -> f64 { 1.0 - self.tumor_fraction }
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            tumor_fraction:    0.0,
            demographic_match: false,
            all_by_all:        false,
            min_age:           35.0,
            missing:           DEFAULT_MISSING,
        }
    }
}

/// Per-run counts reported by [`Mixer::mix_tumors`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixSummary {
    pub tumors:           usize,
    pub written:          usize,
    pub metastatic:       usize,
    /// Tumors for which no normal matched.
    pub unmatched:        usize,
    /// Tumors skipped under demographic matching for lack of demographics.
    pub missing_metadata: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MixOutcome {
    Mixed(Vec<Sample>),
    /// No normal matched the tumor's demographics; the tumor is skipped.
    NoMatch,
}

/// Blends tumor samples into normal samples at a fixed tumor fraction.
pub struct Mixer<'a> {
    config:   MixConfig,
    injector: NoiseInjector<'a>,
}

impl<'a> Mixer<'a> {
    pub fn new(
        config: MixConfig,
        store: &'a ProbeAnnotStore,
    ) -> anyhow::Result<Self> {
        if !(0.0..=1.0).contains(&config.tumor_fraction) {
            return Err(ConfigError::InvalidFraction(config.tumor_fraction).into());
        }
        let injector = NoiseInjector::new(store, config.missing);
        Ok(Self { config, injector })
    }

    pub fn config(&self) -> &MixConfig { &self.config }

    /// Applies [`filter_by_demographics`] with the configured minimum age.
    /// A no-op unless demographic matching is enabled.
    pub fn filter_normals(
        &self,
        normals: SampleSet,
    ) -> (SampleSet, usize) {
        if self.config.demographic_match {
            filter_by_demographics(normals, self.config.min_age)
        }
        else {
            (normals, 0)
        }
    }

    /// Mixes one normal with one tumor over the normal's probe labels.
    ///
    /// A probe the tumor lacks contributes the missing value. Annotated
    /// probes with a non-negative combined value go through the injector,
    /// negative ones become the missing value. Unannotated probes keep the
    /// combined value even when it is negative, so a missing reading on
    /// either side shows through as a value below zero.
    pub fn mix_pair<R: Rng + ?Sized>(
        &self,
        normal: &Sample,
        tumor: &Sample,
        rng: &mut R,
    ) -> Sample {
        let tumor_fraction = self.config.tumor_fraction;
        let normal_fraction = self.config.normal_fraction();

        let probe_vals = normal
            .probe_vals()
            .iter()
            .map(|(label, normal_value)| {
                let tumor_value = tumor.value(label).unwrap_or(self.config.missing);
                let combined = normal_fraction * normal_value + tumor_fraction * tumor_value;
                let value = if self.injector.is_annotated(label) {
                    if combined >= 0.0 {
                        self.injector.adjust_label(combined, label, rng)
                    }
                    else {
                        self.config.missing
                    }
                }
                else {
                    combined
                };
                (label.clone(), value)
            })
            .collect();

        let sample_id = format!("{}_{}", normal.case(), tumor.case());
        debug!("Creating simulated sample {}", sample_id);
        Sample::new(
            MIXED_CASE,
            sample_id,
            format!(
                "{}:{}",
                format_fraction(normal_fraction),
                format_fraction(tumor_fraction)
            ),
            MIXED_TISSUE,
            probe_vals,
        )
        .with_demographics(tumor.demographics().cloned())
    }

    /// Mixes `tumor` with the candidate normals.
    ///
    /// With demographic matching the candidates are the normals sharing the
    /// tumor's age group and gender; the tumor must carry demographics.
    pub fn mix<R: Rng + ?Sized>(
        &self,
        normals: &SampleSet,
        tumor: &Sample,
        rng: &mut R,
    ) -> anyhow::Result<MixOutcome> {
        let candidates = if self.config.demographic_match {
            let demographics = tumor
                .demographics()
                .ok_or_else(|| ConfigError::MissingMetadata(tumor.case().clone()))?;
            match_by_demographics(normals, demographics)
        }
        else {
            normals.values().collect_vec()
        };

        if candidates.is_empty() {
            match tumor.demographics() {
                Some(d) => {
                    warn!(
                        "No normal matches found for tumor sample {}: {}|{}",
                        tumor.sample(),
                        d.age,
                        d.gender
                    )
                },
                None => warn!("No normal samples to mix with {}", tumor.sample()),
            }
            return Ok(MixOutcome::NoMatch);
        }

        let mixed = if self.config.all_by_all {
            candidates
                .iter()
                .map(|normal| self.mix_pair(normal, tumor, rng))
                .collect_vec()
        }
        else {
            match candidates.choose(rng) {
                Some(normal) => vec![self.mix_pair(normal, tumor, rng)],
                None => return Ok(MixOutcome::NoMatch),
            }
        };
        Ok(MixOutcome::Mixed(mixed))
    }

    /// Mixes every tumor row against `normals` and writes the results.
    ///
    /// Metastatic rows are skipped. With `metadata`, each tumor's
    /// demographics are replaced by the entry for its case id (or cleared
    /// when the case is absent). Under demographic matching a tumor left
    /// without demographics is skipped and counted rather than aborting
    /// the run.
    pub fn mix_tumors<I, W, R>(
        &self,
        tumors: I,
        normals: &SampleSet,
        metadata: Option<&HashMap<String, Demographics>>,
        writer: &mut MatrixWriter<W>,
        rng: &mut R,
    ) -> anyhow::Result<MixSummary>
    where
        I: IntoIterator<Item = anyhow::Result<Sample>>,
        W: Write,
        R: Rng + ?Sized, {
        let mut summary = MixSummary::default();
        for tumor in tumors {
            let mut tumor = tumor?;
            summary.tumors += 1;
            if tumor.tissue().contains(METASTATIC) {
                debug!("Skipping metastatic sample {}", tumor.sample());
                summary.metastatic += 1;
                continue;
            }
            if tumor.tissue_class() == TissueClass::Normal {
                warn!(
                    "Tumor input row {} is labelled '{}'",
                    tumor.sample(),
                    tumor.tissue()
                );
            }
            if let Some(metadata) = metadata {
                let demographics = metadata.get(tumor.case()).cloned();
                if demographics.is_none() {
                    warn!("No clinical metadata for case {}", tumor.case());
                }
                tumor.set_demographics(demographics);
            }
            if self.config.demographic_match && tumor.demographics().is_none() {
                warn!(
                    "Skipping tumor sample {} without demographics",
                    tumor.sample()
                );
                summary.missing_metadata += 1;
                continue;
            }

            match self.mix(normals, &tumor, rng)? {
                MixOutcome::Mixed(mixed) => {
                    for sample in mixed.iter() {
                        writer.write_sample(sample)?;
                        summary.written += 1;
                    }
                },
                MixOutcome::NoMatch => summary.unmatched += 1,
            }
        }
        info!(
            "{} mixed samples written from {} tumor rows",
            summary.written, summary.tumors
        );
        Ok(summary)
    }
}

/// Normals in the same age group and of the same gender as `target`.
pub fn match_by_demographics<'s>(
    normals: &'s SampleSet,
    target: &Demographics,
) -> Vec<&'s Sample> {
    normals
        .values()
        .filter(|s| s.demographics().is_some_and(|d| target.matches(d)))
        .collect()
}

/// Drops normals without demographics or younger than `min_age`.
/// Returns the kept samples and how many were dropped.
pub fn filter_by_demographics(
    normals: SampleSet,
    min_age: f64,
) -> (SampleSet, usize) {
    let before = normals.len();
    let kept: SampleSet = normals
        .into_iter()
        .filter(|(sample_id, sample)| {
            let keep = sample.demographics().is_some_and(|d| d.age >= min_age);
            if !keep {
                warn!("Filtering sample by metadata {}", sample_id);
            }
            keep
        })
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}
