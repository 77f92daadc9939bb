use std::io::Write;

use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
};
use rand::Rng;
use statrs::function::factorial::binomial;

use super::noise::NoiseInjector;
use crate::data_structs::annotation::ProbeAnnotStore;
use crate::data_structs::typedef::{
    MethylValue,
    ProbeLabel,
    SampleSet,
    DEFAULT_MISSING,
};
use crate::data_structs::{
    Demographics,
    Sample,
};
use crate::error::ConfigError;
use crate::io::MatrixWriter;
use crate::with_field_fn;

pub const SIMULATED_CASE: &str = "sim";
pub const SIMULATED_BIOSPECIMEN: &str = "mean-methyl-sim";

#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Samples per synthetic subset.
    pub choose:           usize,
    pub with_replacement: bool,
    /// Keep only this many subsets, taken from the start of the enumeration.
    pub max_outputs:      Option<usize>,
    pub tissue:           String,
    pub stage:            String,
    pub missing:          MethylValue,
}

impl AggregateConfig {
    with_field_fn!(choose, usize);
    with_field_fn!(with_replacement, bool);
    with_field_fn!(max_outputs, Option<usize>);
    with_field_fn!(tissue, String);
    with_field_fn!(stage, String);
    with_field_fn!(missing, MethylValue);
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            choose:           2,
            with_replacement: false,
            max_outputs:      None,
            tissue:           "normal peripheral blood".to_string(),
            stage:            "none".to_string(),
            missing:          DEFAULT_MISSING,
        }
    }
}

/// Builds synthetic samples by averaging every k-subset of a population.
pub struct Aggregator<'a> {
    config:   AggregateConfig,
    injector: NoiseInjector<'a>,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        config: AggregateConfig,
        store: &'a ProbeAnnotStore,
    ) -> anyhow::Result<Self> {
        if config.choose == 0 {
            return Err(ConfigError::InvalidChoose(config.choose).into());
        }
        let injector = NoiseInjector::new(store, config.missing);
        Ok(Self { config, injector })
    }

    pub fn config(&self) -> &AggregateConfig { &self.config }

    /// Number of synthetic samples [`Aggregator::iter`] yields for a
    /// population of `n`.
    pub fn n_outputs(
        &self,
        n: usize,
    ) -> usize {
        let k = self.config.choose as u64;
        let total = if self.config.with_replacement {
            binomial(n as u64 + k - 1, k)
        }
        else {
            binomial(n as u64, k)
        };
        let total = total.round() as usize;
        match self.config.max_outputs {
            Some(max) => total.min(max),
            None => total,
        }
    }

    /// Averages one subset into a synthetic sample.
    ///
    /// Annotated probes with a positive mean go through the injector; a mean
    /// at or below zero on an annotated probe becomes the missing value.
    /// Unannotated probes keep the plain mean, negative or not, so missing
    /// readings pull the mean below zero instead of being replaced.
    pub fn combine<R: Rng + ?Sized>(
        &self,
        members: &[&Sample],
        rng: &mut R,
    ) -> Sample {
        let mut totals: HashMap<ProbeLabel, MethylValue> = HashMap::new();
        for member in members {
            for (label, value) in member.probe_vals() {
                *totals.entry(label.clone()).or_insert(0.0) += value;
            }
        }

        let n = members.len() as f64;
        let probe_vals = totals
            .into_iter()
            .map(|(label, total)| {
                let mean = total / n;
                let value = if self.injector.is_annotated(&label) {
                    if mean > 0.0 {
                        self.injector.adjust_label(mean, &label, rng)
                    }
                    else {
                        self.config.missing
                    }
                }
                else {
                    mean
                };
                (label, value)
            })
            .collect();

        let sample_id = members
            .iter()
            .map(|m| m.case().as_str())
            .unique()
            .join("_");
        debug!("Creating simulated sample {}", sample_id);

        Sample::new(
            SIMULATED_CASE,
            sample_id,
            SIMULATED_BIOSPECIMEN,
            self.config.tissue.clone(),
            probe_vals,
        )
        .with_demographics(self.inherited_demographics(members))
    }

    /// Gender of the first member that has demographics, mean age over all
    /// members that have them.
    fn inherited_demographics(
        &self,
        members: &[&Sample],
    ) -> Option<Demographics> {
        let with_meta = members
            .iter()
            .filter_map(|m| m.demographics())
            .collect_vec();
        let first = with_meta.first()?;
        let age = with_meta.iter().map(|d| d.age).sum::<f64>() / with_meta.len() as f64;
        Some(Demographics::new(
            first.gender.clone(),
            age,
            Some(self.config.stage.clone()),
        ))
    }

    /// Lazily yields one synthetic sample per subset of `samples`, in the
    /// lexical order of the input.
    pub fn iter<'s, R: Rng + ?Sized>(
        &'s self,
        samples: &'s SampleSet,
        rng: &'s mut R,
    ) -> AggregateIter<'s, R> {
        let k = self.config.choose;
        let members = samples.values();
        let subsets: Box<dyn Iterator<Item = Vec<&'s Sample>> + 's> =
            if self.config.with_replacement {
                Box::new(members.combinations_with_replacement(k))
            }
            else {
                Box::new(members.combinations(k))
            };
        let subsets: Box<dyn Iterator<Item = Vec<&'s Sample>> + 's> =
            match self.config.max_outputs {
                Some(max) => Box::new(subsets.take(max)),
                None => subsets,
            };
        AggregateIter {
            aggregator: self,
            subsets,
            rng,
        }
    }

    /// Writes every synthetic sample and returns how many were written.
    pub fn write_all<W: Write, R: Rng + ?Sized>(
        &self,
        samples: &SampleSet,
        writer: &mut MatrixWriter<W>,
        rng: &mut R,
    ) -> anyhow::Result<usize> {
        let mut count = 0;
        for sample in self.iter(samples, rng) {
            writer.write_sample(&sample)?;
            count += 1;
        }
        info!("{} simulated samples written", count);
        Ok(count)
    }
}

pub struct AggregateIter<'s, R: Rng + ?Sized> {
    aggregator: &'s Aggregator<'s>,
    subsets:    Box<dyn Iterator<Item = Vec<&'s Sample>> + 's>,
    rng:        &'s mut R,
}

impl<R: Rng + ?Sized> Iterator for AggregateIter<'_, R> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let members = self.subsets.next()?;
        Some(self.aggregator.combine(&members, &mut *self.rng))
    }
}
