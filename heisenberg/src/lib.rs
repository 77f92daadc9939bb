//! # heisenberg
//!
//! `heisenberg` builds synthetic DNA methylation samples from real probe
//! matrices. It is meant for benchmarking classifiers on mixtures whose
//! composition is known.
//!
//! Two engines produce synthetic samples:
//!
//! * **Aggregation** ([`tools::Aggregator`]) averages every k-subset of a
//!   normal population into one synthetic individual.
//! * **Mixture** ([`tools::Mixer`]) blends a tumor sample into normal samples
//!   at a fixed tumor fraction, optionally restricted to normals of the same
//!   age group and gender.
//!
//! Both pass every annotated probe value through a [`tools::NoiseInjector`],
//! which adds noise bounded by the probe's standard deviation and randomly
//! zeroes values to mimic homozygous deletions and confounding SNPs.
//!
//! ## Structure
//!
//! * [`data_structs`]: [`Sample`] and its optional [`Demographics`], the probe
//!   annotation records and the [`ProbeAnnotStore`] joining them.
//! * [`io`]: compression-transparent streams, the [`MatrixSchema`] resolved
//!   from a matrix header, matrix reading and writing, metadata loaders.
//! * [`tools`]: the engines and per-probe statistics (feature-gated, on by
//!   default).
//! * [`error`]: configuration errors that abort a run.
//!
//! ## Usage
//!
//! ```no_run
//! use heisenberg::prelude::*;
//! use rand::thread_rng;
//!
//! fn main() -> anyhow::Result<()> {
//!     let (schema, samples) =
//!         load_samples("normals.tsv.gz", 4, SampleParseConfig::default())?;
//!
//!     let mut store = ProbeAnnotStore::new();
//!     store.load_probe_stats_file("probe_stats.tsv")?;
//!
//!     let aggregator = Aggregator::new(AggregateConfig::default(), &store)?;
//!     let header = schema.output_header(false, None, false);
//!     let mut writer = MatrixWriter::try_new(std::io::stdout(), &header, false)?;
//!     let written = aggregator.write_all(&samples, &mut writer, &mut thread_rng())?;
//!     writer.finish()?;
//!     eprintln!("{written} simulated samples written");
//!     Ok(())
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;
pub mod utils;

#[cfg(feature = "tools")]
#[cfg_attr(coverage_nightly, coverage(off))]
pub mod tools;

#[allow(unused_imports)]
use prelude::*;
