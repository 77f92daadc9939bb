//! Simulation engines and the probe statistics they consume.
//!
//! - [`noise`]: the per-probe noise and variant dropout injector.
//! - [`aggregate`]: synthetic samples from the mean of every k-subset of a
//!   population.
//! - [`mixture`]: synthetic tumor/normal mixtures at a fixed tumor fraction,
//!   optionally matched by demographics.
//! - [`stats`]: descriptive statistics per probe, written in the format the
//!   annotation store loads.
pub mod aggregate;
pub mod mixture;
pub mod noise;
pub mod stats;

pub use aggregate::{
    AggregateConfig,
    AggregateIter,
    Aggregator,
};
pub use mixture::{
    filter_by_demographics,
    match_by_demographics,
    MixConfig,
    MixOutcome,
    MixSummary,
    Mixer,
    METASTATIC,
};
pub use noise::NoiseInjector;
pub use stats::{
    ProbeStatRecord,
    ProbeStatsCalculator,
    StatsConfig,
};
