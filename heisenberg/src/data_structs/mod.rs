//! Core data structures: samples with their probe values and demographics,
//! probe and variant annotations, and the label types shared by both.
//!
//! - [`Sample`] holds one row of a sample matrix. [`Demographics`] is
//!   optional and may be back-filled from a metadata table.
//! - [`annotation`]: [`Probe`] and [`ProbeVariant`] records joined by label in
//!   a [`annotation::ProbeAnnotStore`].
//! - [`typedef`]: label aliases, the missing-value sentinel and column layout
//!   constants.

pub mod annotation;
mod enums;
mod probe;
mod sample;
pub mod typedef;

#[cfg(test)]
mod tests;

pub use enums::{
    AgeGroup,
    TissueClass,
    VariantKind,
};
pub use probe::{
    GenomicSpan,
    Probe,
    ProbeVariant,
};
pub use sample::{
    Demographics,
    Sample,
    SampleParseConfig,
};
