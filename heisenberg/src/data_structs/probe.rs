use std::fmt::{
    self,
    Display,
};

use arcstr::ArcStr;
use serde::{
    Deserialize,
    Serialize,
};

use super::enums::VariantKind;
use super::typedef::{
    PosType,
    ProbeLabel,
    VariantLabel,
};
use crate::getter_fn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicSpan {
    pub chrom: ArcStr,
    pub start: PosType,
    pub stop:  PosType,
}

impl GenomicSpan {
    pub fn new(
        chrom: impl Into<ArcStr>,
        start: PosType,
        stop: PosType,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            stop,
        }
    }
}

impl Display for GenomicSpan {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.stop)
    }
}

/// An assay probe with optional location and descriptive statistics.
///
/// Statistics left unset mean "no data", which is distinct from zero.
/// Variant cross-references are labels into the owning
/// [`crate::data_structs::annotation::ProbeAnnotStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    label:   ProbeLabel,
    span:    Option<GenomicSpan>,
    minimum: Option<f64>,
    maximum: Option<f64>,
    mean:    Option<f64>,
    stdev:   Option<f64>,
    svs:     Vec<VariantLabel>,
    snps:    Vec<VariantLabel>,
}

impl Probe {
    getter_fn!(label, ProbeLabel);

    getter_fn!(svs, Vec<VariantLabel>);

    getter_fn!(snps, Vec<VariantLabel>);

    pub fn new(label: impl Into<ProbeLabel>) -> Self {
        Self {
            label:   label.into(),
            span:    None,
            minimum: None,
            maximum: None,
            mean:    None,
            stdev:   None,
            svs:     Vec::new(),
            snps:    Vec::new(),
        }
    }

    pub fn with_span(
        mut self,
        span: Option<GenomicSpan>,
    ) -> Self {
        self.span = span;
        self
    }

    pub fn span(&self) -> Option<&GenomicSpan> { self.span.as_ref() }

    pub fn minimum(&self) -> Option<f64> { self.minimum }

    pub fn maximum(&self) -> Option<f64> { self.maximum }

    pub fn mean(&self) -> Option<f64> { self.mean }

    pub fn stdev(&self) -> Option<f64> { self.stdev }

    /// Fills the span only if none is recorded yet.
    pub fn fill_span(
        &mut self,
        span: Option<GenomicSpan>,
    ) {
        if self.span.is_none() {
            self.span = span;
        }
    }

    /// Overwrites each statistic that is supplied; absent values leave the
    /// recorded one untouched.
    pub fn set_stats(
        &mut self,
        minimum: Option<f64>,
        maximum: Option<f64>,
        mean: Option<f64>,
        stdev: Option<f64>,
    ) {
        fn update(
            field: &mut Option<f64>,
            value: Option<f64>,
        ) {
            if value.is_some() {
                *field = value;
            }
        }
        update(&mut self.minimum, minimum);
        update(&mut self.maximum, maximum);
        update(&mut self.mean, mean);
        update(&mut self.stdev, stdev);
    }

    /// Returns `false` if the variant was already attached.
    pub(crate) fn attach_sv(
        &mut self,
        label: &VariantLabel,
    ) -> bool {
        push_unique(&mut self.svs, label)
    }

    pub(crate) fn attach_snp(
        &mut self,
        label: &VariantLabel,
    ) -> bool {
        push_unique(&mut self.snps, label)
    }
}

impl Display for Probe {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let opt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or("None".into());
        write!(f, "{} pos[", self.label)?;
        match &self.span {
            Some(span) => write!(f, "{}", span)?,
            None => write!(f, "None")?,
        }
        write!(
            f,
            "] stats[min={},max={},mean={},stdev={}]",
            opt(self.minimum),
            opt(self.maximum),
            opt(self.mean),
            opt(self.stdev)
        )
    }
}

/// A structural variant or confounding SNP overlapping one or more probes.
///
/// SNPs only carry the overall frequency; structural variants also carry
/// genotype-specific frequencies and a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeVariant {
    label:    VariantLabel,
    span:     Option<GenomicSpan>,
    kind:     Option<VariantKind>,
    freq:     f64,
    hom_freq: Option<f64>,
    het_freq: Option<f64>,
    probes:   Vec<ProbeLabel>,
}

impl ProbeVariant {
    getter_fn!(label, VariantLabel);

    getter_fn!(probes, Vec<ProbeLabel>);

    pub fn structural(
        label: impl Into<VariantLabel>,
        span: Option<GenomicSpan>,
        kind: VariantKind,
        freq: f64,
        hom_freq: Option<f64>,
        het_freq: Option<f64>,
    ) -> Self {
        Self {
            label: label.into(),
            span,
            kind: Some(kind),
            freq,
            hom_freq,
            het_freq,
            probes: Vec::new(),
        }
    }

    pub fn snp(
        label: impl Into<VariantLabel>,
        freq: f64,
    ) -> Self {
        Self {
            label: label.into(),
            span: None,
            kind: None,
            freq,
            hom_freq: None,
            het_freq: None,
            probes: Vec::new(),
        }
    }

    pub fn span(&self) -> Option<&GenomicSpan> { self.span.as_ref() }

    pub fn kind(&self) -> Option<&VariantKind> { self.kind.as_ref() }

    /// Overall minor-allele frequency.
    pub fn freq(&self) -> f64 { self.freq }

    pub fn hom_freq(&self) -> Option<f64> { self.hom_freq }

    pub fn het_freq(&self) -> Option<f64> { self.het_freq }

    pub fn is_deletion(&self) -> bool {
        self.kind.as_ref().is_some_and(VariantKind::is_deletion)
    }

    pub(crate) fn attach_probe(
        &mut self,
        label: &ProbeLabel,
    ) -> bool {
        push_unique(&mut self.probes, label)
    }
}

impl Display for ProbeVariant {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{} pos[", self.label)?;
        match &self.span {
            Some(span) => write!(f, "{}", span)?,
            None => write!(f, "None")?,
        }
        match &self.kind {
            Some(kind) => write!(f, "], type={}", kind),
            None => write!(f, "], freq={}", self.freq),
        }
    }
}

fn push_unique(
    labels: &mut Vec<ArcStr>,
    label: &ArcStr,
) -> bool {
    if labels.contains(label) {
        false
    }
    else {
        labels.push(label.clone());
        true
    }
}
