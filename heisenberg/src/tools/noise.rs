use log::{
    debug,
    trace,
};
use rand::Rng;

use crate::data_structs::annotation::ProbeAnnotStore;
use crate::data_structs::typedef::MethylValue;
use crate::data_structs::Probe;

/// Adds per-probe noise to a methylation value and simulates dropout caused
/// by homozygous deletions and confounding SNPs.
///
/// Stages run in order and each only runs while the value is above zero:
/// uniform noise within one standard deviation (clamped at zero), one
/// Bernoulli trial per structural variant on its homozygous frequency, and
/// one trial per SNP on its overall frequency. The first successful trial
/// that applies sets the value to exactly zero.
pub struct NoiseInjector<'a> {
    store:   &'a ProbeAnnotStore,
    missing: MethylValue,
}

impl<'a> NoiseInjector<'a> {
    pub fn new(
        store: &'a ProbeAnnotStore,
        missing: MethylValue,
    ) -> Self {
        Self { store, missing }
    }

    pub fn store(&self) -> &'a ProbeAnnotStore { self.store }

    pub fn missing(&self) -> MethylValue { self.missing }

    pub fn is_annotated(
        &self,
        label: &str,
    ) -> bool {
        self.store.get(label).is_some()
    }

    /// Adjusts `value` for `probe`. A negative input marks a missing reading
    /// and yields the missing value untouched.
    pub fn adjust<R: Rng + ?Sized>(
        &self,
        value: MethylValue,
        probe: &Probe,
        rng: &mut R,
    ) -> MethylValue {
        if value < 0.0 {
            return self.missing;
        }

        let mut adjusted = (value + noise(probe.stdev(), rng)).max(0.0);

        if adjusted > 0.0 {
            for sv in self.store.svs_of(probe) {
                if !trial(sv.hom_freq(), rng) {
                    continue;
                }
                if sv.is_deletion() {
                    debug!("Zero out from deletion: {}, {}", probe.label(), sv.label());
                    adjusted = 0.0;
                    break;
                }
                trace!(
                    "Variant {} on {} has no adjustment for its type",
                    sv.label(),
                    probe.label()
                );
            }
        }

        if adjusted > 0.0 {
            if let Some(snp) = self.store.snps_of(probe).find(|snp| trial(Some(snp.freq()), rng)) {
                debug!(
                    "Zero out from confounding SNP: {} - {}, probe: {}",
                    snp.label(),
                    snp.freq(),
                    probe.label()
                );
                adjusted = 0.0;
            }
        }
        adjusted
    }

    /// Like [`NoiseInjector::adjust`], looking the probe up by label.
    /// Values of probes without annotation pass through unchanged.
    pub fn adjust_label<R: Rng + ?Sized>(
        &self,
        value: MethylValue,
        label: &str,
        rng: &mut R,
    ) -> MethylValue {
        match self.store.get(label) {
            Some(probe) => self.adjust(value, probe, rng),
            None => value,
        }
    }
}

fn noise<R: Rng + ?Sized>(
    stdev: Option<f64>,
    rng: &mut R,
) -> f64 {
    match stdev {
        Some(s) if s.is_finite() && s > 0.0 => rng.gen_range(-s..=s),
        _ => 0.0,
    }
}

/// One Bernoulli trial. Absent or unusable probabilities never succeed.
fn trial<R: Rng + ?Sized>(
    p: Option<f64>,
    rng: &mut R,
) -> bool {
    match p {
        Some(p) if !p.is_nan() => rng.gen_bool(p.clamp(0.0, 1.0)),
        _ => false,
    }
}
