use std::io::Read;
use std::path::Path;

use hashbrown::HashMap;
use itertools::Itertools;
use log::{
    debug,
    info,
    warn,
};

use crate::data_structs::enums::VariantKind;
use crate::data_structs::probe::{
    GenomicSpan,
    Probe,
    ProbeVariant,
};
use crate::data_structs::typedef::{
    PosType,
    ProbeLabel,
    VariantLabel,
};
use crate::io::compression::open_reader;
use crate::with_field_fn;

const STATS_HEADER_PREFIX: &str = "probe";
const SNP_HEADER_PREFIX: &str = "TargetID";
const SNP_LIST_SEPARATOR: char = ';';

/// Cutoffs applied while loading variant annotations.
#[derive(Debug, Clone)]
pub struct AnnotLoadConfig {
    /// SVs with an overall frequency strictly above this are not attached.
    pub max_sv_maf:   f64,
    /// SNPs with a frequency above this are not attached.
    pub max_snp_maf:  f64,
    /// SNPs further than this from the probe are not attached.
    pub max_distance: i64,
}

impl AnnotLoadConfig {
    with_field_fn!(max_sv_maf, f64);

    with_field_fn!(max_snp_maf, f64);

    with_field_fn!(max_distance, i64);
}

impl Default for AnnotLoadConfig {
    fn default() -> Self {
        Self {
            max_sv_maf:   0.3,
            max_snp_maf:  0.2,
            max_distance: 2,
        }
    }
}

/// Probe annotations cross-referenced with structural variants and
/// confounding SNPs.
///
/// Probes and the two variant kinds live in separate arenas keyed by
/// label; relations are stored as label lists on both sides. Every loader
/// extends the store in place, so any subset of the three sources can be
/// loaded in any order and yields the same merged state.
#[derive(Debug, Clone, Default)]
pub struct ProbeAnnotStore {
    probes: HashMap<ProbeLabel, Probe>,
    svs:    HashMap<VariantLabel, ProbeVariant>,
    snps:   HashMap<VariantLabel, ProbeVariant>,
}

impl ProbeAnnotStore {
    pub fn new() -> Self { Self::default() }

    pub fn get(
        &self,
        label: &str,
    ) -> Option<&Probe> {
        self.probes.get(label)
    }

    pub fn get_sv(
        &self,
        label: &str,
    ) -> Option<&ProbeVariant> {
        self.svs.get(label)
    }

    pub fn get_snp(
        &self,
        label: &str,
    ) -> Option<&ProbeVariant> {
        self.snps.get(label)
    }

    /// Structural variants attached to `probe`, in load order.
    pub fn svs_of<'a>(
        &'a self,
        probe: &'a Probe,
    ) -> impl Iterator<Item = &'a ProbeVariant> + 'a {
        probe
            .svs()
            .iter()
            .filter_map(|label| self.svs.get(label))
    }

    /// Confounding SNPs attached to `probe`, in load order.
    pub fn snps_of<'a>(
        &'a self,
        probe: &'a Probe,
    ) -> impl Iterator<Item = &'a ProbeVariant> + 'a {
        probe
            .snps()
            .iter()
            .filter_map(|label| self.snps.get(label))
    }

    pub fn probes(&self) -> &HashMap<ProbeLabel, Probe> { &self.probes }

    pub fn len(&self) -> usize { self.probes.len() }

    pub fn is_empty(&self) -> bool { self.probes.is_empty() }

    pub fn n_svs(&self) -> usize { self.svs.len() }

    pub fn n_snps(&self) -> usize { self.snps.len() }

    /// Returns the probe for `label`, creating an empty one if needed.
    pub fn probe_entry(
        &mut self,
        label: &str,
    ) -> &mut Probe {
        self.probes
            .entry(ProbeLabel::from(label))
            .or_insert_with(|| Probe::new(label))
    }

    /// Inserts a probe, merging into an existing one with the same label.
    pub fn insert_probe(
        &mut self,
        probe: Probe,
    ) {
        match self.probes.get_mut(probe.label().as_str()) {
            Some(existing) => {
                existing.fill_span(probe.span().cloned());
                existing.set_stats(
                    probe.minimum(),
                    probe.maximum(),
                    probe.mean(),
                    probe.stdev(),
                );
            },
            None => {
                self.probes.insert(probe.label().clone(), probe);
            },
        }
    }

    /// Links a structural variant to a probe in both directions. The
    /// variant must already be in the store.
    pub fn link_sv(
        &mut self,
        probe: &str,
        sv: &str,
    ) -> bool {
        let Some(variant) = self.svs.get_mut(sv)
        else {
            return false;
        };
        let probe_label = ProbeLabel::from(probe);
        variant.attach_probe(&probe_label);
        let variant_label = variant.label().clone();
        self.probe_entry(probe).attach_sv(&variant_label)
    }

    /// Links a confounding SNP to a probe in both directions, inserting the
    /// SNP record if it is new.
    pub fn link_snp(
        &mut self,
        probe: &str,
        snp: ProbeVariant,
    ) -> bool {
        let probe_label = ProbeLabel::from(probe);
        let variant = self
            .snps
            .entry(snp.label().clone())
            .or_insert(snp);
        variant.attach_probe(&probe_label);
        let variant_label = variant.label().clone();
        self.probe_entry(probe).attach_snp(&variant_label)
    }

    /// Reads a `probe min max mean stdev` table.
    ///
    /// Re-loading a label overwrites its four statistics and nothing else.
    /// Returns the number of rows applied.
    pub fn load_probe_stats<R: Read>(
        &mut self,
        reader: R,
    ) -> anyhow::Result<usize> {
        let mut applied = 0;
        for (line_no, fields) in tsv_records(reader) {
            let fields = fields?;
            if fields.first().is_some_and(|f| f == STATS_HEADER_PREFIX) {
                continue;
            }
            if fields.len() != 5 {
                warn!(
                    "Skipping probe stats line {}: expected 5 columns, found {}",
                    line_no,
                    fields.len()
                );
                continue;
            }
            let parse = |i: usize| fields[i].parse::<f64>().ok();
            self.probe_entry(&fields[0])
                .set_stats(parse(1), parse(2), parse(3), parse(4));
            applied += 1;
        }
        info!("{} probe stats records loaded", applied);
        Ok(applied)
    }

    /// Reads the headerless structural-variant overlap table.
    ///
    /// Columns: probe, chrom, probe start, probe stop, sv name, sv type,
    /// sv start, sv stop, sv allele frequency, hom frequency, het frequency.
    /// A variant whose overall frequency is greater than `max_maf` is kept
    /// in the store but attached to no probe.
    pub fn load_structural_variants<R: Read>(
        &mut self,
        reader: R,
        max_maf: f64,
    ) -> anyhow::Result<usize> {
        let mut rows = 0;
        for (line_no, fields) in tsv_records(reader) {
            let fields = fields?;
            if fields.len() < 9 {
                warn!(
                    "Skipping structural variant line {}: expected 11 columns, found {}",
                    line_no,
                    fields.len()
                );
                continue;
            }
            let Ok(freq) = fields[8].parse::<f64>()
            else {
                warn!(
                    "Skipping structural variant line {}: unparsable frequency '{}'",
                    line_no, fields[8]
                );
                continue;
            };
            let optional = |i: usize| fields.get(i).and_then(|f| f.parse::<f64>().ok());

            let probe_label = fields[0].as_str();
            let sv_label = VariantLabel::from(fields[4].as_str());
            if !self.svs.contains_key(&sv_label) {
                let kind = fields[5].parse::<VariantKind>().unwrap_or_else(|e| match e {});
                let sv = ProbeVariant::structural(
                    sv_label.clone(),
                    parse_span(&fields[1], &fields[6], &fields[7]),
                    kind,
                    freq,
                    optional(9),
                    optional(10),
                );
                self.svs.insert(sv_label.clone(), sv);
            }

            let probe_span = parse_span(&fields[1], &fields[2], &fields[3]);
            self.probe_entry(probe_label).fill_span(probe_span);

            // the variant record from its first row is authoritative
            let sv_freq = self.svs[&sv_label].freq();
            if sv_freq <= max_maf {
                self.link_sv(probe_label, &sv_label);
            }
            else {
                debug!(
                    "Not attaching {} to {}: frequency {} above {}",
                    sv_label, probe_label, sv_freq, max_maf
                );
            }
            rows += 1;
        }
        info!(
            "{} structural variant rows loaded, {} variants known",
            rows,
            self.svs.len()
        );
        Ok(rows)
    }

    /// Reads the confounding-SNP table: probe, then `;`-joined parallel
    /// lists of SNP ids, distances and minor-allele frequencies.
    ///
    /// A SNP is attached when its distance is at most `max_distance` and its
    /// frequency at most `max_maf`.
    pub fn load_confounding_snps<R: Read>(
        &mut self,
        reader: R,
        max_distance: i64,
        max_maf: f64,
    ) -> anyhow::Result<usize> {
        let mut rows = 0;
        for (line_no, fields) in tsv_records(reader) {
            let fields = fields?;
            if fields.first().is_some_and(|f| f.starts_with(SNP_HEADER_PREFIX)) {
                continue;
            }
            if fields.len() != 4 {
                warn!(
                    "Skipping confounding SNP line {}: expected 4 columns, found {}",
                    line_no,
                    fields.len()
                );
                continue;
            }
            let probe_label = fields[0].as_str();
            self.probe_entry(probe_label);

            let rs_ids = fields[1].split(SNP_LIST_SEPARATOR).collect_vec();
            let distances = fields[2].split(SNP_LIST_SEPARATOR).collect_vec();
            let mafs = fields[3].split(SNP_LIST_SEPARATOR).collect_vec();
            if rs_ids.len() != distances.len() || rs_ids.len() != mafs.len() {
                warn!(
                    "Confounding SNP line {} has unequal list lengths ({}, {}, {})",
                    line_no,
                    rs_ids.len(),
                    distances.len(),
                    mafs.len()
                );
            }

            for ((rs_id, distance), maf) in rs_ids.iter().zip(distances).zip(mafs) {
                let (Ok(distance), Ok(maf)) =
                    (distance.trim().parse::<i64>(), maf.trim().parse::<f64>())
                else {
                    warn!(
                        "Skipping SNP {} for probe {}: unparsable distance or frequency",
                        rs_id, probe_label
                    );
                    continue;
                };
                if distance <= max_distance && maf <= max_maf {
                    self.link_snp(probe_label, ProbeVariant::snp(*rs_id, maf));
                }
            }
            rows += 1;
        }
        info!(
            "{} confounding SNP rows loaded, {} SNPs attached",
            rows,
            self.snps.len()
        );
        Ok(rows)
    }

    pub fn load_probe_stats_file<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> anyhow::Result<usize> {
        info!("Loading probe stats from {}", path.as_ref().display());
        self.load_probe_stats(open_reader(path.as_ref())?)
    }

    pub fn load_structural_variants_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        max_maf: f64,
    ) -> anyhow::Result<usize> {
        info!(
            "Loading structural variants from {} max maf = {}",
            path.as_ref().display(),
            max_maf
        );
        self.load_structural_variants(open_reader(path.as_ref())?, max_maf)
    }

    pub fn load_confounding_snps_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        max_distance: i64,
        max_maf: f64,
    ) -> anyhow::Result<usize> {
        info!(
            "Loading confounding SNPs from {} max maf = {}, max distance = {}",
            path.as_ref().display(),
            max_maf,
            max_distance
        );
        self.load_confounding_snps(
            open_reader(path.as_ref())?,
            max_distance,
            max_maf,
        )
    }

    /// Loads whichever of the three annotation files are given.
    pub fn from_files(
        probe_stats: Option<&Path>,
        structural_variants: Option<&Path>,
        confounding_snps: Option<&Path>,
        config: &AnnotLoadConfig,
    ) -> anyhow::Result<Self> {
        let mut store = Self::new();
        if let Some(path) = structural_variants {
            store.load_structural_variants_file(path, config.max_sv_maf)?;
            info!("{} probes after loading svs", store.len());
        }
        if let Some(path) = confounding_snps {
            store.load_confounding_snps_file(
                path,
                config.max_distance,
                config.max_snp_maf,
            )?;
            info!("{} probes after loading snps", store.len());
        }
        if let Some(path) = probe_stats {
            store.load_probe_stats_file(path)?;
            info!("{} probes after loading stats", store.len());
        }
        Ok(store)
    }
}

fn parse_span(
    chrom: &str,
    start: &str,
    stop: &str,
) -> Option<GenomicSpan> {
    let start = start.parse::<PosType>().ok()?;
    let stop = stop.parse::<PosType>().ok()?;
    Some(GenomicSpan::new(chrom, start, stop))
}

/// Tab-separated records as trimmed owned fields, numbered from 1.
///
/// Malformed records are skipped with a warning; I/O failures are returned.
fn tsv_records<R: Read>(
    reader: R
) -> impl Iterator<Item = (usize, anyhow::Result<Vec<String>>)> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
        .into_records()
        .enumerate()
        .filter_map(|(i, record)| {
            let line_no = i + 1;
            match record {
                Ok(record) => {
                    let fields = record
                        .iter()
                        .map(|f| f.trim().to_string())
                        .collect_vec();
                    if fields.iter().all(|f| f.is_empty()) {
                        None
                    }
                    else {
                        Some((line_no, Ok(fields)))
                    }
                },
                Err(e) if e.is_io_error() => Some((line_no, Err(e.into()))),
                Err(e) => {
                    warn!("Skipping malformed line {}: {}", line_no, e);
                    None
                },
            }
        })
}
