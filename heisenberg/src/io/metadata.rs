//! Loaders for demographic metadata kept outside the sample matrices.
use std::io::Read;
use std::path::Path;

use hashbrown::HashMap;
use log::{
    info,
    warn,
};

use crate::data_structs::typedef::SampleSet;
use crate::data_structs::Demographics;
use crate::io::compression::open_reader;

const SRA_HEADER_PREFIX: &str = "project";
const TCGA_HEADER_PREFIX: &str = "case";
const DAYS_PER_YEAR: f64 = 365.0;

mod tcga_columns {
    pub const SUBMITTER: usize = 1;
    pub const GENDER: usize = 3;
    pub const STAGE: usize = 11;
    pub const AGE_DAYS: usize = 12;
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}

/// Sets demographics on `samples` from an SRA table with columns
/// `project, sample, age, age_group, gender`.
///
/// The age group column is ignored, it is always derived from the age.
/// Returns how many samples received demographics; samples without a row
/// are logged.
pub fn load_sra_demographics<R: Read>(
    reader: R,
    samples: &mut SampleSet,
) -> anyhow::Result<usize> {
    let mut found = hashbrown::HashSet::new();
    for record in tsv_reader(reader).into_records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or_default().trim();
        if field(0).starts_with(SRA_HEADER_PREFIX) {
            continue;
        }
        let Some(sample) = samples.get_mut(field(1))
        else {
            continue;
        };
        let Ok(age) = field(2).parse::<f64>()
        else {
            warn!("Unparsable age '{}' for sample {}", field(2), field(1));
            continue;
        };
        sample.set_demographics(Some(Demographics::new(field(4), age, None)));
        found.insert(field(1).to_string());
    }

    for sample_id in samples.keys().filter(|id| !found.contains(*id)) {
        warn!("Metadata not found for sample: {}", sample_id);
    }
    info!(
        "Demographics set for {} of {} samples",
        found.len(),
        samples.len()
    );
    Ok(found.len())
}

/// Reads a TCGA clinical table into case id → demographics.
///
/// Ages are given in days and truncated to whole years.
pub fn load_tcga_demographics<R: Read>(
    reader: R
) -> anyhow::Result<HashMap<String, Demographics>> {
    use tcga_columns::*;

    let mut metadata = HashMap::new();
    for (idx, record) in tsv_reader(reader).into_records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or_default().trim();
        if field(0).starts_with(TCGA_HEADER_PREFIX) {
            continue;
        }
        if record.len() <= AGE_DAYS {
            warn!(
                "Skipping clinical line {}: expected at least {} columns, found {}",
                idx + 1,
                AGE_DAYS + 1,
                record.len()
            );
            continue;
        }
        let Ok(days) = field(AGE_DAYS).parse::<f64>()
        else {
            warn!(
                "Skipping clinical line {}: unparsable age in days '{}'",
                idx + 1,
                field(AGE_DAYS)
            );
            continue;
        };
        let stage = Some(field(STAGE).to_string()).filter(|s| !s.is_empty());
        metadata.insert(
            field(SUBMITTER).to_string(),
            Demographics::new(field(GENDER), (days / DAYS_PER_YEAR).trunc(), stage),
        );
    }
    info!("Clinical metadata loaded for {} cases", metadata.len());
    Ok(metadata)
}

pub fn load_sra_demographics_file<P: AsRef<Path>>(
    path: P,
    samples: &mut SampleSet,
) -> anyhow::Result<usize> {
    info!("Loading normal metadata from {}", path.as_ref().display());
    load_sra_demographics(open_reader(path.as_ref())?, samples)
}

pub fn load_tcga_demographics_file<P: AsRef<Path>>(
    path: P
) -> anyhow::Result<HashMap<String, Demographics>> {
    info!("Loading tumor metadata from {}", path.as_ref().display());
    load_tcga_demographics(open_reader(path.as_ref())?)
}
