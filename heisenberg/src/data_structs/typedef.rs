use arcstr::ArcStr;
use indexmap::IndexMap;

use super::Sample;

pub type ProbeLabel = ArcStr;
pub type VariantLabel = ArcStr;
pub type MethylValue = f64;
pub type PosType = u64;

/// Samples keyed by sample id, in input order.
pub type SampleSet = IndexMap<String, Sample>;
pub type ProbeSet = hashbrown::HashSet<ProbeLabel>;

/// Marks an absent or unparsable methylation reading.
pub const DEFAULT_MISSING: MethylValue = -1.0;

/// Number of identity columns: case, sample, biospecimen, tissue.
pub const IDENTITY_COLUMNS: usize = 4;
/// Index of the first probe column when demographic columns are present.
pub const DEMOGRAPHIC_PROBE_START: usize = 8;

pub const IDENTITY_HEADER: [&str; IDENTITY_COLUMNS] =
    ["case", "sample", "biospecimen", "tissue"];
pub const DEMOGRAPHIC_HEADER: [&str; 4] =
    ["gender", "age", "age_group", "tumor_stage"];
