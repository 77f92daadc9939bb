pub use crate::data_structs::annotation::{
    AnnotLoadConfig,
    ProbeAnnotStore,
};
pub use crate::data_structs::typedef::{
    MethylValue,
    ProbeLabel,
    ProbeSet,
    SampleSet,
    DEFAULT_MISSING,
};
pub use crate::data_structs::{
    AgeGroup,
    Demographics,
    GenomicSpan,
    Probe,
    ProbeVariant,
    Sample,
    SampleParseConfig,
    TissueClass,
    VariantKind,
};
pub use crate::error::ConfigError;
pub use crate::io::compression::Compression;
pub use crate::io::{
    load_probe_list,
    load_samples,
    MatrixReader,
    MatrixSchema,
    MatrixWriter,
};
#[cfg(feature = "tools")]
pub use crate::tools::{
    AggregateConfig,
    Aggregator,
    MixConfig,
    MixOutcome,
    MixSummary,
    Mixer,
    NoiseInjector,
    ProbeStatsCalculator,
    StatsConfig,
};
