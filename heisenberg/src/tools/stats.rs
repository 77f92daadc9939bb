use std::io::{
    BufRead,
    Write,
};
use std::path::Path;

use itertools::Itertools;
use log::info;
use serde::{
    Deserialize,
    Serialize,
};
use statrs::statistics::Statistics;

use crate::data_structs::typedef::{
    MethylValue,
    ProbeLabel,
    ProbeSet,
    DEFAULT_MISSING,
    IDENTITY_COLUMNS,
};
use crate::io::compression::open_reader;
use crate::io::MatrixSchema;
use crate::with_field_fn;

#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Probe columns held in memory per pass over the input.
    pub max_probes:  usize,
    /// Value recorded for unparsable cells. `None` leaves them out.
    pub missing:     Option<MethylValue>,
    pub probe_start: usize,
    /// Restrict output to these probes.
    pub probes:      Option<ProbeSet>,
}

impl StatsConfig {
    with_field_fn!(max_probes, usize);
    with_field_fn!(missing, Option<MethylValue>);
    with_field_fn!(probe_start, usize);
    with_field_fn!(probes, Option<ProbeSet>);
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            max_probes:  25_000,
            missing:     Some(DEFAULT_MISSING),
            probe_start: IDENTITY_COLUMNS,
            probes:      None,
        }
    }
}

/// One row of the probe statistics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeStatRecord {
    pub probe: ProbeLabel,
    pub min:   f64,
    pub max:   f64,
    pub mean:  f64,
    /// Sample standard deviation.
    pub stdev: f64,
}

impl ProbeStatRecord {
    pub fn from_values(
        probe: ProbeLabel,
        values: &[f64],
    ) -> Self {
        Self {
            probe,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            mean: Statistics::mean(values.iter()),
            stdev: Statistics::std_dev(values.iter()),
        }
    }
}

/// Per-probe descriptive statistics over a sample matrix.
///
/// Probe columns are processed in chunks of `max_probes`, reading the
/// input once per chunk.
pub struct ProbeStatsCalculator {
    config: StatsConfig,
}

impl ProbeStatsCalculator {
    pub fn new(config: StatsConfig) -> anyhow::Result<Self> {
        if config.max_probes == 0 {
            anyhow::bail!("max probes per chunk must be at least 1")
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &StatsConfig { &self.config }

    /// Column indexes to summarise, split into chunks.
    pub fn column_chunks(
        &self,
        schema: &MatrixSchema,
    ) -> anyhow::Result<Vec<Vec<usize>>> {
        let columns = match self.config.probes.as_ref() {
            Some(probes) => schema.indexes_for_labels(probes.iter())?,
            None => (schema.probe_start()..schema.columns().len()).collect(),
        };
        Ok(columns
            .chunks(self.config.max_probes)
            .map(<[usize]>::to_vec)
            .collect())
    }

    /// Reads the rows after the header and summarises `columns`.
    pub fn compute_chunk<R: BufRead>(
        &self,
        mut reader: R,
        schema: &MatrixSchema,
        columns: &[usize],
    ) -> anyhow::Result<Vec<ProbeStatRecord>> {
        let mut values = vec![Vec::new(); columns.len()];
        let mut line = String::new();
        // header
        reader.read_line(&mut line)?;
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let row = line.trim_end_matches(['\n', '\r']);
            if row.trim().is_empty() {
                continue;
            }
            let fields = row.split('\t').collect_vec();
            for (vals, column) in values.iter_mut().zip(columns) {
                let parsed = fields
                    .get(*column)
                    .and_then(|f| f.trim().parse::<f64>().ok())
                    .or(self.config.missing);
                if let Some(value) = parsed {
                    vals.push(value);
                }
            }
        }

        let mut records = Vec::with_capacity(columns.len());
        for (vals, column) in values.iter().zip(columns) {
            let Some(label) = schema.label_at(*column)
            else {
                anyhow::bail!("column {} is not a probe column", column)
            };
            records.push(ProbeStatRecord::from_values(label.clone(), vals));
        }
        Ok(records)
    }

    /// Computes statistics for every chunk of `path` and writes them to
    /// `sink` under a single header. Returns the number of probes written.
    pub fn run<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        sink: W,
    ) -> anyhow::Result<usize> {
        self.run_with(path, sink, |_, _| {})
    }

    /// Like [`ProbeStatsCalculator::run`], calling `on_chunk(done, total)`
    /// after each chunk is written.
    pub fn run_with<P, W, F>(
        &self,
        path: P,
        sink: W,
        mut on_chunk: F,
    ) -> anyhow::Result<usize>
    where
        P: AsRef<Path>,
        W: Write,
        F: FnMut(usize, usize), {
        let path = path.as_ref();
        let schema = MatrixSchema::from_path(path, self.config.probe_start)?;
        let chunks = self.column_chunks(&schema)?;
        info!(
            "{} probe indexes loaded, {} chunks created",
            chunks.iter().map(Vec::len).sum::<usize>(),
            chunks.len()
        );

        let mut writer = stats_writer(sink);
        let mut written = 0;
        for (i, chunk) in chunks.iter().enumerate() {
            info!("Reading probe chunk {} from {}", i + 1, path.display());
            let records = self.compute_chunk(open_reader(path)?, &schema, chunk)?;
            written += write_records(&mut writer, &records)?;
            on_chunk(i + 1, chunks.len());
        }
        writer.flush()?;
        Ok(written)
    }
}

/// Tab-separated writer emitting the `probe min max mean stdev` header
/// before the first record.
pub fn stats_writer<W: Write>(sink: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_writer(sink)
}

pub fn write_records<W: Write>(
    writer: &mut csv::Writer<W>,
    records: &[ProbeStatRecord],
) -> anyhow::Result<usize> {
    for record in records {
        writer.serialize(record)?;
    }
    Ok(records.len())
}
