use std::io::BufRead;
use std::path::Path;

use log::{
    info,
    warn,
};

use super::MatrixSchema;
use crate::data_structs::typedef::SampleSet;
use crate::data_structs::{
    Sample,
    SampleParseConfig,
};
use crate::io::compression::open_reader;

/// Iterates the rows of a sample matrix as [`Sample`]s.
///
/// The header is consumed on construction. Blank lines are skipped.
pub struct MatrixReader<R: BufRead> {
    reader:  R,
    schema:  MatrixSchema,
    config:  SampleParseConfig,
    line:    String,
    line_no: usize,
}

impl<R: BufRead> MatrixReader<R> {
    pub fn try_new(
        mut reader: R,
        probe_start: usize,
        config: SampleParseConfig,
    ) -> anyhow::Result<Self> {
        let schema = MatrixSchema::read(&mut reader, probe_start)?;
        Ok(Self {
            reader,
            schema,
            config,
            line: String::new(),
            line_no: 1,
        })
    }

    pub fn schema(&self) -> &MatrixSchema { &self.schema }

    pub fn config(&self) -> &SampleParseConfig { &self.config }

    fn next_line(&mut self) -> anyhow::Result<Option<&str>> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            if !self.line.trim().is_empty() {
                return Ok(Some(self.line.as_str()));
            }
        }
    }
}

impl<R: BufRead> Iterator for MatrixReader<R> {
    type Item = anyhow::Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.next_line() {
            Ok(Some(line)) => line.to_owned(),
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };
        Some(Sample::parse(&line, Some(&self.schema), &self.config))
    }
}

/// Reads a whole matrix into memory, keyed by sample id in input order.
///
/// A repeated sample id replaces the earlier row.
pub fn load_samples<P: AsRef<Path>>(
    path: P,
    probe_start: usize,
    config: SampleParseConfig,
) -> anyhow::Result<(MatrixSchema, SampleSet)> {
    let path = path.as_ref();
    info!("Loading samples from {}", path.display());
    let mut reader = MatrixReader::try_new(open_reader(path)?, probe_start, config)?;

    let mut samples = SampleSet::new();
    for sample in reader.by_ref() {
        let sample = sample?;
        if samples.contains_key(sample.sample()) {
            warn!("Duplicate sample id {}, keeping the last row", sample.sample());
        }
        samples.insert(sample.sample().clone(), sample);
    }
    info!(
        "{} samples with {} probes loaded from {}",
        samples.len(),
        reader.schema().n_probes(),
        path.display()
    );
    Ok((reader.schema().clone(), samples))
}
