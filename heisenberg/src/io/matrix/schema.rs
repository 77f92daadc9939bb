use std::io::BufRead;
use std::path::Path;

use hashbrown::HashMap;
use itertools::Itertools;

use crate::data_structs::typedef::{
    ProbeLabel,
    ProbeSet,
    DEMOGRAPHIC_HEADER,
    IDENTITY_COLUMNS,
};
use crate::error::ConfigError;
use crate::io::compression::open_reader;

/// Column layout of a wide sample matrix, resolved once from its header.
///
/// Columns before `probe_start` hold identity and (optionally) demographic
/// fields, every column from `probe_start` on is a probe.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixSchema {
    columns:     Vec<String>,
    probe_start: usize,
    labels:      Vec<ProbeLabel>,
    index:       HashMap<ProbeLabel, usize>,
}

impl MatrixSchema {
    pub fn from_columns<I, S>(
        columns: I,
        probe_start: usize,
    ) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>, {
        let columns = columns.into_iter().map_into::<String>().collect_vec();
        if columns.len() < IDENTITY_COLUMNS {
            return Err(ConfigError::ShortHeader {
                expected: IDENTITY_COLUMNS,
                found:    columns.len(),
            }
            .into());
        }
        let probe_start = probe_start.max(IDENTITY_COLUMNS);

        let labels = columns
            .iter()
            .skip(probe_start)
            .map(|c| ProbeLabel::from(c.as_str()))
            .collect_vec();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i + probe_start))
            .collect();

        Ok(Self {
            columns,
            probe_start,
            labels,
            index,
        })
    }

    pub fn from_header(
        line: &str,
        probe_start: usize,
    ) -> anyhow::Result<Self> {
        Self::from_columns(
            line.trim_end_matches(['\n', '\r']).split('\t'),
            probe_start,
        )
    }

    /// Consumes the header line from `reader`.
    pub fn read<R: BufRead>(
        reader: &mut R,
        probe_start: usize,
    ) -> anyhow::Result<Self> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            anyhow::bail!("Input matrix is empty, header line expected")
        }
        Self::from_header(&line, probe_start)
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        probe_start: usize,
    ) -> anyhow::Result<Self> {
        let mut reader = open_reader(path.as_ref())?;
        Self::read(&mut reader, probe_start)
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn probe_start(&self) -> usize { self.probe_start }

    /// Whether the layout reserves columns for demographic fields.
    pub fn has_demographics(&self) -> bool {
        self.probe_start > IDENTITY_COLUMNS
    }

    pub fn probe_labels(&self) -> &[ProbeLabel] { &self.labels }

    pub fn n_probes(&self) -> usize { self.labels.len() }

    /// Probe label of a column, `None` for non-probe columns.
    pub fn label_at(
        &self,
        column: usize,
    ) -> Option<&ProbeLabel> {
        column
            .checked_sub(self.probe_start)
            .and_then(|i| self.labels.get(i))
    }

    pub fn index_of(
        &self,
        label: &str,
    ) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Resolves column indexes for `labels`, sorted numerically.
    ///
    /// Any label absent from the header is a configuration error.
    pub fn indexes_for_labels<'a, I>(
        &self,
        labels: I,
    ) -> anyhow::Result<Vec<usize>>
    where
        I: IntoIterator<Item = &'a ProbeLabel>, {
        let mut indexes = Vec::new();
        for label in labels {
            match self.index_of(label) {
                Some(idx) => indexes.push(idx),
                None => {
                    return Err(
                        ConfigError::LabelNotInHeader(label.to_string()).into()
                    )
                },
            }
        }
        indexes.sort_unstable();
        indexes.dedup();
        Ok(indexes)
    }

    /// Header for engine output: identity columns, demographic columns when
    /// requested, then probe labels in lexical order.
    ///
    /// With `required_only` the probe columns are exactly `required`,
    /// otherwise they are the union of input probes and `required`.
    pub fn output_header(
        &self,
        include_demographics: bool,
        required: Option<&ProbeSet>,
        required_only: bool,
    ) -> Vec<String> {
        let mut header = self.columns[..IDENTITY_COLUMNS].to_vec();
        if include_demographics {
            header.extend(DEMOGRAPHIC_HEADER.iter().map(|c| c.to_string()));
        }

        let probes: Vec<&str> = match required {
            Some(required) if required_only => {
                required.iter().map(|l| l.as_str()).sorted().collect()
            },
            Some(required) => {
                self.labels
                    .iter()
                    .chain(required.iter())
                    .map(|l| l.as_str())
                    .sorted()
                    .dedup()
                    .collect()
            },
            None => {
                self.labels
                    .iter()
                    .map(|l| l.as_str())
                    .sorted()
                    .dedup()
                    .collect()
            },
        };
        header.extend(probes.into_iter().map(String::from));
        header
    }
}
