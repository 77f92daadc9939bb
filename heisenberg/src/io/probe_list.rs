use std::io::BufRead;
use std::path::Path;

use log::info;

use crate::data_structs::typedef::{
    ProbeLabel,
    ProbeSet,
};
use crate::io::compression::open_reader;

/// Reads a required-probe list: the first tab field of every non-blank line.
pub fn load_probe_list<P: AsRef<Path>>(path: P) -> anyhow::Result<ProbeSet> {
    let path = path.as_ref();
    let probes = read_probe_list(open_reader(path)?)?;
    info!("{} probes listed in {}", probes.len(), path.display());
    Ok(probes)
}

pub(crate) fn read_probe_list<R: BufRead>(reader: R) -> anyhow::Result<ProbeSet> {
    let mut probes = ProbeSet::new();
    for line in reader.lines() {
        let line = line?;
        let label = line.split('\t').next().unwrap_or_default().trim();
        if !label.is_empty() {
            probes.insert(ProbeLabel::from(label));
        }
    }
    Ok(probes)
}
