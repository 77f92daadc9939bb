//! Probe annotation store: probe statistics, structural variants and
//! confounding SNPs, joined by probe label.
mod annot_store;

pub use annot_store::{
    AnnotLoadConfig,
    ProbeAnnotStore,
};
