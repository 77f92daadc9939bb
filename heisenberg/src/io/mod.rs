//! Input and output: compressed streams, sample matrices, demographic
//! metadata tables and probe lists.
pub mod compression;
pub mod matrix;
pub mod metadata;
mod probe_list;

pub use matrix::{
    load_samples,
    MatrixReader,
    MatrixSchema,
    MatrixWriter,
};
pub use probe_list::load_probe_list;
