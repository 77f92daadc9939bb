//! Wide tab-separated sample matrices: one header line, then one row per
//! sample with identity columns, optional demographic columns and a value
//! per probe.
mod read;
mod schema;
mod write;

pub use read::{
    load_samples,
    MatrixReader,
};
pub use schema::MatrixSchema;
pub use write::MatrixWriter;
