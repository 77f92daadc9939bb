use std::fs::File;
use std::io::{
    stdin,
    stdout,
    BufRead,
    BufReader,
    BufWriter,
    Read,
    Write,
};
use std::path::Path;

use anyhow::Context;
use log::debug;

/// Stream compression, picked from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    None,
    Gz,
    #[cfg(feature = "compression")]
    Zstd,
    #[cfg(feature = "compression")]
    Xz2,
    #[cfg(feature = "compression")]
    Bzip2,
}

impl Compression {
    pub fn name(&self) -> &str {
        match self {
            Compression::None => "none",
            Compression::Gz => "gzip",
            #[cfg(feature = "compression")]
            Compression::Zstd => "zstd",
            #[cfg(feature = "compression")]
            Compression::Xz2 => "xz2",
            #[cfg(feature = "compression")]
            Compression::Bzip2 => "bzip2",
        }
    }

    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gz") => Compression::Gz,
            #[cfg(feature = "compression")]
            Some("zst") => Compression::Zstd,
            #[cfg(feature = "compression")]
            Some("xz") => Compression::Xz2,
            #[cfg(feature = "compression")]
            Some("bz2") => Compression::Bzip2,
            _ => Compression::None,
        }
    }

    pub fn get_decoder<R: Read + 'static>(
        &self,
        handle: R,
    ) -> anyhow::Result<Box<dyn Read>> {
        let decoder: Box<dyn Read> = match self {
            // concatenated members are common in bgzipped matrices
            Compression::Gz => Box::new(flate2::read::MultiGzDecoder::new(handle)),
            #[cfg(feature = "compression")]
            Compression::Zstd => Box::new(zstd::Decoder::new(handle)?),
            #[cfg(feature = "compression")]
            Compression::Xz2 => Box::new(xz2::read::XzDecoder::new(handle)),
            #[cfg(feature = "compression")]
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(handle)),
            Compression::None => Box::new(handle),
        };
        Ok(decoder)
    }

    /// Encoders finish their stream when dropped.
    pub fn get_encoder<W: Write + 'static>(
        &self,
        handle: W,
        compression_level: u32,
    ) -> anyhow::Result<Box<dyn Write>> {
        let encoder: Box<dyn Write> = match self {
            Compression::Gz => {
                Box::new(flate2::write::GzEncoder::new(
                    handle,
                    flate2::Compression::new(compression_level.min(9)),
                ))
            },
            #[cfg(feature = "compression")]
            Compression::Zstd => {
                Box::new(
                    zstd::Encoder::new(handle, compression_level as i32)?
                        .auto_finish(),
                )
            },
            #[cfg(feature = "compression")]
            Compression::Xz2 => {
                Box::new(xz2::write::XzEncoder::new(
                    handle,
                    compression_level.min(9),
                ))
            },
            #[cfg(feature = "compression")]
            Compression::Bzip2 => {
                Box::new(bzip2::write::BzEncoder::new(
                    handle,
                    bzip2::Compression::new(compression_level.clamp(1, 9)),
                ))
            },
            Compression::None => Box::new(handle),
        };
        Ok(encoder)
    }
}

pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

fn is_stdio(path: &Path) -> bool { path.as_os_str() == "-" }

/// Opens `path` for buffered reading, decompressing by extension.
/// `-` reads standard input.
pub fn open_reader(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if is_stdio(path) {
        return Ok(Box::new(BufReader::new(stdin())));
    }
    let compression = Compression::from_path(path);
    debug!(
        "Opening {} for reading ({})",
        path.display(),
        compression.name()
    );
    let handle = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(Box::new(BufReader::new(compression.get_decoder(handle)?)))
}

/// Creates `path` for buffered writing, compressing by extension.
/// `-` writes standard output.
pub fn open_writer(path: &Path) -> anyhow::Result<Box<dyn Write>> {
    if is_stdio(path) {
        return Ok(Box::new(BufWriter::new(stdout())));
    }
    let compression = Compression::from_path(path);
    debug!(
        "Opening {} for writing ({})",
        path.display(),
        compression.name()
    );
    let handle = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(
        compression.get_encoder(handle, DEFAULT_COMPRESSION_LEVEL)?,
    )))
}
