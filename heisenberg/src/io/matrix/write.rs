use std::io::Write;

use crate::data_structs::Sample;

/// Writes engine output rows under a fixed header.
///
/// Rows are rendered against the header's layout: when the header carries
/// demographic columns, samples without demographics get empty cells.
pub struct MatrixWriter<W: Write> {
    sink:                 W,
    include_demographics: bool,
    written:              usize,
}

impl<W: Write> MatrixWriter<W> {
    pub fn try_new(
        mut sink: W,
        header: &[String],
        include_demographics: bool,
    ) -> anyhow::Result<Self> {
        writeln!(sink, "{}", header.join("\t"))?;
        Ok(Self {
            sink,
            include_demographics,
            written: 0,
        })
    }

    pub fn write_sample(
        &mut self,
        sample: &Sample,
    ) -> anyhow::Result<()> {
        writeln!(
            self.sink,
            "{}",
            sample.render_with_layout(self.include_demographics)
        )?;
        self.written += 1;
        Ok(())
    }

    /// Number of rows written, header excluded.
    pub fn written(&self) -> usize { self.written }

    pub fn finish(mut self) -> anyhow::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
