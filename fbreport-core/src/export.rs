use std::io::Write;
use serde::Serialize;
use crate::{OverlapFeature, Result};

/// Writes serializable rows as a delimited table with a header row.
pub struct TableExporter<I: Iterator> {
    record_iter: I,
}

impl<T, I: Iterator<Item=T>> TableExporter<I>
    where T: Serialize
{
    pub fn csv(record_iter: I) -> TableExporter<I> {
        TableExporter { record_iter }
    }

    /// Writes every row and returns how many were written.
    pub fn write_all<W: Write>(&mut self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);
        let mut count = 0;
        for record in &mut self.record_iter {
            csv_writer.serialize(record)?;
            count += 1;
        }
        csv_writer.flush()?;
        Ok(count)
    }
}

#[derive(Serialize)]
struct OverlapLine<'a> {
    location: &'a str,
    feature_id: &'a str,
    symbol: Option<&'a str>,
    feature_type: &'a str,
}

/// Writes `<location>\t<feature id>\t<symbol>\t<feature type>` lines, one per
/// overlapping feature, with no header.
pub struct OverlapWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OverlapWriter<W> {
    pub fn new(writer: W) -> OverlapWriter<W> {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);
        OverlapWriter { writer }
    }

    pub fn write(&mut self, location: &str, feature: &OverlapFeature) -> Result<()> {
        self.writer.serialize(OverlapLine {
            location,
            feature_id: &feature.feature_id,
            symbol: feature.symbol.as_deref(),
            feature_type: &feature.feature_type,
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
