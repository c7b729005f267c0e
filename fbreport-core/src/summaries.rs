//! Gene summary source selection.
//!
//! Models which summary ends up at the top of a gene report, given how many
//! summaries of each kind a gene has in Chado and whether the Alliance has a
//! description for it.

use std::collections::HashSet;
use std::fmt;
use std::io::{Read, Write};
use crate::{Error, Result};

const NO_DESCRIPTION: &str = "no description available";

pub const MERGED_HEADER: &str = "#FBgn\tSymbol\tGene_Snapshot\tUniProt_Function\tFlyBase_Pathway\tFlyBase_Gene_Group\tInteractive_Fly\tAlliance_Gene_Description\tSelected";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SummarySource {
    GeneSnapshot,
    UniProtFunction,
    Pathway,
    Pathways,
    GeneGroup,
    GeneGroups,
    InteractiveFly,
    AllianceDescription,
    Automatic,
}

impl fmt::Display for SummarySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SummarySource::GeneSnapshot => "Gene Snapshot",
            SummarySource::UniProtFunction => "UniProt Function",
            SummarySource::Pathway => "FlyBase Pathway",
            SummarySource::Pathways => "FlyBase Pathway (multiple)",
            SummarySource::GeneGroup => "FlyBase Gene Group",
            SummarySource::GeneGroups => "FlyBase Gene Group (multiple)",
            SummarySource::InteractiveFly => "Interactive Fly",
            SummarySource::AllianceDescription => "Alliance Gene Description",
            SummarySource::Automatic => "Automatic summary",
        };
        f.write_str(label)
    }
}

/// Number of summaries of each kind a gene has.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SummaryCounts {
    pub gene_snapshot: u32,
    pub uniprot_function: u32,
    pub pathway: u32,
    pub gene_group: u32,
    pub interactive_fly: u32,
    pub alliance_description: u32,
}

impl SummaryCounts {
    /// The summary a gene report would show, in priority order.
    pub fn selected(&self) -> SummarySource {
        if self.gene_snapshot >= 1 {
            SummarySource::GeneSnapshot
        } else if self.uniprot_function >= 1 {
            SummarySource::UniProtFunction
        } else if self.pathway == 1 {
            SummarySource::Pathway
        } else if self.pathway > 1 {
            SummarySource::Pathways
        } else if self.gene_group == 1 {
            SummarySource::GeneGroup
        } else if self.gene_group > 1 {
            SummarySource::GeneGroups
        } else if self.interactive_fly >= 1 {
            SummarySource::InteractiveFly
        } else if self.alliance_description >= 1 {
            SummarySource::AllianceDescription
        } else {
            SummarySource::Automatic
        }
    }
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .from_reader(reader)
}

/// Reads an Alliance gene description file and returns the ids of genes that
/// have a description. Only the "no description available" placeholder
/// (any case) disqualifies a gene. Leading `FB:` prefixes are dropped.
pub fn described_genes<R: Read>(reader: R) -> Result<HashSet<String>> {
    let mut described = HashSet::new();
    for row in tsv_reader(reader).records() {
        let row = row?;
        let gene_id = match row.get(0) {
            Some(id) => id.replacen("FB:", "", 1),
            None => continue,
        };
        let description = row.get(2).unwrap_or("");
        if description.to_lowercase() != NO_DESCRIPTION {
            described.insert(gene_id);
        }
    }
    Ok(described)
}

/// Appends the Alliance flag and selected summary to every row of a Chado
/// summary count file. Returns the number of rows written.
pub fn merge_summary_counts<R: Read, W: Write>(
    chado_counts: R,
    described: &HashSet<String>,
    out: W,
) -> Result<usize> {
    let mut out = out;
    writeln!(out, "{}", MERGED_HEADER)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .flexible(true)
        .from_writer(out);

    let mut written = 0;
    for (i, row) in tsv_reader(chado_counts).records().enumerate() {
        let row = row?;
        let gene_id = row.get(0).unwrap_or("");
        let count = |column: usize| -> Result<u32> {
            let cell = row.get(column).ok_or_else(|| Error::InvalidInput(
                format!("row {} ({}) has no column {}", i + 1, gene_id, column + 1)))?;
            cell.trim().parse::<u32>().map_err(|_| Error::InvalidInput(
                format!("row {} ({}) has non-numeric count '{}'", i + 1, gene_id, cell)))
        };

        let alliance = gene_id.starts_with("FBgn") && described.contains(gene_id);
        let counts = SummaryCounts {
            gene_snapshot: count(2)?,
            uniprot_function: count(3)?,
            pathway: count(4)?,
            gene_group: count(5)?,
            interactive_fly: count(6)?,
            alliance_description: alliance as u32,
        };

        let flag = if alliance { "1" } else { "0" };
        let selected = counts.selected().to_string();
        let mut record: Vec<&str> = row.iter().collect();
        record.push(flag);
        record.push(&selected);
        writer.write_record(&record)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_selection_priority() {
        let none = SummaryCounts::default();
        assert_eq!(none.selected(), SummarySource::Automatic);

        let snapshot = SummaryCounts { gene_snapshot: 1, uniprot_function: 3, ..none };
        assert_eq!(snapshot.selected(), SummarySource::GeneSnapshot);

        let uniprot = SummaryCounts { uniprot_function: 1, pathway: 2, ..none };
        assert_eq!(uniprot.selected(), SummarySource::UniProtFunction);

        assert_eq!(SummaryCounts { pathway: 1, ..none }.selected(), SummarySource::Pathway);
        assert_eq!(SummaryCounts { pathway: 2, ..none }.selected(), SummarySource::Pathways);
        assert_eq!(SummaryCounts { gene_group: 1, ..none }.selected(), SummarySource::GeneGroup);
        assert_eq!(SummaryCounts { gene_group: 4, ..none }.selected(), SummarySource::GeneGroups);
        assert_eq!(SummaryCounts { interactive_fly: 1, alliance_description: 1, ..none }.selected(), SummarySource::InteractiveFly);
        assert_eq!(SummaryCounts { alliance_description: 1, ..none }.selected(), SummarySource::AllianceDescription);
    }

    #[test]
    fn test_described_genes() {
        let input = "\
# Alliance gene descriptions
FB:FBgn0000490\tdpp\tExhibits BMP receptor binding activity.
FB:FBgn0000001\ta\tNo description available
FB:FBgn0000002\tb\t
FB:FBgn0000003\tc
FB:FBgn0000004\td\tNO DESCRIPTION AVAILABLE
";
        let described = described_genes(Cursor::new(input)).unwrap();
        let mut ids: Vec<&str> = described.iter().map(String::as_str).collect();
        ids.sort();
        assert_eq!(ids, vec!["FBgn0000002", "FBgn0000003", "FBgn0000490"]);
    }

    #[test]
    fn test_merge_summary_counts() {
        let chado = "\
FBgn0000490\tdpp\t1\t1\t0\t0\t0
FBgn0000001\ta\t0\t0\t2\t0\t0
FBgn0000002\tb\t0\t0\t0\t0\t0
FBgn0000003\tc\t0\t0\t0\t0\t0
";
        let mut described = HashSet::new();
        described.insert("FBgn0000002".to_string());

        let mut out = Vec::new();
        let written = merge_summary_counts(Cursor::new(chado), &described, &mut out).unwrap();
        assert_eq!(written, 4);

        let expected = format!("{}\n{}", MERGED_HEADER, "\
FBgn0000490\tdpp\t1\t1\t0\t0\t0\t0\tGene Snapshot
FBgn0000001\ta\t0\t0\t2\t0\t0\t0\tFlyBase Pathway (multiple)
FBgn0000002\tb\t0\t0\t0\t0\t0\t1\tAlliance Gene Description
FBgn0000003\tc\t0\t0\t0\t0\t0\t0\tAutomatic summary
");
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_non_numeric_count() {
        let chado = "FBgn0000490\tdpp\tmany\t0\t0\t0\t0\n";
        let err = merge_summary_counts(Cursor::new(chado), &HashSet::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
