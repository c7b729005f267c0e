use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};
use crate::{
    find_overlaps, low_coverage, select_candidates, summarize_annotations, summarize_conservation,
    CandidateCriteria, CandidateGene, ConservationSummaries, CoordinateRange, Error,
    EvidenceFilter, GeneAnnotationSummary, GeneUniverse, Organism, OrthologySource, OverlapFeature,
    OverlapWriter, ReportConfig, Result, SequenceCache, SequenceLookup, Store, TableExporter,
    TranscriptFilter,
};

/// Everything the conserved-but-understudied gene report derives.
#[derive(Debug, Clone)]
pub struct DarkGenesReport {
    pub organism: Organism,
    pub annotations: Vec<GeneAnnotationSummary>,
    pub conservation: ConservationSummaries,
    pub criteria: CandidateCriteria,
    pub candidates: Vec<CandidateGene>,
}

/// Finds genes with experimental annotation in few aspects that are
/// nonetheless conserved across every reference species.
pub fn conserved_dark_genes<S: Store + ?Sized>(store: &mut S, config: &ReportConfig) -> Result<DarkGenesReport> {
    let universe = GeneUniverse::from_config(config)?;
    let filter = EvidenceFilter::from_config(&config.evidence)?;
    let source = OrthologySource::from_config(&config.conservation);

    let annotations = summarize_annotations(store, &universe, &filter)?;
    let conservation = summarize_conservation(store, &universe, &source)?;

    let required_species_count = match config.conservation.required_species_count {
        Some(count) => count,
        None => {
            info!(species = conservation.species_observed, "deriving required species count from orthology source");
            conservation.species_observed
        }
    };
    let criteria = CandidateCriteria {
        max_coverage: config.conservation.max_coverage,
        required_species_count,
        absent: config.conservation.absent_conservation,
    };
    let candidates = select_candidates(&annotations, &conservation, &criteria);
    info!(
        genes = annotations.len(),
        conserved = conservation.genes().len(),
        candidates = candidates.len(),
        "selected candidate genes"
    );

    Ok(DarkGenesReport {
        organism: config.organism.clone(),
        annotations,
        conservation,
        criteria,
        candidates,
    })
}

impl DarkGenesReport {
    pub fn low_coverage(&self) -> Vec<&GeneAnnotationSummary> {
        low_coverage(&self.annotations, self.criteria.max_coverage)
    }

    /// Short organism prefix for file names, e.g. `dmel`.
    pub fn file_prefix(&self) -> String {
        let genus = self.organism.genus.chars().take(1);
        let species = self.organism.species.chars().take(3);
        genus.chain(species).collect::<String>().to_lowercase()
    }

    /// Writes the four report tables into `dir`, returning their paths.
    pub fn write_to_dir(&self, dir: &Path) -> Result<Vec<std::path::PathBuf>> {
        std::fs::create_dir_all(dir)?;
        let prefix = self.file_prefix();

        let go_counts = dir.join(format!("{}_go_counts.csv", prefix));
        let few_aspects = dir.join(format!("{}_few_go_aspects.csv", prefix));
        let species_counts = dir.join(format!("{}_orthologs_species_count.csv", prefix));
        let final_list = dir.join("conserved_darkened_genes.csv");

        write_table(&go_counts, TableExporter::csv(self.annotations.iter()))?;
        write_table(&few_aspects, TableExporter::csv(self.low_coverage().into_iter()))?;
        write_table(&species_counts, TableExporter::csv(self.conservation.genes().iter()))?;
        info!(path = %final_list.display(), "saving final gene list");
        write_table(&final_list, TableExporter::csv(self.candidates.iter()))?;

        Ok(vec![go_counts, few_aspects, species_counts, final_list])
    }
}

fn write_table<T, I>(path: &Path, mut exporter: TableExporter<I>) -> Result<()>
    where T: serde::Serialize,
          I: Iterator<Item=T>,
{
    let file = BufWriter::new(File::create(path)?);
    let rows = exporter.write_all(file)?;
    info!(path = %path.display(), rows, "wrote table");
    Ok(())
}

/// Counts from one pass over a location file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub lines: usize,
    pub blank: usize,
    pub malformed: usize,
    pub not_found: usize,
    pub matched: usize,
    pub features: usize,
}

/// Resolves a file of locations to the transcripts overlapping each one.
pub struct OverlapBatch<'s, S: Store + ?Sized> {
    store: &'s mut S,
    cache: SequenceCache,
    filter: TranscriptFilter,
}

impl<'s, S: Store + ?Sized> OverlapBatch<'s, S> {
    pub fn new(store: &'s mut S, config: &ReportConfig) -> Result<OverlapBatch<'s, S>> {
        Ok(OverlapBatch {
            store,
            cache: SequenceCache::new(SequenceLookup::from_config(config)),
            filter: TranscriptFilter::from_config(config)?,
        })
    }

    pub fn cache(&self) -> &SequenceCache {
        &self.cache
    }

    /// Looks up one parsed location.
    pub fn lookup(&mut self, range: CoordinateRange) -> Result<BTreeMap<String, OverlapFeature>> {
        let range = range.validate()?;
        let sequence_id = self.cache.resolve(&mut *self.store, &range.scaffold)?;
        find_overlaps(&mut *self.store, &self.filter, sequence_id, &range)
    }

    /// Reads one location per line and writes a line per overlapping feature.
    ///
    /// Malformed lines (including ones that are not UTF-8), reversed ranges
    /// and unknown sequences are logged and skipped. Ambiguous sequences and
    /// store failures abort the batch.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> Result<BatchStats> {
        let mut stats = BatchStats::default();
        let mut writer = OverlapWriter::new(output);

        for line in input.split(b'\n') {
            let line = line?;
            stats.lines += 1;
            let text = match std::str::from_utf8(&line) {
                Ok(text) => text.trim(),
                Err(e) => {
                    warn!(line = stats.lines, "skipping location that is not UTF-8: {}", e);
                    stats.malformed += 1;
                    continue;
                }
            };
            if text.is_empty() {
                stats.blank += 1;
                continue;
            }

            let range = match CoordinateRange::parse(text) {
                Some(range) => range,
                None => {
                    warn!(line = stats.lines, text, "skipping malformed location");
                    stats.malformed += 1;
                    continue;
                }
            };

            let features = match self.lookup(range) {
                Ok(features) => features,
                Err(e @ Error::InvalidInput(_)) => {
                    warn!(line = stats.lines, text, "skipping location: {}", e);
                    stats.malformed += 1;
                    continue;
                }
                Err(e @ Error::NotFound { .. }) => {
                    warn!(line = stats.lines, text, "skipping location: {}", e);
                    stats.not_found += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if features.is_empty() {
                continue;
            }
            stats.matched += 1;
            for feature in features.values() {
                writer.write(text, feature)?;
                stats.features += 1;
            }
        }
        writer.flush()?;

        info!(
            lines = stats.lines,
            matched = stats.matched,
            features = stats.features,
            malformed = stats.malformed,
            not_found = stats.not_found,
            "finished location batch"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeatureLocation, MemoryStore, SequenceRow};
    use std::io::Cursor;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_sequence(SequenceRow::dmel_golden_path(10, "3L"))
            .add_sequence(SequenceRow::dmel_golden_path(20, "X"))
            .add_location(10, FeatureLocation::new("FBtr0000002", "b-RA", "mRNA", 40000, 50000))
            .add_location(10, FeatureLocation::new("FBtr0000001", "a-RA", "mRNA", 37000, 38000))
            .add_location(10, FeatureLocation::new("FBtr0000001", "a-RA", "mRNA", 39000, 40000))
            .add_location(20, FeatureLocation::new("FBtr0000003", "mir-c-RM", "miRNA", 5, 25));
        store
    }

    fn run(store: &mut MemoryStore, input: &str) -> (BatchStats, String) {
        let mut out = Vec::new();
        let stats = OverlapBatch::new(store, &ReportConfig::default()).unwrap()
            .run(Cursor::new(input), &mut out)
            .unwrap();
        (stats, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_batch_output() {
        let mut store = store();
        let (stats, out) = run(&mut store, "3L:37,238..59,593\nX:100..200\nX:0..10\n");
        assert_eq!(out, "\
3L:37,238..59,593\tFBtr0000001\ta-RA\tmRNA
3L:37,238..59,593\tFBtr0000002\tb-RA\tmRNA
X:0..10\tFBtr0000003\tmir-c-RM\tmiRNA
");
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.matched, 2);
        assert_eq!(stats.features, 3);
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let mut store = store();
        let input = "bad input\n\n2R:1..10\nX:300..200\nX:0..10\n";
        let (stats, out) = run(&mut store, input);
        assert_eq!(out, "X:0..10\tFBtr0000003\tmir-c-RM\tmiRNA\n");
        assert_eq!(stats, BatchStats {
            lines: 5,
            blank: 1,
            malformed: 2,
            not_found: 1,
            matched: 1,
            features: 1,
        });
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut store = store();
        let mut out = Vec::new();
        let input: &[u8] = b"X:\xff\xfe..10\r\nX:0..10\r\n";
        let stats = OverlapBatch::new(&mut store, &ReportConfig::default()).unwrap()
            .run(Cursor::new(input), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "X:0..10\tFBtr0000003\tmir-c-RM\tmiRNA\n");
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.malformed, 1);
        assert_eq!(stats.matched, 1);
    }

    #[test]
    fn test_sequence_resolved_once_per_name() {
        let mut store = store();
        run(&mut store, "3L:1..2\n3L:3..4\nX:1..2\n3L:5..6\n");
        assert_eq!(store.lookups().sequence_ids, 2);
        assert_eq!(store.lookups().overlapping_features, 4);
    }

    #[test]
    fn test_ambiguous_sequence_aborts() {
        let mut store = store();
        store.add_sequence(SequenceRow::dmel_golden_path(11, "3L"));
        let mut out = Vec::new();
        let err = OverlapBatch::new(&mut store, &ReportConfig::default()).unwrap()
            .run(Cursor::new("3L:1..2\n"), &mut out)
            .unwrap_err();
        assert!(matches!(err, Error::Ambiguity { .. }));
    }

    #[test]
    fn test_file_prefix() {
        let report = DarkGenesReport {
            organism: Organism::default(),
            annotations: vec![],
            conservation: ConservationSummaries::default(),
            criteria: CandidateCriteria::new(9),
            candidates: vec![],
        };
        assert_eq!(report.file_prefix(), "dmel");
    }
}
