use crate::{
    Aspect, AnnotationCall, CoordinateRange, FeatureLocation, Gene, GeneRow, GeneUniverse, OrthologyCall,
    Result, SequenceLookup, SequenceRow, Store,
};

/// An in-process store over plain tables.
///
/// Applies the same predicates the SQL store does, and counts how many times
/// each operation is called.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    genes: Vec<GeneRow>,
    annotations: Vec<AnnotationCall>,
    orthologs: Vec<(OrthologyCall, bool)>,
    sequences: Vec<SequenceRow>,
    locations: Vec<(i64, FeatureLocation)>,
    lookups: Lookups,
}

/// Number of calls made to each store operation.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Lookups {
    pub universe_genes: usize,
    pub annotation_calls: usize,
    pub orthology_calls: usize,
    pub sequence_ids: usize,
    pub overlapping_features: usize,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn lookups(&self) -> Lookups {
        self.lookups
    }

    pub fn add_gene(&mut self, gene: GeneRow) -> &mut Self {
        self.genes.push(gene);
        self
    }

    pub fn add_annotation(&mut self, call: AnnotationCall) -> &mut Self {
        self.annotations.push(call);
        self
    }

    /// Adds an orthology call whose ortholog feature is current.
    pub fn add_ortholog(&mut self, call: OrthologyCall) -> &mut Self {
        self.orthologs.push((call, true));
        self
    }

    /// Adds an orthology call whose ortholog feature is obsolete or analysis-only.
    pub fn add_retired_ortholog(&mut self, call: OrthologyCall) -> &mut Self {
        self.orthologs.push((call, false));
        self
    }

    pub fn add_sequence(&mut self, sequence: SequenceRow) -> &mut Self {
        self.sequences.push(sequence);
        self
    }

    pub fn add_location(&mut self, sequence_id: i64, location: FeatureLocation) -> &mut Self {
        self.locations.push((sequence_id, location));
        self
    }

    fn universe_ids<'a>(&'a self, universe: &'a GeneUniverse) -> impl Iterator<Item=&'a str> {
        self.genes.iter()
            .filter(move |row| universe.admits(row))
            .map(|row| row.gene_id.as_str())
    }
}

impl Store for MemoryStore {
    fn universe_genes(&mut self, universe: &GeneUniverse) -> Result<Vec<Gene>> {
        self.lookups.universe_genes += 1;
        Ok(self.genes.iter()
            .filter(|row| universe.admits(row))
            .map(GeneRow::gene)
            .collect())
    }

    fn annotation_calls(&mut self, gene_id: &str, aspect: Aspect) -> Result<Vec<AnnotationCall>> {
        self.lookups.annotation_calls += 1;
        Ok(self.annotations.iter()
            .filter(|call| call.gene_id == gene_id && call.aspect == aspect)
            .cloned()
            .collect())
    }

    fn orthology_calls(&mut self, universe: &GeneUniverse, source_tag: &str) -> Result<Vec<OrthologyCall>> {
        self.lookups.orthology_calls += 1;
        let admitted: Vec<&str> = self.universe_ids(universe).collect();
        Ok(self.orthologs.iter()
            .filter(|(call, current)| *current
                && call.source_tag == source_tag
                && admitted.contains(&call.gene_id.as_str()))
            .map(|(call, _)| call.clone())
            .collect())
    }

    fn sequence_ids(&mut self, lookup: &SequenceLookup, name: &str) -> Result<Vec<i64>> {
        self.lookups.sequence_ids += 1;
        Ok(self.sequences.iter()
            .filter(|sequence| lookup.matches(sequence, name))
            .map(|sequence| sequence.feature_id)
            .collect())
    }

    fn overlapping_features(&mut self, sequence_id: i64, range: &CoordinateRange) -> Result<Vec<FeatureLocation>> {
        self.lookups.overlapping_features += 1;
        Ok(self.locations.iter()
            .filter(|(src, location)| *src == sequence_id
                && range.overlaps(location.fmin, location.fmax))
            .map(|(_, location)| location.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportConfig;

    #[test]
    fn test_universe_filtering() {
        let mut obsolete = GeneRow::dmel("FBgn0000002", "old");
        obsolete.is_obsolete = true;

        let mut store = MemoryStore::new();
        store.add_gene(GeneRow::dmel("FBgn0000001", "a"))
            .add_gene(obsolete);

        let universe = GeneUniverse::from_config(&ReportConfig::default()).unwrap();
        let genes = store.universe_genes(&universe).unwrap();
        assert_eq!(genes, vec![Gene::new("FBgn0000001", Some("a"))]);
        assert_eq!(store.lookups().universe_genes, 1);
    }

    #[test]
    fn test_orthology_calls_restricted() {
        let mut outside = GeneRow::dmel("FBgn0000002", "b");
        outside.localized = false;

        let mut store = MemoryStore::new();
        store.add_gene(GeneRow::dmel("FBgn0000001", "a"))
            .add_gene(outside)
            .add_ortholog(OrthologyCall::new("FBgn0000001", "DIOPT", 7))
            .add_ortholog(OrthologyCall::new("FBgn0000001", "OrthoDB", 8))
            .add_retired_ortholog(OrthologyCall::new("FBgn0000001", "DIOPT", 9))
            .add_ortholog(OrthologyCall::new("FBgn0000002", "DIOPT", 7));

        let universe = GeneUniverse::from_config(&ReportConfig::default()).unwrap();
        let calls = store.orthology_calls(&universe, "DIOPT").unwrap();
        assert_eq!(calls, vec![OrthologyCall::new("FBgn0000001", "DIOPT", 7)]);
    }

    #[test]
    fn test_overlapping_features_half_open() {
        let mut store = MemoryStore::new();
        store.add_location(1, FeatureLocation::new("FBtr0000001", "a-RA", "mRNA", 100, 200))
            .add_location(2, FeatureLocation::new("FBtr0000002", "b-RA", "mRNA", 100, 200));

        let range = |fmin, fmax| CoordinateRange { scaffold: "3L".to_string(), fmin, fmax };
        assert_eq!(store.overlapping_features(1, &range(199, 300)).unwrap().len(), 1);
        assert!(store.overlapping_features(1, &range(200, 300)).unwrap().is_empty());
        assert!(store.overlapping_features(1, &range(0, 100)).unwrap().is_empty());
        assert_eq!(store.lookups().overlapping_features, 3);
    }
}
