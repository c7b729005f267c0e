use crate::{
    Aspect, AnnotationCall, CoordinateRange, FeatureLocation, Gene, GeneUniverse, OrthologyCall, Result,
    SequenceLookup,
};

/// Read-only access to a feature/ontology/orthology store.
///
/// Implementations may push filters down into their queries, but callers
/// re-apply the rules they care about to the rows that come back.
pub trait Store {
    /// Every gene admitted by the universe.
    fn universe_genes(&mut self, universe: &GeneUniverse) -> Result<Vec<Gene>>;

    /// Evidence-bearing annotation calls on one gene in one aspect. An unknown
    /// gene simply has no calls.
    fn annotation_calls(&mut self, gene_id: &str, aspect: Aspect) -> Result<Vec<AnnotationCall>>;

    /// Orthology calls from the given source for genes in the universe, whose
    /// ortholog feature is current.
    fn orthology_calls(&mut self, universe: &GeneUniverse, source_tag: &str) -> Result<Vec<OrthologyCall>>;

    /// Internal ids of every current sequence with this name matching the lookup.
    fn sequence_ids(&mut self, lookup: &SequenceLookup, name: &str) -> Result<Vec<i64>>;

    /// Location rows on the sequence intersecting the half-open `range`. The
    /// range's scaffold name is not consulted. A feature with several
    /// locations may appear more than once.
    fn overlapping_features(&mut self, sequence_id: i64, range: &CoordinateRange) -> Result<Vec<FeatureLocation>>;
}
