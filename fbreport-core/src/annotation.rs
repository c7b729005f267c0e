use itertools::Itertools;
use serde::Serialize;
use tracing::info;
use crate::{count_experimental_terms, Aspect, EvidenceFilter, Gene, GeneUniverse, Result, Store};

/// Experimental annotation counts for one gene.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GeneAnnotationSummary {
    #[serde(rename = "fbid")]
    pub gene_id: String,
    pub symbol: Option<String>,
    pub biological_process: usize,
    pub molecular_function: usize,
    pub cellular_component: usize,
    /// Number of aspects with at least one experimental term.
    pub num_aspects: usize,
}

impl GeneAnnotationSummary {
    pub fn new(gene: Gene, biological_process: usize, molecular_function: usize, cellular_component: usize) -> Self {
        let num_aspects = [biological_process, molecular_function, cellular_component].iter()
            .filter(|&&count| count > 0)
            .count();
        GeneAnnotationSummary {
            gene_id: gene.gene_id,
            symbol: gene.symbol,
            biological_process,
            molecular_function,
            cellular_component,
            num_aspects,
        }
    }

    pub fn count(&self, aspect: Aspect) -> usize {
        match aspect {
            Aspect::BiologicalProcess => self.biological_process,
            Aspect::MolecularFunction => self.molecular_function,
            Aspect::CellularComponent => self.cellular_component,
        }
    }

    pub fn coverage(&self) -> usize {
        self.num_aspects
    }
}

/// Summarizes experimental annotation for every gene in the universe, ordered
/// by gene id.
pub fn summarize_annotations<S: Store + ?Sized>(
    store: &mut S,
    universe: &GeneUniverse,
    filter: &EvidenceFilter,
) -> Result<Vec<GeneAnnotationSummary>> {
    let genes = store.universe_genes(universe)?;
    info!(genes = genes.len(), "counting experimental annotations");

    let mut summaries = Vec::with_capacity(genes.len());
    for gene in genes.into_iter().sorted_by(|a, b| a.gene_id.cmp(&b.gene_id)) {
        let bp = count_experimental_terms(store, filter, &gene.gene_id, Aspect::BiologicalProcess)?;
        let mf = count_experimental_terms(store, filter, &gene.gene_id, Aspect::MolecularFunction)?;
        let cc = count_experimental_terms(store, filter, &gene.gene_id, Aspect::CellularComponent)?;
        summaries.push(GeneAnnotationSummary::new(gene, bp, mf, cc));
    }
    Ok(summaries)
}

/// The summaries covering at most `max_coverage` aspects.
pub fn low_coverage(summaries: &[GeneAnnotationSummary], max_coverage: usize) -> Vec<&GeneAnnotationSummary> {
    summaries.iter()
        .filter(|summary| summary.coverage() <= max_coverage)
        .collect()
}
