use std::collections::{BTreeMap, HashSet};
use serde::Serialize;
use tracing::info;
use crate::{ConservationConfig, GeneUniverse, Result, Store};

/// Which orthology calls count towards conservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrthologySource {
    pub tag: String,
    pub relationship: String,
}

impl OrthologySource {
    pub fn new(tag: &str) -> OrthologySource {
        OrthologySource {
            tag: tag.to_string(),
            relationship: "orthologous_to".to_string(),
        }
    }

    pub fn from_config(config: &ConservationConfig) -> OrthologySource {
        OrthologySource {
            tag: config.source_tag.clone(),
            relationship: config.relationship.clone(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GeneConservationSummary {
    #[serde(rename = "fbid")]
    pub gene_id: String,
    pub num_ortho_species: usize,
}

/// Per-gene conservation breadth, ordered by gene id.
///
/// Genes without a qualifying call have no entry at all.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub struct ConservationSummaries {
    genes: Vec<GeneConservationSummary>,
    /// Distinct organisms seen across every qualifying call.
    pub species_observed: usize,
}

impl ConservationSummaries {
    /// Sorts `genes` by gene id, keeping the first entry for a repeated id.
    pub fn new(mut genes: Vec<GeneConservationSummary>, species_observed: usize) -> ConservationSummaries {
        genes.sort_by(|a, b| a.gene_id.cmp(&b.gene_id));
        genes.dedup_by(|later, earlier| later.gene_id == earlier.gene_id);
        ConservationSummaries { genes, species_observed }
    }

    pub fn genes(&self) -> &[GeneConservationSummary] {
        &self.genes
    }

    pub fn species_count(&self, gene_id: &str) -> Option<usize> {
        self.genes
            .binary_search_by(|summary| summary.gene_id.as_str().cmp(gene_id))
            .ok()
            .map(|i| self.genes[i].num_ortho_species)
    }
}

/// Counts the distinct organisms each universe gene has orthologs in.
pub fn summarize_conservation<S: Store + ?Sized>(
    store: &mut S,
    universe: &GeneUniverse,
    source: &OrthologySource,
) -> Result<ConservationSummaries> {
    let calls = store.orthology_calls(universe, &source.tag)?;

    let mut by_gene: BTreeMap<String, HashSet<i64>> = BTreeMap::new();
    let mut organisms = HashSet::new();
    for call in calls {
        if call.source_tag != source.tag || call.relationship != source.relationship {
            continue;
        }
        organisms.insert(call.organism_id);
        by_gene.entry(call.gene_id)
            .or_insert_with(HashSet::new)
            .insert(call.organism_id);
    }

    info!(
        genes = by_gene.len(),
        species = organisms.len(),
        source = %source.tag,
        "counted orthologous species"
    );

    let genes = by_gene.into_iter()
        .map(|(gene_id, species)| GeneConservationSummary {
            gene_id,
            num_ortho_species: species.len(),
        })
        .collect();
    Ok(ConservationSummaries::new(genes, organisms.len()))
}
