use serde::{Deserialize, Serialize};
use crate::{ConservationSummaries, GeneAnnotationSummary};

/// How a gene missing from the conservation summaries is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsentConservation {
    /// The gene was never evaluated for conservation and cannot be a candidate.
    Unevaluated,
    /// The gene is conserved in zero species.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCriteria {
    pub max_coverage: usize,
    pub required_species_count: usize,
    pub absent: AbsentConservation,
}

impl CandidateCriteria {
    pub fn new(required_species_count: usize) -> CandidateCriteria {
        CandidateCriteria {
            max_coverage: 1,
            required_species_count,
            absent: AbsentConservation::Unevaluated,
        }
    }
}

/// A poorly annotated gene conserved across every reference species.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CandidateGene {
    #[serde(rename = "fbid")]
    pub gene_id: String,
    pub symbol: Option<String>,
    pub biological_process: usize,
    pub molecular_function: usize,
    pub cellular_component: usize,
    pub num_aspects: usize,
    pub num_ortho_species: usize,
}

/// Joins annotation and conservation summaries on gene id and keeps genes
/// with coverage at most `max_coverage` conserved in exactly
/// `required_species_count` species.
pub fn select_candidates(
    annotations: &[GeneAnnotationSummary],
    conservation: &ConservationSummaries,
    criteria: &CandidateCriteria,
) -> Vec<CandidateGene> {
    let mut candidates: Vec<CandidateGene> = annotations.iter()
        .filter(|summary| summary.coverage() <= criteria.max_coverage)
        .filter_map(|summary| {
            let species = match (conservation.species_count(&summary.gene_id), criteria.absent) {
                (Some(count), _) => count,
                (None, AbsentConservation::Zero) => 0,
                (None, AbsentConservation::Unevaluated) => return None,
            };
            if species != criteria.required_species_count {
                return None;
            }
            Some(CandidateGene {
                gene_id: summary.gene_id.clone(),
                symbol: summary.symbol.clone(),
                biological_process: summary.biological_process,
                molecular_function: summary.molecular_function,
                cellular_component: summary.cellular_component,
                num_aspects: summary.num_aspects,
                num_ortho_species: species,
            })
        })
        .collect();
    candidates.sort_by(|a, b| a.gene_id.cmp(&b.gene_id));
    candidates.dedup_by(|a, b| a.gene_id == b.gene_id);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Gene, GeneConservationSummary};

    const REQUIRED: usize = 9;

    fn annotation(gene_id: &str, bp: usize, mf: usize, cc: usize) -> GeneAnnotationSummary {
        GeneAnnotationSummary::new(Gene::new(gene_id, None), bp, mf, cc)
    }

    fn conservation(genes: &[(&str, usize)]) -> ConservationSummaries {
        let genes = genes.iter()
            .map(|(gene_id, n)| GeneConservationSummary { gene_id: gene_id.to_string(), num_ortho_species: *n })
            .collect();
        ConservationSummaries::new(genes, REQUIRED)
    }

    fn ids(candidates: &[CandidateGene]) -> Vec<&str> {
        candidates.iter().map(|c| c.gene_id.as_str()).collect()
    }

    #[test]
    fn test_select_candidates() {
        let annotations = vec![
            annotation("A", 0, 0, 0),
            annotation("B", 1, 1, 0),
            annotation("C", 0, 4, 0),
        ];
        let conserved = conservation(&[("A", REQUIRED), ("B", REQUIRED), ("C", REQUIRED - 1)]);

        let candidates = select_candidates(&annotations, &conserved, &CandidateCriteria::new(REQUIRED));
        assert_eq!(ids(&candidates), vec!["A"]);
        assert_eq!(candidates[0].num_ortho_species, REQUIRED);
    }

    #[test]
    fn test_exact_species_count_required() {
        let annotations = vec![annotation("A", 0, 0, 0)];
        let conserved = conservation(&[("A", REQUIRED + 1)]);
        assert!(select_candidates(&annotations, &conserved, &CandidateCriteria::new(REQUIRED)).is_empty());
    }

    #[test]
    fn test_genes_missing_from_either_side_excluded() {
        let annotations = vec![annotation("A", 0, 0, 0)];
        let conserved = conservation(&[("Z", REQUIRED)]);
        assert!(select_candidates(&annotations, &conserved, &CandidateCriteria::new(REQUIRED)).is_empty());
    }

    #[test]
    fn test_absent_conservation_policy() {
        let annotations = vec![annotation("A", 0, 0, 0)];
        let conserved = conservation(&[]);

        let mut criteria = CandidateCriteria::new(0);
        assert!(select_candidates(&annotations, &conserved, &criteria).is_empty());

        criteria.absent = AbsentConservation::Zero;
        let candidates = select_candidates(&annotations, &conserved, &criteria);
        assert_eq!(ids(&candidates), vec!["A"]);
        assert_eq!(candidates[0].num_ortho_species, 0);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let annotations = vec![
            annotation("C", 1, 0, 0),
            annotation("A", 0, 0, 0),
            annotation("B", 2, 2, 0),
        ];
        let conserved = conservation(&[("A", REQUIRED), ("B", REQUIRED), ("C", REQUIRED)]);
        let criteria = CandidateCriteria::new(REQUIRED);

        let first = select_candidates(&annotations, &conserved, &criteria);
        let second = select_candidates(&annotations, &conserved, &criteria);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["A", "C"]);
    }
}
