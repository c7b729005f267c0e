use serde::{Deserialize, Serialize};
use crate::Aspect;

/// A gene from the analysis universe, with its symbol as of query time.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Serialize, Deserialize)]
pub struct Gene {
    pub gene_id: String,
    pub symbol: Option<String>,
}

impl Gene {
    pub fn new(gene_id: &str, symbol: Option<&str>) -> Gene {
        Gene {
            gene_id: gene_id.to_string(),
            symbol: symbol.map(str::to_string),
        }
    }
}

/// A gene feature as stored, before universe filtering.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct GeneRow {
    pub gene_id: String,
    pub symbol: Option<String>,
    pub type_name: String,
    pub genus: String,
    pub species: String,
    pub is_obsolete: bool,
    pub is_analysis: bool,
    pub localized: bool,
}

impl GeneRow {
    /// A current, genome-localized D. melanogaster gene.
    pub fn dmel(gene_id: &str, symbol: &str) -> GeneRow {
        GeneRow {
            gene_id: gene_id.to_string(),
            symbol: Some(symbol.to_string()),
            type_name: "gene".to_string(),
            genus: "Drosophila".to_string(),
            species: "melanogaster".to_string(),
            is_obsolete: false,
            is_analysis: false,
            localized: true,
        }
    }

    #[inline(always)]
    pub fn gene(&self) -> Gene {
        Gene {
            gene_id: self.gene_id.clone(),
            symbol: self.symbol.clone(),
        }
    }
}

/// A single evidence-bearing ontology annotation on a gene.
///
/// One call exists per evidence property, so a term annotated with two
/// evidence phrases shows up twice.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct AnnotationCall {
    pub gene_id: String,
    pub aspect: Aspect,
    pub term: String,
    pub evidence: String,
    pub negated: bool,
}

impl AnnotationCall {
    pub fn new(gene_id: &str, aspect: Aspect, term: &str, evidence: &str) -> AnnotationCall {
        AnnotationCall {
            gene_id: gene_id.to_string(),
            aspect,
            term: term.to_string(),
            evidence: evidence.to_string(),
            negated: false,
        }
    }

    pub fn negated(mut self) -> AnnotationCall {
        self.negated = true;
        self
    }
}

#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct OrthologyCall {
    pub gene_id: String,
    pub source_tag: String,
    pub relationship: String,
    pub organism_id: i64,
}

impl OrthologyCall {
    pub fn new(gene_id: &str, source_tag: &str, organism_id: i64) -> OrthologyCall {
        OrthologyCall {
            gene_id: gene_id.to_string(),
            source_tag: source_tag.to_string(),
            relationship: "orthologous_to".to_string(),
            organism_id,
        }
    }
}

/// A reference sequence (scaffold, chromosome arm) features are located on.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct SequenceRow {
    pub feature_id: i64,
    pub name: String,
    pub genus: String,
    pub species: String,
    pub type_name: String,
    pub is_obsolete: bool,
    pub is_analysis: bool,
}

impl SequenceRow {
    pub fn dmel_golden_path(feature_id: i64, name: &str) -> SequenceRow {
        SequenceRow {
            feature_id,
            name: name.to_string(),
            genus: "Drosophila".to_string(),
            species: "melanogaster".to_string(),
            type_name: "golden_path".to_string(),
            is_obsolete: false,
            is_analysis: false,
        }
    }
}

/// One location row of a feature on a reference sequence, half-open and 0-based.
#[derive(Debug, Hash, Eq, PartialEq, Clone)]
pub struct FeatureLocation {
    pub feature_id: String,
    pub symbol: Option<String>,
    pub feature_type: String,
    pub is_obsolete: bool,
    pub is_analysis: bool,
    pub fmin: i64,
    pub fmax: i64,
}

impl FeatureLocation {
    pub fn new(feature_id: &str, symbol: &str, feature_type: &str, fmin: i64, fmax: i64) -> FeatureLocation {
        FeatureLocation {
            feature_id: feature_id.to_string(),
            symbol: Some(symbol.to_string()),
            feature_type: feature_type.to_string(),
            is_obsolete: false,
            is_analysis: false,
            fmin,
            fmax,
        }
    }
}
