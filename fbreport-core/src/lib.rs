#![deny(warnings)]

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

mod error;
mod models;
mod config;
mod universe;
mod evidence;
mod annotation;
mod conservation;
mod candidates;
mod location;
mod sequence;
mod overlap;
mod store;
mod memory;
mod chado;
mod export;
mod pipeline;
pub mod summaries;
pub mod redfly;

pub use error::{Error, Result};
pub use models::{Gene, GeneRow, AnnotationCall, OrthologyCall, SequenceRow, FeatureLocation};
pub use config::{ReportConfig, ConnectionSettings, Organism, EvidenceConfig, ConservationConfig};
pub use universe::GeneUniverse;
pub use evidence::{EvidenceFilter, count_experimental_terms};
pub use annotation::{GeneAnnotationSummary, summarize_annotations, low_coverage};
pub use conservation::{OrthologySource, GeneConservationSummary, ConservationSummaries, summarize_conservation};
pub use candidates::{AbsentConservation, CandidateCriteria, CandidateGene, select_candidates};
pub use location::{CoordinateRange, overlaps};
pub use sequence::{SequenceLookup, SequenceCache};
pub use overlap::{TranscriptFilter, OverlapFeature, find_overlaps};
pub use store::Store;
pub use memory::{MemoryStore, Lookups};
pub use chado::ChadoStore;
pub use export::{TableExporter, OverlapWriter};
pub use pipeline::{DarkGenesReport, OverlapBatch, BatchStats, conserved_dark_genes};

/// One of the three independent Gene Ontology branches.
#[derive(Debug, Hash, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    MolecularFunction,
    BiologicalProcess,
    CellularComponent,
}

impl Aspect {
    pub const ALL: [Aspect; 3] = [
        Aspect::BiologicalProcess,
        Aspect::MolecularFunction,
        Aspect::CellularComponent,
    ];

    /// The controlled vocabulary name used for this aspect in the store.
    pub fn cv_name(self) -> &'static str {
        match self {
            Aspect::MolecularFunction => "molecular_function",
            Aspect::BiologicalProcess => "biological_process",
            Aspect::CellularComponent => "cellular_component",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cv_name())
    }
}

impl FromStr for Aspect {
    type Err = Error;

    /// Accepts the vocabulary names as well as the single letter GAF codes.
    fn from_str(value: &str) -> Result<Self> {
        let aspect = match value {
            "molecular_function" | "F" => Aspect::MolecularFunction,
            "biological_process" | "P" => Aspect::BiologicalProcess,
            "cellular_component" | "C" => Aspect::CellularComponent,
            other => return Err(Error::InvalidInput(format!("unknown aspect '{}'", other))),
        };
        Ok(aspect)
    }
}
