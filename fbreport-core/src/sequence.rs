use std::collections::HashMap;
use tracing::debug;
use crate::{Error, ReportConfig, Result, SequenceRow, Store};

/// What a sequence name is resolved against: one organism, one sequence type,
/// current and non-analysis features only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceLookup {
    pub genus: String,
    pub species: String,
    pub sequence_type: String,
}

impl SequenceLookup {
    pub fn from_config(config: &ReportConfig) -> SequenceLookup {
        SequenceLookup {
            genus: config.organism.genus.clone(),
            species: config.organism.species.clone(),
            sequence_type: config.sequence_type.clone(),
        }
    }

    pub fn matches(&self, sequence: &SequenceRow, name: &str) -> bool {
        !sequence.is_obsolete
            && !sequence.is_analysis
            && sequence.name == name
            && sequence.type_name == self.sequence_type
            && sequence.genus == self.genus
            && sequence.species == self.species
    }
}

/// Memoizes sequence name to internal id resolution for one run.
///
/// Only successful resolutions are remembered.
#[derive(Debug)]
pub struct SequenceCache {
    lookup: SequenceLookup,
    ids: HashMap<String, i64>,
}

impl SequenceCache {
    pub fn new(lookup: SequenceLookup) -> SequenceCache {
        SequenceCache { lookup, ids: HashMap::new() }
    }

    pub fn resolve<S: Store + ?Sized>(&mut self, store: &mut S, name: &str) -> Result<i64> {
        if let Some(&id) = self.ids.get(name) {
            debug!(sequence = name, id, "sequence id cache hit");
            return Ok(id);
        }

        let ids = store.sequence_ids(&self.lookup, name)?;
        let id = match ids.as_slice() {
            [id] => *id,
            [] => return Err(Error::NotFound { name: name.to_string() }),
            many => return Err(Error::Ambiguity { name: name.to_string(), count: many.len() }),
        };
        debug!(sequence = name, id, "resolved sequence id");
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
