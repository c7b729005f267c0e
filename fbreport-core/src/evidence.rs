use std::collections::HashSet;
use itertools::Itertools;
use regex::Regex;
use crate::{Aspect, AnnotationCall, Error, EvidenceConfig, Result, Store};

/// Decides which annotation calls count as experimental evidence.
///
/// A call counts when its evidence descriptor contains one of the configured
/// phrases and it is not negated. Predictions, computational inference and
/// curator judgement never count.
#[derive(Debug, Clone)]
pub struct EvidenceFilter {
    phrases: Vec<String>,
    pattern: Regex,
}

impl EvidenceFilter {
    pub fn new<I, P>(phrases: I) -> Result<EvidenceFilter>
        where I: IntoIterator<Item=P>,
              P: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter()
            .map(Into::into)
            .filter(|phrase: &String| !phrase.trim().is_empty())
            .collect();
        if phrases.is_empty() {
            return Err(Error::Config("no experimental evidence phrases configured".to_string()));
        }

        let alternation = phrases.iter().map(|phrase| regex::escape(phrase)).join("|");
        let pattern = Regex::new(&format!("(?:{})", alternation))
            .map_err(|e| Error::Config(format!("bad evidence phrase: {}", e)))?;

        Ok(EvidenceFilter { phrases, pattern })
    }

    pub fn from_config(config: &EvidenceConfig) -> Result<EvidenceFilter> {
        EvidenceFilter::new(config.phrases.iter().cloned())
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn is_experimental(&self, evidence: &str) -> bool {
        self.pattern.is_match(evidence)
    }

    pub fn accepts(&self, call: &AnnotationCall) -> bool {
        !call.negated && self.is_experimental(&call.evidence)
    }

    /// Number of distinct terms in `aspect` backed by at least one accepted call.
    pub fn count_terms<'a, I>(&self, calls: I, aspect: Aspect) -> usize
        where I: IntoIterator<Item=&'a AnnotationCall>
    {
        calls.into_iter()
            .filter(|call| call.aspect == aspect && self.accepts(call))
            .map(|call| call.term.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// Counts distinct experimentally supported terms for a gene in one aspect.
///
/// A gene the store knows nothing about has a count of zero.
pub fn count_experimental_terms<S: Store + ?Sized>(
    store: &mut S,
    filter: &EvidenceFilter,
    gene_id: &str,
    aspect: Aspect,
) -> Result<usize> {
    let calls = store.annotation_calls(gene_id, aspect)?;
    Ok(filter.count_terms(&calls, aspect))
}
