use std::collections::BTreeMap;
use regex::Regex;
use serde::Serialize;
use crate::{CoordinateRange, Error, FeatureLocation, ReportConfig, Result, Store};

/// Selects the transcript features an overlap report is interested in.
#[derive(Debug, Clone)]
pub struct TranscriptFilter {
    accession: Regex,
    types: Vec<String>,
}

impl TranscriptFilter {
    pub fn new<T: Into<String>>(accession_pattern: &str, types: Vec<T>) -> Result<TranscriptFilter> {
        let accession = Regex::new(accession_pattern)
            .map_err(|e| Error::Config(format!("bad transcript accession pattern: {}", e)))?;
        Ok(TranscriptFilter {
            accession,
            types: types.into_iter().map(Into::into).collect(),
        })
    }

    pub fn from_config(config: &ReportConfig) -> Result<TranscriptFilter> {
        TranscriptFilter::new(&config.transcript_pattern, config.transcript_types.clone())
    }

    pub fn accession_pattern(&self) -> &str {
        self.accession.as_str()
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn admits(&self, location: &FeatureLocation) -> bool {
        !location.is_obsolete
            && !location.is_analysis
            && self.types.iter().any(|t| *t == location.feature_type)
            && self.accession.is_match(&location.feature_id)
    }
}

#[derive(Debug, Hash, Eq, PartialEq, Clone, Serialize)]
pub struct OverlapFeature {
    pub feature_id: String,
    pub symbol: Option<String>,
    pub feature_type: String,
}

/// Finds the transcripts located on `sequence_id` that intersect `range`.
///
/// Results are keyed by feature id, so a transcript with several location rows
/// inside the range is reported once. No overlap is an empty map.
pub fn find_overlaps<S: Store + ?Sized>(
    store: &mut S,
    filter: &TranscriptFilter,
    sequence_id: i64,
    range: &CoordinateRange,
) -> Result<BTreeMap<String, OverlapFeature>> {
    let locations = store.overlapping_features(sequence_id, range)?;

    let mut features = BTreeMap::new();
    for location in locations {
        if !filter.admits(&location) || !range.overlaps(location.fmin, location.fmax) {
            continue;
        }
        features.entry(location.feature_id.clone())
            .or_insert_with(|| OverlapFeature {
                feature_id: location.feature_id,
                symbol: location.symbol,
                feature_type: location.feature_type,
            });
    }
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    fn filter() -> TranscriptFilter {
        TranscriptFilter::from_config(&ReportConfig::default()).unwrap()
    }

    fn range(fmin: i64, fmax: i64) -> CoordinateRange {
        CoordinateRange { scaffold: "3L".to_string(), fmin, fmax }
    }

    #[test]
    fn test_no_overlap_is_empty() {
        let mut store = MemoryStore::new();
        store.add_location(1, FeatureLocation::new("FBtr0000001", "a-RA", "mRNA", 1000, 2000));

        let found = find_overlaps(&mut store, &filter(), 1, &range(0, 500)).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_feature_reported_once() {
        let mut store = MemoryStore::new();
        store.add_location(1, FeatureLocation::new("FBtr0000001", "a-RA", "mRNA", 100, 200))
            .add_location(1, FeatureLocation::new("FBtr0000001", "a-RA", "mRNA", 300, 400))
            .add_location(1, FeatureLocation::new("FBtr0000002", "mir-1-RM", "miRNA", 150, 160));

        let found = find_overlaps(&mut store, &filter(), 1, &range(0, 1000)).unwrap();
        let ids: Vec<&str> = found.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["FBtr0000001", "FBtr0000002"]);
        assert_eq!(found["FBtr0000002"], OverlapFeature {
            feature_id: "FBtr0000002".to_string(),
            symbol: Some("mir-1-RM".to_string()),
            feature_type: "miRNA".to_string(),
        });
    }

    #[test]
    fn test_only_current_transcripts() {
        let mut obsolete = FeatureLocation::new("FBtr0000003", "c-RA", "mRNA", 100, 200);
        obsolete.is_obsolete = true;
        let mut analysis = FeatureLocation::new("FBtr0000004", "d-RA", "mRNA", 100, 200);
        analysis.is_analysis = true;

        let mut store = MemoryStore::new();
        store.add_location(1, FeatureLocation::new("FBtr0000001", "a-RA", "ncRNA", 100, 200))
            .add_location(1, FeatureLocation::new("FBgn0000002", "b", "mRNA", 100, 200))
            .add_location(1, FeatureLocation::new("FBtr0000002:5", "b-RA", "mRNA", 100, 200))
            .add_location(1, obsolete)
            .add_location(1, analysis)
            .add_location(2, FeatureLocation::new("FBtr0000005", "e-RA", "mRNA", 100, 200));

        let found = find_overlaps(&mut store, &filter(), 1, &range(0, 1000)).unwrap();
        assert!(found.is_empty());
    }
}
