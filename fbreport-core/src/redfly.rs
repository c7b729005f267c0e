//! Counts how often REDfly regulatory features are cited in genome annotation
//! statistics.

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Read, Write};
use lazy_static::lazy_static;
use regex::Regex;
use crate::Result;

lazy_static! {
    static ref FEATURE_ID: Regex = Regex::new(r"FBsf[0-9]+").expect("feature id pattern should compile");
}

/// Reads the REDfly feature id list, one id per line, dropping blanks and
/// repeats while keeping the original order.
pub fn read_feature_ids<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut ids: Vec<String> = Vec::new();
    let mut seen = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() && seen.insert(id.to_string()) {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

/// Counts statistics rows whose first column cites each feature id.
pub fn count_citations<R: Read>(stats: R, feature_ids: Vec<String>) -> Result<Vec<(String, usize)>> {
    let index: HashMap<String, usize> = feature_ids.iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();
    let mut counts: Vec<(String, usize)> = feature_ids.into_iter().map(|id| (id, 0)).collect();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(stats);
    for row in reader.records() {
        let row = row?;
        let cited = row.get(0).and_then(|first| FEATURE_ID.find(first));
        if let Some(&i) = cited.and_then(|m| index.get(m.as_str())) {
            counts[i].1 += 1;
        }
    }
    Ok(counts)
}

/// Writes `<id>\t<count>` for every cited feature.
pub fn write_counts<W: Write>(counts: &[(String, usize)], mut out: W) -> Result<()> {
    for (id, count) in counts.iter().filter(|(_, count)| *count > 0) {
        writeln!(out, "{}\t{}", id, count)?;
    }
    Ok(())
}
