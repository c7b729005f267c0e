use regex::Regex;
use crate::{Error, GeneRow, ReportConfig, Result};

/// The set of genes eligible for analysis.
///
/// Both aggregators scan exactly this set: current, non-analysis features of
/// the gene type, localized to the genome, belonging to one organism and
/// carrying a gene accession.
#[derive(Debug, Clone)]
pub struct GeneUniverse {
    pub genus: String,
    pub species: String,
    pub gene_type: String,
    accession: Regex,
}

impl GeneUniverse {
    pub fn new(genus: &str, species: &str, gene_type: &str, accession_pattern: &str) -> Result<GeneUniverse> {
        let accession = Regex::new(accession_pattern)
            .map_err(|e| Error::Config(format!("bad gene accession pattern: {}", e)))?;
        Ok(GeneUniverse {
            genus: genus.to_string(),
            species: species.to_string(),
            gene_type: gene_type.to_string(),
            accession,
        })
    }

    pub fn from_config(config: &ReportConfig) -> Result<GeneUniverse> {
        GeneUniverse::new(
            &config.organism.genus,
            &config.organism.species,
            &config.gene_type,
            &config.gene_pattern,
        )
    }

    pub fn accession_pattern(&self) -> &str {
        self.accession.as_str()
    }

    pub fn admits(&self, row: &GeneRow) -> bool {
        !row.is_obsolete
            && !row.is_analysis
            && row.localized
            && row.type_name == self.gene_type
            && row.genus == self.genus
            && row.species == self.species
            && self.accession.is_match(&row.gene_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> GeneUniverse {
        GeneUniverse::from_config(&ReportConfig::default()).unwrap()
    }

    #[test]
    fn test_admits_current_localized_gene() {
        assert!(universe().admits(&GeneRow::dmel("FBgn0000490", "dpp")));
    }

    #[test]
    fn test_rejects_out_of_universe_rows() {
        let universe = universe();

        let mut obsolete = GeneRow::dmel("FBgn0000001", "a");
        obsolete.is_obsolete = true;
        let mut analysis = GeneRow::dmel("FBgn0000002", "b");
        analysis.is_analysis = true;
        let mut unlocalized = GeneRow::dmel("FBgn0000003", "c");
        unlocalized.localized = false;
        let mut wrong_type = GeneRow::dmel("FBgn0000004", "d");
        wrong_type.type_name = "pseudogene".to_string();
        let mut other_species = GeneRow::dmel("FBgn0000005", "e");
        other_species.species = "simulans".to_string();
        let transcript = GeneRow::dmel("FBtr0000006", "f-RA");
        let suffixed = GeneRow::dmel("FBgn0000007:1", "g");

        for row in &[obsolete, analysis, unlocalized, wrong_type, other_species, transcript, suffixed] {
            assert!(!universe.admits(row), "should not admit {}", row.gene_id);
        }
    }

    #[test]
    fn test_bad_pattern() {
        let err = GeneUniverse::new("Drosophila", "melanogaster", "gene", "^FBgn[").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
