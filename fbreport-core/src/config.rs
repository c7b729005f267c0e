use std::fmt;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::{AbsentConservation, Error, Result};

/// Everything a report run can be tuned with.
///
/// Defaults reproduce the FlyBase reference reports. Values are layered:
/// defaults, then an optional YAML file, then `CHADO_*` environment
/// variables, then command line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub connection: ConnectionSettings,
    pub organism: Organism,
    pub gene_type: String,
    pub gene_pattern: String,
    pub transcript_pattern: String,
    pub transcript_types: Vec<String>,
    pub sequence_type: String,
    pub evidence: EvidenceConfig,
    pub conservation: ConservationConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            connection: ConnectionSettings::default(),
            organism: Organism::default(),
            gene_type: "gene".to_string(),
            gene_pattern: "^FBgn[0-9]+$".to_string(),
            transcript_pattern: r"^FBtr\d+$".to_string(),
            transcript_types: vec!["miRNA".to_string(), "mRNA".to_string()],
            sequence_type: "golden_path".to_string(),
            evidence: EvidenceConfig::default(),
            conservation: ConservationConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<ReportConfig> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn from_yaml_path<P: AsRef<Path>>(path: P) -> Result<ReportConfig> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        ReportConfig::from_yaml_str(&yaml)
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    pub host: String,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
    pub port: u16,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettings {
            host: "chado.flybase.org".to_string(),
            user: "flybase".to_string(),
            password: None,
            dbname: "flybase".to_string(),
            port: 5432,
        }
    }
}

impl fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("dbname", &self.dbname)
            .field("port", &self.port)
            .finish()
    }
}

impl ConnectionSettings {
    /// Overrides settings from `CHADO_HOST`, `CHADO_USER`, `CHADO_PASSWORD`,
    /// `CHADO_DBNAME` and `CHADO_PORT`.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    pub fn apply_vars<F>(&mut self, var: F) -> Result<()>
        where F: Fn(&str) -> Option<String>
    {
        if let Some(host) = var("CHADO_HOST") { self.host = host; }
        if let Some(user) = var("CHADO_USER") { self.user = user; }
        if let Some(password) = var("CHADO_PASSWORD") { self.password = Some(password); }
        if let Some(dbname) = var("CHADO_DBNAME") { self.dbname = dbname; }
        if let Some(port) = var("CHADO_PORT") {
            self.port = port.parse()
                .map_err(|_| Error::Config(format!("CHADO_PORT '{}' is not a port number", port)))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organism {
    pub genus: String,
    pub species: String,
}

impl Default for Organism {
    fn default() -> Self {
        Organism {
            genus: "Drosophila".to_string(),
            species: "melanogaster".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvidenceConfig {
    /// Evidence phrases that mark an annotation as experimental. A call's
    /// evidence descriptor qualifies when it contains any of these.
    pub phrases: Vec<String>,
    /// Name of the property type that negates an annotation call.
    pub negation_qualifier: String,
    /// Name of the property type that carries the evidence descriptor.
    pub evidence_property: String,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        let phrases = [
            "physical interaction",
            "direct assay",
            "genetic interaction",
            "mutant phenotype",
            "expression pattern",
            "high throughput experiment",
            "high throughput direct assay",
            "high throughput expression pattern",
            "high throughput genetic interaction",
            "high throughput mutant phenotype",
        ];
        EvidenceConfig {
            phrases: phrases.iter().map(|p| format!("inferred from {}", p)).collect(),
            negation_qualifier: "NOT".to_string(),
            evidence_property: "evidence_code".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConservationConfig {
    pub source_tag: String,
    pub relationship: String,
    /// When unset, the number of distinct organisms seen in the source is used.
    pub required_species_count: Option<usize>,
    pub max_coverage: usize,
    pub absent_conservation: AbsentConservation,
}

impl Default for ConservationConfig {
    fn default() -> Self {
        ConservationConfig {
            source_tag: "DIOPT".to_string(),
            relationship: "orthologous_to".to_string(),
            required_species_count: None,
            max_coverage: 1,
            absent_conservation: AbsentConservation::Unevaluated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_evidence_phrases() {
        let evidence = EvidenceConfig::default();
        assert_eq!(evidence.phrases.len(), 10);
        assert!(evidence.phrases.contains(&"inferred from direct assay".to_string()));
        assert!(evidence.phrases.contains(&"inferred from high throughput mutant phenotype".to_string()));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r"
connection:
  host: localhost
  port: 5433
conservation:
  required_species_count: 9
";
        let config = ReportConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.connection.host, "localhost");
        assert_eq!(config.connection.port, 5433);
        assert_eq!(config.connection.user, "flybase");
        assert_eq!(config.conservation.required_species_count, Some(9));
        assert_eq!(config.conservation.source_tag, "DIOPT");
        assert_eq!(config.sequence_type, "golden_path");
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let err = ReportConfig::from_yaml_str("connection: [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_apply_vars() {
        let mut vars = HashMap::new();
        vars.insert("CHADO_HOST", "db.example.org");
        vars.insert("CHADO_PASSWORD", "secret");
        vars.insert("CHADO_PORT", "6543");

        let mut settings = ConnectionSettings::default();
        settings.apply_vars(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(settings.host, "db.example.org");
        assert_eq!(settings.password.as_deref(), Some("secret"));
        assert_eq!(settings.port, 6543);
        assert_eq!(settings.dbname, "flybase");
    }

    #[test]
    fn test_bad_port_var() {
        let mut settings = ConnectionSettings::default();
        let err = settings.apply_vars(|key| {
            if key == "CHADO_PORT" { Some("fifty".to_string()) } else { None }
        }).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_hides_password() {
        let mut settings = ConnectionSettings::default();
        settings.password = Some("hunter2".to_string());
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("hunter2"));
    }
}
