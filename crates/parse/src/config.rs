use std::path::{Path, PathBuf};

use extracto_core::Bank;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::Ruleset;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid noise pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("{bank} statements have no detail section to end")]
    NoSection { bank: Bank },
}

/// Extra rules merged into one bank's built-in ruleset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BankOverrides {
    /// Phrases that mark a line as noise (case-insensitive substring).
    pub extra_noise: Vec<String>,
    /// Regexes that mark a line as noise. Compiled case-insensitive.
    pub extra_noise_patterns: Vec<String>,
    /// Phrases that close the detail section.
    pub extra_section_end: Vec<String>,
}

impl BankOverrides {
    pub fn is_empty(&self) -> bool {
        self.extra_noise.is_empty()
            && self.extra_noise_patterns.is_empty()
            && self.extra_section_end.is_empty()
    }

    pub fn apply(&self, bank: Bank, mut rules: Ruleset) -> Result<Ruleset, ConfigError> {
        rules.noise.extend(self.extra_noise.iter().cloned());

        for pattern in &self.extra_noise_patterns {
            let compiled = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| ConfigError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            rules.noise_patterns.push(compiled);
        }

        if !self.extra_section_end.is_empty() {
            let section = rules.section.as_mut().ok_or(ConfigError::NoSection { bank })?;
            section.end.extend(self.extra_section_end.iter().cloned());
        }

        Ok(rules)
    }
}

/// Engine configuration, usually loaded from a TOML file:
///
/// ```toml
/// [banamex]
/// extra_noise = ["AVISO IMPORTANTE"]
/// extra_section_end = ["INVERSIONES"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub bbva: BankOverrides,
    pub banbajio: BankOverrides,
    pub banamex: BankOverrides,
    pub banorte: BankOverrides,
}

impl EngineConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn overrides(&self, bank: Bank) -> &BankOverrides {
        match bank {
            Bank::Bbva => &self.bbva,
            Bank::Banbajio => &self.banbajio,
            Bank::Banamex => &self.banamex,
            Bank::Banorte => &self.banorte,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SectionRules;
    use regex::Regex;

    fn rules(section: bool) -> Ruleset {
        let r = Ruleset::new(&Regex::new(r"^(?P<day>\d+) (?P<month>\w+) (?P<rest>.*)$").unwrap());
        if section {
            r.with_section(SectionRules {
                start: vec!["DETALLE".into()],
                end: vec!["RESUMEN".into()],
                ..Default::default()
            })
        } else {
            r
        }
    }

    #[test]
    fn empty_toml_is_default() {
        let cfg = EngineConfig::from_toml("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert!(cfg.overrides(Bank::Banorte).is_empty());
    }

    #[test]
    fn parses_per_bank_tables() {
        let cfg = EngineConfig::from_toml(
            r#"
            [banamex]
            extra_noise = ["AVISO IMPORTANTE"]
            extra_section_end = ["INVERSIONES"]

            [bbva]
            extra_noise_patterns = ['^FOLIO\s+\d+$']
            "#,
        )
        .unwrap();
        assert_eq!(cfg.banamex.extra_noise, vec!["AVISO IMPORTANTE"]);
        assert_eq!(cfg.overrides(Bank::Bbva).extra_noise_patterns.len(), 1);
        assert!(cfg.banorte.is_empty());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            EngineConfig::from_toml("[hsbc]\nextra_noise = []"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml("[bbva]\nnoise = []"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn apply_merges_phrases_and_patterns() {
        let o = BankOverrides {
            extra_noise: vec!["AVISO".into()],
            extra_noise_patterns: vec![r"^folio\s+\d+$".into()],
            extra_section_end: vec!["INVERSIONES".into()],
        };
        let merged = o.apply(Bank::Banamex, rules(true)).unwrap();
        assert!(merged.noise.contains(&"AVISO".to_string()));
        assert!(merged.noise_patterns[0].is_match("FOLIO 123"));
        assert_eq!(merged.section.unwrap().end, vec!["RESUMEN", "INVERSIONES"]);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let o = BankOverrides {
            extra_noise_patterns: vec!["(unclosed".into()],
            ..Default::default()
        };
        match o.apply(Bank::Bbva, rules(false)) {
            Err(ConfigError::Pattern { pattern, .. }) => assert_eq!(pattern, "(unclosed"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn section_end_needs_a_section() {
        let o = BankOverrides {
            extra_section_end: vec!["FIN".into()],
            ..Default::default()
        };
        assert!(matches!(
            o.apply(Bank::Bbva, rules(false)),
            Err(ConfigError::NoSection { bank: Bank::Bbva })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = EngineConfig::load(Path::new("/nonexistent/extracto.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
