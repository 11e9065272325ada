//! Word similarity settings.
//!
//! Settings come either from serde (any format the caller likes) or from the
//! flat key/value map used by the pipeline configuration, with keys such as
//! `ngram_Enabled` or `levenshtein_MaxDistance`. Values are checked while
//! parsing; nothing is clamped.

use crate::character::CharacterMatch;
use crate::error::{validate_threshold, ConfigError};
use crate::measures::NgramVariant;
use crate::strategy::{ComparisonStrategy, SimilarityStrategy};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevenshteinSettings {
    pub enabled: bool,
    pub min_length: usize,
    pub max_distance: usize,
    pub threshold: f64,
}

impl Default for LevenshteinSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_length: 2,
            max_distance: 1,
            threshold: 0.90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NgramSettings {
    pub enabled: bool,
    pub n: usize,
    pub variant: NgramVariant,
    pub threshold: f64,
}

impl Default for NgramSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            n: 2,
            variant: NgramVariant::Lucene,
            threshold: 0.9,
        }
    }
}

/// An on/off measure with a threshold and optionally a data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureSettings {
    pub enabled: bool,
    pub threshold: f64,
    pub path: Option<PathBuf>,
}

impl MeasureSettings {
    fn enabled(threshold: f64) -> Self {
        Self {
            enabled: true,
            threshold,
            path: None,
        }
    }

    fn disabled(threshold: f64) -> Self {
        Self {
            enabled: false,
            threshold,
            path: None,
        }
    }
}

impl Default for MeasureSettings {
    fn default() -> Self {
        Self::disabled(0.9)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NasariSettings {
    pub enabled: bool,
    pub threshold: f64,
    /// Sense vector table, keyed by sense id.
    pub database_path: Option<PathBuf>,
    /// Lemma to sense id cache (JSON object).
    pub sense_cache_path: Option<PathBuf>,
}

impl Default for NasariSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 0.9,
            database_path: None,
            sense_cache_path: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordNetSettings {
    pub enabled: bool,
    pub lexicon_path: Option<PathBuf>,
    pub use_cache: bool,
    pub wu_palmer: MeasureSettings,
    pub shortest_path: MeasureSettings,
    pub ezzikouri: MeasureSettings,
}

impl Default for WordNetSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            lexicon_path: None,
            use_cache: true,
            wu_palmer: MeasureSettings::enabled(0.9),
            shortest_path: MeasureSettings::disabled(0.5),
            ezzikouri: MeasureSettings::disabled(0.9),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordSimConfig {
    pub comparison_strategy: ComparisonStrategy,
    pub similarity_strategy: SimilarityStrategy,
    pub character_match: CharacterMatch,
    pub levenshtein: LevenshteinSettings,
    pub jaro_winkler: MeasureSettings,
    pub ngram: NgramSettings,
    pub sewordsim: MeasureSettings,
    pub fast_text: MeasureSettings,
    pub glove: MeasureSettings,
    pub nasari: NasariSettings,
    pub wordnet: WordNetSettings,
}

impl Default for WordSimConfig {
    fn default() -> Self {
        Self {
            comparison_strategy: ComparisonStrategy::default(),
            similarity_strategy: SimilarityStrategy::default(),
            character_match: CharacterMatch::default(),
            levenshtein: LevenshteinSettings::default(),
            jaro_winkler: MeasureSettings::enabled(0.90),
            ngram: NgramSettings::default(),
            sewordsim: MeasureSettings::default(),
            fast_text: MeasureSettings::default(),
            glove: MeasureSettings::default(),
            nasari: NasariSettings::default(),
            wordnet: WordNetSettings::default(),
        }
    }
}

impl WordSimConfig {
    /// Applies a flat key/value map on top of the defaults.
    pub fn from_map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in entries {
            config.set(key.as_ref(), value.as_ref())?;
        }
        Ok(config)
    }

    /// Sets one flat key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "comparisonStrategy" => self.comparison_strategy = value.parse()?,
            "similarityStrategy" => self.similarity_strategy = value.parse()?,
            "characterMatch" => self.character_match = value.parse()?,

            "levenshtein_Enabled" => self.levenshtein.enabled = flag(key, value)?,
            "levenshtein_MinLength" => self.levenshtein.min_length = parse(key, value)?,
            "levenshtein_MaxDistance" => self.levenshtein.max_distance = parse(key, value)?,
            "levenshtein_Threshold" => {
                self.levenshtein.threshold = threshold("levenshtein", key, value)?
            }

            "jaroWinkler_Enabled" => self.jaro_winkler.enabled = flag(key, value)?,
            "jaroWinkler_SimilarityThreshold" => {
                self.jaro_winkler.threshold = threshold("jaroWinkler", key, value)?
            }

            "ngram_Enabled" => self.ngram.enabled = flag(key, value)?,
            "ngram_NgramLength" => {
                let n: i64 = parse(key, value)?;
                if n <= 0 {
                    return Err(ConfigError::InvalidNgramLength(n));
                }
                self.ngram.n = n as usize;
            }
            "ngram_Variant" => self.ngram.variant = value.parse()?,
            "ngram_SimilarityThreshold" => self.ngram.threshold = threshold("ngram", key, value)?,

            "sewordsim_Enabled" => self.sewordsim.enabled = flag(key, value)?,
            "sewordsim_SimilarityThreshold" => {
                self.sewordsim.threshold = threshold("sewordsim", key, value)?
            }
            "sewordsim_DatabaseFilePath" => self.sewordsim.path = Some(PathBuf::from(value)),

            "fastText_Enabled" => self.fast_text.enabled = flag(key, value)?,
            "fastText_SimilarityThreshold" => {
                self.fast_text.threshold = threshold("fastText", key, value)?
            }
            "fastText_ModelPath" => self.fast_text.path = Some(PathBuf::from(value)),

            "glove_Enabled" => self.glove.enabled = flag(key, value)?,
            "glove_SimilarityThreshold" => self.glove.threshold = threshold("glove", key, value)?,
            "glove_DatabaseFilePath" => self.glove.path = Some(PathBuf::from(value)),

            "nasari_Enabled" => self.nasari.enabled = flag(key, value)?,
            "nasari_SimilarityThreshold" => {
                self.nasari.threshold = threshold("nasari", key, value)?
            }
            "nasari_DatabaseFilePath" => self.nasari.database_path = Some(PathBuf::from(value)),
            "babelNet_CacheFilePath" => self.nasari.sense_cache_path = Some(PathBuf::from(value)),

            "wordNet_Enabled" => self.wordnet.enabled = flag(key, value)?,
            "wordNet_LexiconFilePath" => self.wordnet.lexicon_path = Some(PathBuf::from(value)),
            "wordNet_useCache" => self.wordnet.use_cache = flag(key, value)?,
            "wordNet_Algo_WuPalmer_Enabled" => self.wordnet.wu_palmer.enabled = flag(key, value)?,
            "wordNet_Algo_WuPalmer_Threshold" => {
                self.wordnet.wu_palmer.threshold = threshold("wordNet", key, value)?
            }
            "wordNet_Algo_ShortestPath_Enabled" => {
                self.wordnet.shortest_path.enabled = flag(key, value)?
            }
            "wordNet_Algo_ShortestPath_Threshold" => {
                self.wordnet.shortest_path.threshold = threshold("wordNet", key, value)?
            }
            "wordNet_Algo_Ezzikouri_Enabled" => self.wordnet.ezzikouri.enabled = flag(key, value)?,
            "wordNet_Algo_Ezzikouri_Threshold" => {
                self.wordnet.ezzikouri.threshold = threshold("wordNet", key, value)?
            }

            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// `true`/`false`, any case.
fn flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn threshold(measure: &'static str, key: &str, value: &str) -> Result<f64, ConfigError> {
    validate_threshold(measure, parse(key, value)?)
}
