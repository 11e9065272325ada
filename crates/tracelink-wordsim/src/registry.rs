//! Builds the enabled measures from settings.
//!
//! Equality always comes first. Data sources are opened here, once, and
//! owned by the measures built on them.

use crate::config::WordSimConfig;
use crate::error::{ConfigError, WordSimError};
use crate::lexicon::{Lexicon, SenseCache};
use crate::measure::{SimilarityMeasure, WordSimMeasure};
use crate::measures::{
    EqualityMeasure, JaroWinklerMeasure, LevenshteinMeasure, NasariMeasure, NgramMeasure,
    RelatednessCalculator, SeWordSimMeasure, VectorBasedMeasure, WordNetMeasure,
};
use crate::vector::{load_binary_vectors, SqliteVectorTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
pub struct MeasureRegistry {
    measures: Vec<SimilarityMeasure>,
}

impl MeasureRegistry {
    pub fn from_config(config: &WordSimConfig) -> Result<Self, WordSimError> {
        let mut measures = vec![SimilarityMeasure::from(EqualityMeasure)];

        let lev = &config.levenshtein;
        if lev.enabled {
            measures.push(LevenshteinMeasure::new(lev.min_length, lev.max_distance, lev.threshold)?.into());
        }
        if config.jaro_winkler.enabled {
            measures.push(JaroWinklerMeasure::new(config.jaro_winkler.threshold)?.into());
        }
        let ngram = &config.ngram;
        if ngram.enabled {
            measures.push(NgramMeasure::new(ngram.variant, ngram.n, ngram.threshold)?.into());
        }

        if config.sewordsim.enabled {
            let path = required(&config.sewordsim.path, "sewordsim", "sewordsim_DatabaseFilePath")?;
            measures.push(SeWordSimMeasure::open(path, config.sewordsim.threshold)?.into());
        }

        if config.fast_text.enabled {
            let path = required(&config.fast_text.path, "fastText", "fastText_ModelPath")?;
            let vectors = load_binary_vectors(path)?;
            measures.push(VectorBasedMeasure::fast_text(Arc::new(vectors), config.fast_text.threshold)?.into());
        }

        let wordnet = &config.wordnet;
        if wordnet.enabled {
            let path = required(&wordnet.lexicon_path, "wordNet", "wordNet_LexiconFilePath")?;
            let lexicon = Arc::new(Lexicon::from_json_file(path)?);
            let calculators = [
                (RelatednessCalculator::WuPalmer, &wordnet.wu_palmer),
                (RelatednessCalculator::ShortestPath, &wordnet.shortest_path),
                (RelatednessCalculator::Ezzikouri, &wordnet.ezzikouri),
            ]
            .into_iter()
            .filter(|(_, settings)| settings.enabled)
            .map(|(calculator, settings)| (calculator, settings.threshold));
            measures.push(
                WordNetMeasure::new(lexicon, calculators)?
                    .with_cache(wordnet.use_cache)
                    .into(),
            );
        }

        if config.glove.enabled {
            let path = required(&config.glove.path, "glove", "glove_DatabaseFilePath")?;
            let table = SqliteVectorTable::open(path)?;
            measures.push(VectorBasedMeasure::glove(Arc::new(table), config.glove.threshold)?.into());
        }

        let nasari = &config.nasari;
        if nasari.enabled {
            let db = required(&nasari.database_path, "nasari", "nasari_DatabaseFilePath")?;
            let cache = required(&nasari.sense_cache_path, "nasari", "babelNet_CacheFilePath")?;
            let senses = SenseCache::from_json_file(cache)?;
            let vectors = SqliteVectorTable::open(db)?.with_stemming(false);
            measures.push(NasariMeasure::new(Arc::new(senses), Arc::new(vectors), nasari.threshold)?.into());
        }

        let registry = Self { measures };
        info!(measures = ?registry.ids(), "loaded word similarity measures");
        Ok(registry)
    }

    pub fn measures(&self) -> &[SimilarityMeasure] {
        &self.measures
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.measures.iter().map(|m| m.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    pub fn into_measures(self) -> Vec<SimilarityMeasure> {
        self.measures
    }
}

fn required<'a>(
    path: &'a Option<PathBuf>,
    measure: &'static str,
    key: &'static str,
) -> Result<&'a Path, ConfigError> {
    path.as_deref().ok_or(ConfigError::MissingPath { measure, key })
}
