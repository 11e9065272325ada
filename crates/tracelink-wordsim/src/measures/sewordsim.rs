//! Precomputed software-engineering word similarities (SEWordSim).
//!
//! The database holds one table `wsim(term_1, term_2, similarity)` keyed by
//! Porter stems.

use crate::context::ComparisonContext;
use crate::error::{validate_threshold, DataSourceError, WordSimError};
use crate::measure::WordSimMeasure;
use crate::sqlite::SqliteDatabase;
use crate::stem::stem;
use sqlx::Row;
use std::path::Path;
use tracing::warn;

const SELECT_SIMILARITY: &str =
    "SELECT `similarity` FROM `wsim` WHERE `term_1` = ? AND `term_2` = ?";
const EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM `wsim` WHERE `term_1` = ?) AS `ex`";
const SELECT_ALL: &str = "SELECT DISTINCT `term_1` FROM `wsim`";

/// Read-only handle on a SEWordSim database. The connection pool stays
/// open until [`SeWordSimDataSource::close`] or drop.
#[derive(Debug)]
pub struct SeWordSimDataSource {
    database: SqliteDatabase,
}

impl SeWordSimDataSource {
    pub fn open(path: &Path) -> Result<Self, DataSourceError> {
        Ok(Self {
            database: SqliteDatabase::open_read_only(path)?,
        })
    }

    pub fn contains_word(&self, word: &str) -> Result<bool, DataSourceError> {
        if word.is_empty() {
            return Ok(false);
        }
        let key = stem(word);
        let row = self.database.fetch_optional(EXISTS, &[key.as_str()])?;
        Ok(match row {
            Some(row) => row.try_get::<i64, _>("ex")? > 0,
            None => false,
        })
    }

    /// Similarity of the stemmed pair, in either column order.
    pub fn similarity(&self, first: &str, second: &str) -> Result<Option<f64>, DataSourceError> {
        let (first, second) = (stem(first), stem(second));
        for (a, b) in [(first.as_str(), second.as_str()), (second.as_str(), first.as_str())] {
            if let Some(row) = self.database.fetch_optional(SELECT_SIMILARITY, &[a, b])? {
                return Ok(Some(row.try_get::<f64, _>("similarity")?));
            }
        }
        Ok(None)
    }

    pub fn all_words(&self) -> Result<Vec<String>, DataSourceError> {
        self.database
            .fetch_all(SELECT_ALL)?
            .iter()
            .map(|row| row.try_get::<String, _>("term_1").map_err(DataSourceError::from))
            .collect()
    }

    pub fn close(&self) {
        self.database.close();
    }
}

#[derive(Debug)]
pub struct SeWordSimMeasure {
    source: SeWordSimDataSource,
    threshold: f64,
}

impl SeWordSimMeasure {
    pub fn new(source: SeWordSimDataSource, threshold: f64) -> Result<Self, WordSimError> {
        Ok(Self {
            source,
            threshold: validate_threshold("sewordsim", threshold)?,
        })
    }

    pub fn open(path: &Path, threshold: f64) -> Result<Self, WordSimError> {
        let threshold = validate_threshold("sewordsim", threshold)?;
        Self::new(SeWordSimDataSource::open(path)?, threshold)
    }

    pub fn source(&self) -> &SeWordSimDataSource {
        &self.source
    }
}

impl WordSimMeasure for SeWordSimMeasure {
    fn id(&self) -> &'static str {
        "sewordsim"
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        let score = self.similarity(ctx);
        !score.is_nan() && score >= self.threshold
    }

    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        match self.source.similarity(ctx.first_term(), ctx.second_term()) {
            Ok(Some(score)) => score,
            Ok(None) => f64::NAN,
            Err(error) => {
                warn!(%error, "sewordsim lookup failed");
                f64::NAN
            }
        }
    }
}
