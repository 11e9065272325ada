//! Imports a text vector file into a SQLite vector table.
//!
//! Each input line is `word v1 v2 .. vd`, separated by single spaces. Words
//! longer than the maximum length are skipped and reported; a line with the
//! wrong number of components aborts the import.

use super::sqlite::encode_vector;
use crate::stem::stem;
use anyhow::{bail, ensure, Context};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, info};

pub const DEFAULT_MAX_WORD_LENGTH: usize = 300;

const CREATE_TABLE: &str =
    "CREATE TABLE IF NOT EXISTS `words` (`word` TEXT PRIMARY KEY, `vec` BLOB NOT NULL)";
const INSERT: &str = "INSERT OR IGNORE INTO `words` (`word`, `vec`) VALUES (?, ?)";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportResult {
    pub inserted: u64,
    pub skipped_words: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct VectorTableImporter {
    vector_file: PathBuf,
    database_file: PathBuf,
    dimension: usize,
    max_word_length: usize,
    start_line: u64,
    end_line: Option<u64>,
    dry_run: bool,
    stem_words: bool,
}

impl VectorTableImporter {
    pub fn new(vector_file: impl Into<PathBuf>, database_file: impl Into<PathBuf>, dimension: usize) -> Self {
        Self {
            vector_file: vector_file.into(),
            database_file: database_file.into(),
            dimension,
            max_word_length: DEFAULT_MAX_WORD_LENGTH,
            start_line: 0,
            end_line: None,
            dry_run: false,
            stem_words: true,
        }
    }

    pub fn with_max_word_length(mut self, max_word_length: usize) -> Self {
        self.max_word_length = max_word_length;
        self
    }

    /// Only lines `start..=end` (1-based) are imported.
    pub fn with_line_range(mut self, start: u64, end: Option<u64>) -> Self {
        self.start_line = start;
        self.end_line = end;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether words are stemmed before insertion. Keep this on for tables
    /// read through a stemming [`super::SqliteVectorTable`].
    pub fn with_stemming(mut self, stem_words: bool) -> Self {
        self.stem_words = stem_words;
        self
    }

    pub fn run(&self) -> anyhow::Result<ImportResult> {
        ensure!(
            self.vector_file.exists(),
            "vector file does not exist: {}",
            self.vector_file.display()
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start import runtime")?;
        let result = runtime.block_on(self.import())?;
        info!(
            inserted = result.inserted,
            skipped = result.skipped_words.len(),
            "vector import finished"
        );
        Ok(result)
    }

    async fn import(&self) -> anyhow::Result<ImportResult> {
        let options = SqliteConnectOptions::new()
            .filename(&self.database_file)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open {}", self.database_file.display()))?;
        sqlx::query(CREATE_TABLE).execute(&pool).await?;

        let reader = BufReader::new(
            File::open(&self.vector_file)
                .with_context(|| format!("failed to open {}", self.vector_file.display()))?,
        );
        let mut result = ImportResult::default();
        let mut tx = pool.begin().await?;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index as u64 + 1;
            if self.end_line.is_some_and(|end| line_number > end) {
                break;
            }
            let line = line?;
            if line_number < self.start_line {
                continue;
            }

            let parts: Vec<&str> = line.split(' ').collect();
            if parts.len() - 1 != self.dimension {
                bail!("line {line_number} has invalid vector dimension: {line:?}");
            }

            let word = parts[0];
            if word.is_empty() || word.chars().count() > self.max_word_length {
                result.skipped_words.push(word.to_string());
                continue;
            }
            let key = if self.stem_words {
                stem(word)
            } else {
                word.to_string()
            };

            let vector = parts[1..]
                .iter()
                .map(|value| value.parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("line {line_number} has a malformed component"))?;

            if self.dry_run {
                debug!(word = %key, "would have inserted");
            } else {
                sqlx::query(INSERT)
                    .bind(&key)
                    .bind(encode_vector(&vector))
                    .execute(&mut *tx)
                    .await?;
            }
            result.inserted += 1;
        }

        tx.commit().await?;
        pool.close().await;
        Ok(result)
    }
}
