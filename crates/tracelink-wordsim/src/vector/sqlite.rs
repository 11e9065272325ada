//! SQLite vector tables.
//!
//! Table `words(word TEXT, vec BLOB)`; each blob holds the vector as
//! consecutive big-endian `f32` values. Word keys are stemmed unless the
//! table holds non-word keys such as sense ids.

use super::WordVectorDataSource;
use crate::error::DataSourceError;
use crate::sqlite::SqliteDatabase;
use crate::stem::stem;
use byteorder::{BigEndian, ByteOrder};
use sqlx::Row;
use std::path::Path;

const SELECT_VECTOR: &str = "SELECT `vec` FROM `words` WHERE `word` = ?";

#[derive(Debug)]
pub struct SqliteVectorTable {
    database: SqliteDatabase,
    stem_keys: bool,
}

impl SqliteVectorTable {
    /// Opens the table read-only. Lookups stem their key by default.
    pub fn open(path: &Path) -> Result<Self, DataSourceError> {
        Ok(Self {
            database: SqliteDatabase::open_read_only(path)?,
            stem_keys: true,
        })
    }

    pub fn with_stemming(mut self, stem_keys: bool) -> Self {
        self.stem_keys = stem_keys;
        self
    }

    pub fn path(&self) -> &Path {
        self.database.path()
    }

    pub fn close(&self) {
        self.database.close();
    }
}

impl WordVectorDataSource for SqliteVectorTable {
    fn get_word_vector(&self, word: &str) -> Result<Option<Vec<f32>>, DataSourceError> {
        let key = if self.stem_keys {
            stem(word)
        } else {
            word.to_string()
        };
        let Some(row) = self.database.fetch_optional(SELECT_VECTOR, &[key.as_str()])? else {
            return Ok(None);
        };
        let blob: Vec<u8> = row.try_get("vec")?;
        decode_vector(&blob).map(Some)
    }
}

pub(crate) fn decode_vector(blob: &[u8]) -> Result<Vec<f32>, DataSourceError> {
    if blob.len() % 4 != 0 {
        return Err(DataSourceError::Format(format!(
            "vector blob of {} bytes is not a sequence of f32",
            blob.len()
        )));
    }
    let mut vector = vec![0.0_f32; blob.len() / 4];
    BigEndian::read_f32_into(blob, &mut vector);
    Ok(vector)
}

pub(crate) fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut blob = vec![0_u8; vector.len() * 4];
    BigEndian::write_f32_into(vector, &mut blob);
    blob
}
