//! Blocking reads from read-only SQLite databases.
//!
//! Measures are called synchronously, so each database owns a small tokio
//! runtime and blocks on pooled sqlx queries. Callers must not use these from
//! inside an async context. The pool is closed when the handle is closed or
//! dropped.

use crate::error::DataSourceError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::info;

const MAX_CONNECTIONS: u32 = 4;

#[derive(Debug)]
pub(crate) struct SqliteDatabase {
    runtime: Runtime,
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteDatabase {
    pub(crate) fn open_read_only(path: &Path) -> Result<Self, DataSourceError> {
        if !path.exists() {
            return Err(DataSourceError::MissingFile(path.to_path_buf()));
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("tracelink-sqlite")
            .enable_all()
            .build()?;
        let options = SqliteConnectOptions::new().filename(path).read_only(true);
        let pool = runtime.block_on(
            SqlitePoolOptions::new()
                .max_connections(MAX_CONNECTIONS)
                .connect_with(options),
        )?;

        info!(path = %path.display(), "opened sqlite data source");
        Ok(Self {
            runtime,
            pool,
            path: path.to_path_buf(),
        })
    }

    pub(crate) fn fetch_optional<'q>(
        &self,
        sql: &'q str,
        binds: &[&'q str],
    ) -> Result<Option<SqliteRow>, DataSourceError> {
        let mut query = sqlx::query(sql);
        for value in binds {
            query = query.bind(*value);
        }
        Ok(self.runtime.block_on(query.fetch_optional(&self.pool))?)
    }

    pub(crate) fn fetch_all(&self, sql: &str) -> Result<Vec<SqliteRow>, DataSourceError> {
        Ok(self.runtime.block_on(sqlx::query(sql).fetch_all(&self.pool))?)
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn close(&self) {
        if !self.pool.is_closed() {
            self.runtime.block_on(self.pool.close());
        }
    }
}

impl Drop for SqliteDatabase {
    fn drop(&mut self) {
        self.close();
    }
}
