//! SQLite store implementation.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::params;
use tokio::sync::{watch, Mutex};
use tokio_rusqlite::Connection;

use freshcache_core::record::Record;
use freshcache_core::storage::{decode_record, encode_record, LocalStore, RepositoryError, Result};

use super::error::{map_tokio_rusqlite_error, wrap_err};
use super::schema;
use crate::store::observers::Observers;

/// SQLite-backed local store for one record kind.
///
/// Mutations run on a spawned task so that a write, once started, commits
/// and notifies observers even if the caller stops waiting. A gate orders
/// mutations against `observe`, which reads the current value and subscribes
/// without a write landing in between.
pub struct SqliteStore<R: Record> {
    conn: Connection,
    gate: Arc<Mutex<()>>,
    observers: Arc<Observers<R>>,
}

impl<R: Record> Clone for SqliteStore<R> {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
            gate: self.gate.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<R: Record> SqliteStore<R> {
    /// Opens (or creates) the database at `path` and initializes the schema.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::unknown_from(
                    format!("Failed to create database directory {}", parent.display()),
                    e,
                )
            })?;
        }

        let conn = Connection::open(path).await.map_err(|e| {
            RepositoryError::unknown(format!(
                "Failed to open SQLite database {}: {e}",
                path.display()
            ))
        })?;
        Self::from_connection(conn).await
    }

    /// Creates a store backed by a private in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await.map_err(|e| {
            RepositoryError::unknown(format!("Failed to open in-memory SQLite database: {e}"))
        })?;
        Self::from_connection(conn).await
    }

    /// Creates a store on an existing connection, initializing the schema.
    ///
    /// Stores for different record kinds may share a connection. Two stores
    /// of the same kind on one database do not see each other's notifications.
    pub async fn from_connection(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(schema::PRAGMAS).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| map_tokio_rusqlite_error(e, R::COLLECTION))?;

        Ok(Self {
            conn,
            gate: Arc::new(Mutex::new(())),
            observers: Arc::new(Observers::new()),
        })
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn read_body(&self, key: String) -> Result<Option<String>> {
        let collection = R::COLLECTION;
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare_cached(schema::SELECT_RECORD).map_err(wrap_err)?;
                let result = stmt.query_row(params![collection, key], |row| row.get::<_, String>(0));
                match result {
                    Ok(body) => Ok(Some(body)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection))
    }

    /// Runs `op` on the connection under the gate, then notifies observers.
    async fn mutate<F, N>(&self, op: F, notify: N) -> Result<()>
    where
        F: FnOnce(&mut rusqlite::Connection) -> std::result::Result<(), tokio_rusqlite::Error>
            + Send
            + 'static,
        N: FnOnce(&Observers<R>) + Send + 'static,
    {
        let conn = self.conn.clone();
        let gate = self.gate.clone();
        let observers = self.observers.clone();

        tokio::spawn(async move {
            let _gate = gate.lock_owned().await;
            conn.call(op)
                .await
                .map_err(|e| map_tokio_rusqlite_error(e, R::COLLECTION))?;
            notify(&observers);
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::unknown(format!("SQLite write task failed: {e}")))?
    }
}

fn encode_rows<R: Record>(records: &[R]) -> Result<Vec<(String, String)>> {
    records
        .iter()
        .map(|r| Ok((r.key().to_string(), encode_record(r)?)))
        .collect()
}

fn write_rows(
    tx: &rusqlite::Transaction<'_>,
    collection: &str,
    rows: &[(String, String)],
    updated_at: &str,
) -> rusqlite::Result<()> {
    let mut stmt = tx.prepare_cached(schema::UPSERT_RECORD)?;
    for (key, body) in rows {
        stmt.execute(params![collection, key, body, updated_at])?;
    }
    Ok(())
}

#[async_trait]
impl<R: Record> LocalStore<R> for SqliteStore<R> {
    async fn get(&self, key: &R::Key) -> Result<Option<R>> {
        self.read_body(key.to_string())
            .await?
            .map(|body| decode_record(&body))
            .transpose()
    }

    async fn get_all(&self) -> Result<Vec<R>> {
        let collection = R::COLLECTION;
        let bodies = self
            .conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare_cached(schema::SELECT_COLLECTION)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params![collection], |row| row.get::<_, String>(0))
                    .map_err(wrap_err)?;
                rows.collect::<rusqlite::Result<Vec<String>>>()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, collection))?;

        bodies.iter().map(|body| decode_record(body)).collect()
    }

    async fn upsert(&self, record: &R) -> Result<()> {
        self.upsert_all(std::slice::from_ref(record)).await
    }

    async fn upsert_all(&self, records: &[R]) -> Result<()> {
        let rows = encode_rows(records)?;
        let updated_at = Utc::now().to_rfc3339();
        let updates: Vec<(R::Key, Option<R>)> =
            records.iter().map(|r| (r.key(), Some(r.clone()))).collect();

        self.mutate(
            move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                write_rows(&tx, R::COLLECTION, &rows, &updated_at).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)
            },
            move |observers| observers.publish_many(updates),
        )
        .await
    }

    async fn replace_all(&self, records: &[R]) -> Result<()> {
        let rows = encode_rows(records)?;
        let updated_at = Utc::now().to_rfc3339();
        let snapshot = records.to_vec();

        self.mutate(
            move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::DELETE_COLLECTION, params![R::COLLECTION])
                    .map_err(wrap_err)?;
                write_rows(&tx, R::COLLECTION, &rows, &updated_at).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)
            },
            move |observers| observers.publish_replaced(&snapshot),
        )
        .await
    }

    async fn delete(&self, key: &R::Key) -> Result<()> {
        let key_str = key.to_string();
        let key = key.clone();

        self.mutate(
            move |conn| {
                conn.execute(schema::DELETE_RECORD, params![R::COLLECTION, key_str])
                    .map_err(wrap_err)?;
                Ok(())
            },
            move |observers| observers.publish(&key, None),
        )
        .await
    }

    async fn observe(&self, key: &R::Key) -> Result<watch::Receiver<Option<R>>> {
        let _gate = self.gate.lock().await;
        let current = self.get(key).await?;
        Ok(self.observers.subscribe(key, current))
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.observers.changes()
    }
}
