//! Embedded document store access.
//!
//! Two tables act as the system's collections: `clients` holds schemaless
//! JSON documents keyed by store-assigned id, and `relations` holds directed
//! relation records between client ids. Connections are opened per operation
//! with WAL pragmas, and all store work runs on the blocking pool so request
//! handlers never block the async runtime.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tokio::task;

use crate::document::Document;
use crate::{CoreConfig, CoreError, CoreResult};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS clients (
        id TEXT PRIMARY KEY,
        doc TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS relations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        client_id TEXT NOT NULL,
        relative_id TEXT NOT NULL,
        relationship TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_relations_client ON relations (client_id);
    CREATE INDEX IF NOT EXISTS idx_relations_relative ON relations (relative_id);";

/// Handle to the document store.
///
/// Cheap to clone; each service receives its own handle at construction
/// rather than reaching for a process-wide global.
#[derive(Clone, Debug)]
pub struct Store {
    db_path: PathBuf,
}

impl Store {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            db_path: cfg.db_path().to_path_buf(),
        }
    }

    /// Create the collections and their indexes if they do not exist yet.
    ///
    /// Safe to call on every startup.
    pub async fn initialise(&self) -> CoreResult<()> {
        self.with_connection(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
    }

    /// Run `f` against a fresh pragma-configured connection on the blocking
    /// pool.
    pub async fn with_connection<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&Connection) -> CoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.db_path.clone();
        task::spawn_blocking(move || {
            let conn = open(&path)?;
            f(&conn)
        })
        .await?
    }
}

/// Open a connection with the store's standard pragmas.
///
/// WAL mode for concurrent readers, NORMAL sync for speed, foreign keys on.
fn open(path: &Path) -> CoreResult<Connection> {
    let conn = Connection::open(path).map_err(CoreError::Database)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL; \
         PRAGMA synchronous = NORMAL; \
         PRAGMA foreign_keys = ON;",
    )?;
    Ok(conn)
}

/// Fetch one client document by id.
pub fn client_doc(conn: &Connection, client_id: &str) -> CoreResult<Option<Document>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT doc FROM clients WHERE id = ?1",
            params![client_id],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|raw| decode_doc(&raw)).transpose()
}

/// Check whether a client row exists without decoding its document.
pub fn client_exists(conn: &Connection, client_id: &str) -> CoreResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM clients WHERE id = ?1",
            params![client_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Fetch every client in insertion order.
pub fn all_clients(conn: &Connection) -> CoreResult<Vec<(String, Document)>> {
    let mut stmt = conn.prepare("SELECT id, doc FROM clients ORDER BY rowid")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    rows.into_iter()
        .map(|(id, raw)| Ok((id, decode_doc(&raw)?)))
        .collect()
}

/// Insert or overwrite one client document.
pub fn write_client_doc(conn: &Connection, client_id: &str, doc: &Document) -> CoreResult<()> {
    let raw = encode_doc(doc)?;
    conn.execute(
        "INSERT INTO clients (id, doc) VALUES (?1, ?2)
         ON CONFLICT (id) DO UPDATE SET doc = excluded.doc",
        params![client_id, raw],
    )?;
    Ok(())
}

pub fn encode_doc(doc: &Document) -> CoreResult<String> {
    serde_json::to_string(doc).map_err(CoreError::Serialization)
}

pub fn decode_doc(raw: &str) -> CoreResult<Document> {
    serde_json::from_str(raw).map_err(CoreError::Deserialization)
}
