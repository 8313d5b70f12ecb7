//! Relative resolution.
//!
//! Given a client id, the resolver reads that client's relation records and
//! looks up each referenced client document, projecting
//! `{id, fullName, relationship}` per relation. This is the application-side
//! join used by every endpoint that includes relationship data.
//!
//! Relation records are read in insertion order, which keeps the output
//! deterministic per call given unchanged data. A relation pointing at a
//! client that no longer exists is skipped with a warning rather than
//! failing the whole request; stale data must not turn reads into errors.

use rusqlite::{params, Connection};

use crate::document::{full_name_of, Relative};
use crate::{store, CoreResult, Store};

/// Read-only resolver for a client's relatives.
#[derive(Clone, Debug)]
pub struct RelativeResolver {
    store: Store,
}

impl RelativeResolver {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Resolve the relatives of `client_id`.
    ///
    /// Returns an empty list for clients with no relation records (including
    /// ids unknown to the store: resolution never checks the owning client).
    pub async fn resolve(&self, client_id: &str) -> CoreResult<Vec<Relative>> {
        let client_id = client_id.to_string();
        self.store
            .with_connection(move |conn| relatives_for(conn, &client_id))
            .await
    }
}

/// Synchronous resolution against an already-open connection.
///
/// Batch callers (list, search) use this directly so one connection serves
/// the whole request instead of the original per-client round trips.
pub fn relatives_for(conn: &Connection, client_id: &str) -> CoreResult<Vec<Relative>> {
    let mut stmt = conn.prepare(
        "SELECT relative_id, relationship FROM relations WHERE client_id = ?1 ORDER BY id",
    )?;
    let records = stmt
        .query_map(params![client_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    let mut relatives = Vec::with_capacity(records.len());
    for (relative_id, relationship) in records {
        match store::client_doc(conn, &relative_id)? {
            Some(doc) => relatives.push(Relative {
                id: relative_id,
                full_name: full_name_of(&doc),
                relationship,
            }),
            None => {
                // Dangling reference: the relative was deleted out from under
                // this relation record.
                tracing::warn!(%client_id, %relative_id, "skipping relation to missing client");
            }
        }
    }

    Ok(relatives)
}
