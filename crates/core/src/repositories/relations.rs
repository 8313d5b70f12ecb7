//! Relation mutations.
//!
//! Relation records are directed edges: "relative_id is <relationship> of
//! client_id". No reverse record is created automatically and duplicates
//! between the same pair are allowed.
//!
//! `replace` keeps the original system's destructive replace-all contract:
//! it deletes *every* relation owned by the client before inserting the new
//! record, regardless of which relative the old records pointed at. Callers
//! that want per-pair updates must remove and re-add instead.

use rusqlite::{params, OptionalExtension};

use crate::document::validate_client_id;
use crate::{store, CoreError, CoreResult, Store};

/// Write-side service over the `relations` collection.
#[derive(Clone, Debug)]
pub struct RelationService {
    store: Store,
}

impl RelationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate(client_id: &str, relative_id: &str, relationship: &str) -> CoreResult<()> {
        validate_client_id(client_id)?;
        validate_client_id(relative_id)?;
        if relationship.trim().is_empty() {
            return Err(CoreError::InvalidInput("relationship required".into()));
        }
        Ok(())
    }

    /// Attach a relation record between two existing clients.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for malformed ids or an empty
    /// relationship label, and `CoreError::ClientNotFound` if either side
    /// does not exist.
    pub async fn add(
        &self,
        client_id: &str,
        relative_id: &str,
        relationship: &str,
    ) -> CoreResult<()> {
        Self::validate(client_id, relative_id, relationship)?;

        let (client_id, relative_id, relationship) = (
            client_id.to_string(),
            relative_id.to_string(),
            relationship.to_string(),
        );
        self.store
            .with_connection(move |conn| {
                if !store::client_exists(conn, &client_id)?
                    || !store::client_exists(conn, &relative_id)?
                {
                    return Err(CoreError::ClientNotFound);
                }

                conn.execute(
                    "INSERT INTO relations (client_id, relative_id, relationship)
                     VALUES (?1, ?2, ?3)",
                    params![client_id, relative_id, relationship],
                )?;
                Ok(())
            })
            .await
    }

    /// Replace the client's relationship record.
    ///
    /// Destructive replace-all: deletes every relation owned by `client_id`
    /// and inserts exactly one new record, so the client has at most one
    /// outgoing relation afterwards.
    pub async fn replace(
        &self,
        client_id: &str,
        relative_id: &str,
        relationship: &str,
    ) -> CoreResult<()> {
        Self::validate(client_id, relative_id, relationship)?;

        let (client_id, relative_id, relationship) = (
            client_id.to_string(),
            relative_id.to_string(),
            relationship.to_string(),
        );
        self.store
            .with_connection(move |conn| {
                if !store::client_exists(conn, &client_id)?
                    || !store::client_exists(conn, &relative_id)?
                {
                    return Err(CoreError::ClientNotFound);
                }

                conn.execute(
                    "DELETE FROM relations WHERE client_id = ?1",
                    params![client_id],
                )?;
                conn.execute(
                    "INSERT INTO relations (client_id, relative_id, relationship)
                     VALUES (?1, ?2, ?3)",
                    params![client_id, relative_id, relationship],
                )?;
                Ok(())
            })
            .await
    }

    /// Remove one relation record matching both sides exactly.
    ///
    /// When duplicates exist, only the oldest matching record is removed.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::RelationNotFound` if no record matches.
    pub async fn remove(&self, client_id: &str, relative_id: &str) -> CoreResult<()> {
        validate_client_id(client_id)?;
        validate_client_id(relative_id)?;

        let (client_id, relative_id) = (client_id.to_string(), relative_id.to_string());
        self.store
            .with_connection(move |conn| {
                let record_id: Option<i64> = conn
                    .query_row(
                        "SELECT id FROM relations
                         WHERE client_id = ?1 AND relative_id = ?2
                         ORDER BY id LIMIT 1",
                        params![client_id, relative_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                match record_id {
                    Some(record_id) => {
                        conn.execute("DELETE FROM relations WHERE id = ?1", params![record_id])?;
                        Ok(())
                    }
                    None => Err(CoreError::RelationNotFound),
                }
            })
            .await
    }
}
