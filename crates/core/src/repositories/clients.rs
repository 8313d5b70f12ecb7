//! Client queries and mutations.
//!
//! Client documents are stored as-is: no field enforcement beyond JSON
//! object-ness, preserving compatibility with the permissive records already
//! in the store. Queries decorate clients with resolved relatives; mutations
//! keep the `relations` collection consistent via an explicit two-sided
//! cascade on delete.

use regex::RegexBuilder;
use uuid::Uuid;

use crate::document::{
    full_name_of, validate_client_id, ClientFamily, ClientRecord, ClientWithRelatives, Document,
    SearchEntry,
};
use crate::repositories::relatives::{relatives_for, RelativeResolver};
use crate::{store, CoreError, CoreResult, Store};

/// Read-side service over the `clients` collection.
#[derive(Clone, Debug)]
pub struct ClientQueryService {
    store: Store,
    resolver: RelativeResolver,
}

impl ClientQueryService {
    pub fn new(store: Store) -> Self {
        let resolver = RelativeResolver::new(store.clone());
        Self { store, resolver }
    }

    /// List every client, each decorated with its resolved relatives.
    ///
    /// Runs on a single connection: clients are fetched once and relatives
    /// are resolved per client on the same handle, replacing the original
    /// per-client round trips while preserving output shape and per-client
    /// ordering.
    pub async fn list(&self) -> CoreResult<Vec<ClientWithRelatives>> {
        self.store
            .with_connection(|conn| {
                let clients = store::all_clients(conn)?;
                let mut decorated = Vec::with_capacity(clients.len());
                for (id, doc) in clients {
                    let relatives = relatives_for(conn, &id)?;
                    decorated.push(ClientWithRelatives { id, doc, relatives });
                }
                Ok(decorated)
            })
            .await
    }

    /// Search clients by full-name fragment, case-insensitively.
    ///
    /// The result holds each matched client (with relatives) immediately
    /// followed by any of its relatives not already present, in relative
    /// projection shape. Entries are deduplicated on id, first occurrence
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if the pattern is empty, missing,
    /// or not a valid regular expression.
    pub async fn search(&self, family_name: &str) -> CoreResult<Vec<SearchEntry>> {
        let family_name = family_name.trim();
        if family_name.is_empty() {
            return Err(CoreError::InvalidInput("familyName required".into()));
        }

        let matcher = RegexBuilder::new(family_name)
            .case_insensitive(true)
            .build()
            .map_err(|e| CoreError::InvalidInput(format!("invalid familyName pattern: {e}")))?;

        self.store
            .with_connection(move |conn| {
                let mut entries: Vec<SearchEntry> = Vec::new();

                for (id, doc) in store::all_clients(conn)? {
                    if !matcher.is_match(&full_name_of(&doc)) {
                        continue;
                    }

                    let relatives = relatives_for(conn, &id)?;
                    if !entries.iter().any(|e| e.id() == id) {
                        entries.push(SearchEntry::Client(ClientWithRelatives {
                            id,
                            doc,
                            relatives: relatives.clone(),
                        }));
                    }
                    for relative in relatives {
                        if !entries.iter().any(|e| e.id() == relative.id) {
                            entries.push(SearchEntry::Relative(relative));
                        }
                    }
                }

                Ok(entries)
            })
            .await
    }

    /// Fetch one client's family summary.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` for a malformed id and
    /// `CoreError::ClientNotFound` if no such client exists.
    pub async fn family(&self, client_id: &str) -> CoreResult<ClientFamily> {
        validate_client_id(client_id)?;

        let id = client_id.to_string();
        let doc = self
            .store
            .with_connection(move |conn| store::client_doc(conn, &id))
            .await?
            .ok_or(CoreError::ClientNotFound)?;

        let family_members = self.resolver.resolve(client_id).await?;

        Ok(ClientFamily {
            id: client_id.to_string(),
            full_name: full_name_of(&doc),
            family_members,
        })
    }
}

/// Write-side service over the `clients` collection.
#[derive(Clone, Debug)]
pub struct ClientMutationService {
    store: Store,
}

impl ClientMutationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Store a new client document as-is and return it with its assigned id.
    pub async fn create(&self, doc: Document) -> CoreResult<ClientRecord> {
        let id = Uuid::new_v4().to_string();

        let record = ClientRecord { id, doc };
        let stored = record.clone();
        self.store
            .with_connection(move |conn| store::write_client_doc(conn, &stored.id, &stored.doc))
            .await?;

        Ok(record)
    }

    /// Merge-overwrite the provided top-level fields onto an existing client.
    ///
    /// Fields absent from `changes` are untouched; nested values are replaced
    /// wholesale, not deep-merged.
    pub async fn update(&self, client_id: &str, changes: Document) -> CoreResult<()> {
        validate_client_id(client_id)?;

        let id = client_id.to_string();
        self.store
            .with_connection(move |conn| {
                let mut doc = store::client_doc(conn, &id)?.ok_or(CoreError::ClientNotFound)?;
                for (key, value) in changes {
                    doc.insert(key, value);
                }
                store::write_client_doc(conn, &id, &doc)
            })
            .await
    }

    /// Delete a client and every relation record referencing it.
    ///
    /// Relation cleanup runs on both sides before the client row is touched,
    /// and runs even when the client is already absent; the second call of a
    /// double delete reports `ClientNotFound` but never a cleanup error.
    pub async fn delete(&self, client_id: &str) -> CoreResult<()> {
        validate_client_id(client_id)?;

        let id = client_id.to_string();
        self.store
            .with_connection(move |conn| {
                conn.execute(
                    "DELETE FROM relations WHERE client_id = ?1",
                    rusqlite::params![id],
                )?;
                conn.execute(
                    "DELETE FROM relations WHERE relative_id = ?1",
                    rusqlite::params![id],
                )?;

                let deleted =
                    conn.execute("DELETE FROM clients WHERE id = ?1", rusqlite::params![id])?;
                if deleted == 0 {
                    return Err(CoreError::ClientNotFound);
                }
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RelationService;
    use serde_json::json;
    use tempfile::TempDir;

    async fn test_store() -> (TempDir, Store) {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let cfg = crate::CoreConfig::new(temp_dir.path().join("test.db")).unwrap();
        let store = Store::new(&cfg);
        store.initialise().await.expect("initialise should succeed");
        (temp_dir, store)
    }

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().unwrap().clone()
    }

    async fn create_client(store: &Store, full_name: &str) -> String {
        ClientMutationService::new(store.clone())
            .create(doc(json!({"fullName": full_name})))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_assigns_id_and_list_includes_it() {
        let (_tmp, store) = test_store().await;
        let mutations = ClientMutationService::new(store.clone());
        let queries = ClientQueryService::new(store.clone());

        let record = mutations
            .create(doc(json!({"fullName": "Jane", "numeroCaso": "C-17"})))
            .await
            .unwrap();
        assert!(!record.id.is_empty());
        assert_eq!(record.doc.get("fullName").unwrap(), "Jane");

        let listed = queries.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, record.id);
        assert_eq!(listed[0].doc.get("numeroCaso").unwrap(), "C-17");
        assert!(listed[0].relatives.is_empty());
    }

    #[tokio::test]
    async fn update_merges_top_level_fields() {
        let (_tmp, store) = test_store().await;
        let mutations = ClientMutationService::new(store.clone());
        let queries = ClientQueryService::new(store.clone());

        let id = mutations
            .create(doc(json!({"fullName": "Jane", "telefono": "555-0100"})))
            .await
            .unwrap()
            .id;

        mutations
            .update(&id, doc(json!({"telefono": "555-0199", "correo": "jane@example.com"})))
            .await
            .unwrap();

        let listed = queries.list().await.unwrap();
        let updated = &listed[0].doc;
        assert_eq!(updated.get("fullName").unwrap(), "Jane");
        assert_eq!(updated.get("telefono").unwrap(), "555-0199");
        assert_eq!(updated.get("correo").unwrap(), "jane@example.com");
    }

    #[tokio::test]
    async fn update_rejects_bad_ids_and_unknown_clients() {
        let (_tmp, store) = test_store().await;
        let mutations = ClientMutationService::new(store.clone());

        assert!(matches!(
            mutations.update("nope", doc(json!({}))).await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            mutations
                .update(&Uuid::new_v4().to_string(), doc(json!({"a": 1})))
                .await,
            Err(CoreError::ClientNotFound)
        ));
    }

    #[tokio::test]
    async fn delete_cascades_both_relation_sides() {
        let (_tmp, store) = test_store().await;
        let mutations = ClientMutationService::new(store.clone());
        let relations = RelationService::new(store.clone());
        let resolver = RelativeResolver::new(store.clone());

        let a = create_client(&store, "Ana").await;
        let b = create_client(&store, "Berta").await;
        let c = create_client(&store, "Carlos").await;
        relations.add(&a, &b, "sibling").await.unwrap();
        relations.add(&c, &a, "mother").await.unwrap();

        mutations.delete(&a).await.unwrap();

        // Both the owned relation and the reverse reference are gone.
        assert!(resolver.resolve(&a).await.unwrap().is_empty());
        assert!(resolver.resolve(&c).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn double_delete_reports_not_found_without_cleanup_error() {
        let (_tmp, store) = test_store().await;
        let mutations = ClientMutationService::new(store.clone());

        let id = create_client(&store, "Ana").await;
        mutations.delete(&id).await.unwrap();
        assert!(matches!(
            mutations.delete(&id).await,
            Err(CoreError::ClientNotFound)
        ));
    }

    #[tokio::test]
    async fn family_returns_members_under_family_key() {
        let (_tmp, store) = test_store().await;
        let relations = RelationService::new(store.clone());
        let queries = ClientQueryService::new(store.clone());

        let a = create_client(&store, "Ana").await;
        let b = create_client(&store, "Berta").await;
        relations.add(&a, &b, "sibling").await.unwrap();

        let family = queries.family(&a).await.unwrap();
        assert_eq!(family.id, a);
        assert_eq!(family.full_name, "Ana");
        assert_eq!(family.family_members.len(), 1);
        assert_eq!(family.family_members[0].id, b);
        assert_eq!(family.family_members[0].relationship, "sibling");
    }

    #[tokio::test]
    async fn family_not_found_and_bad_id() {
        let (_tmp, store) = test_store().await;
        let queries = ClientQueryService::new(store.clone());

        assert!(matches!(
            queries.family("nope").await,
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            queries.family(&Uuid::new_v4().to_string()).await,
            Err(CoreError::ClientNotFound)
        ));
    }

    #[tokio::test]
    async fn search_requires_a_pattern() {
        let (_tmp, store) = test_store().await;
        let queries = ClientQueryService::new(store.clone());

        for pattern in ["", "   "] {
            assert!(matches!(
                queries.search(pattern).await,
                Err(CoreError::InvalidInput(_))
            ));
        }
    }

    #[tokio::test]
    async fn search_rejects_invalid_regex() {
        let (_tmp, store) = test_store().await;
        let queries = ClientQueryService::new(store.clone());

        assert!(matches!(
            queries.search("[unclosed").await,
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn search_matches_case_insensitively_and_dedups() {
        let (_tmp, store) = test_store().await;
        let relations = RelationService::new(store.clone());
        let queries = ClientQueryService::new(store.clone());

        let a = create_client(&store, "Smith").await;
        let b = create_client(&store, "Smithson").await;
        relations.add(&a, &b, "sibling").await.unwrap();

        let entries = queries.search("smith").await.unwrap();

        let mut ids: Vec<&str> = entries.iter().map(|e| e.id()).collect();
        ids.sort_unstable();
        let mut expected = vec![a.as_str(), b.as_str()];
        expected.sort_unstable();
        assert_eq!(ids, expected);

        // Dedup law: no two entries share an id.
        let unique: std::collections::HashSet<&str> = entries.iter().map(|e| e.id()).collect();
        assert_eq!(unique.len(), entries.len());
    }

    #[tokio::test]
    async fn search_appends_non_matching_relatives_in_projection_shape() {
        let (_tmp, store) = test_store().await;
        let relations = RelationService::new(store.clone());
        let queries = ClientQueryService::new(store.clone());

        let a = create_client(&store, "Smith").await;
        let b = create_client(&store, "García").await;
        relations.add(&a, &b, "father").await.unwrap();

        let entries = queries.search("Smith").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(&entries[0], SearchEntry::Client(c) if c.id == a));
        assert!(matches!(&entries[1], SearchEntry::Relative(r) if r.id == b));
    }
}
