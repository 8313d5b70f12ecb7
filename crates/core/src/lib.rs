//! # Casebook Core
//!
//! Core business logic for the Casebook client record system.
//!
//! This crate contains pure data operations over the embedded document store:
//! - Client document storage and retrieval (schemaless JSON documents)
//! - Directed family-relation records between clients
//! - Relative resolution (application-side joins over the two collections)
//!
//! **No API concerns**: HTTP servers, status-code mapping, and OpenAPI
//! documentation belong in `api-rest`.

pub mod config;
pub mod document;
pub mod error;
pub mod repositories;
pub mod store;

pub use config::CoreConfig;
pub use document::{
    ClientFamily, ClientRecord, ClientWithRelatives, Document, Relative, SearchEntry,
};
pub use error::{CoreError, CoreResult};
pub use repositories::clients::{ClientMutationService, ClientQueryService};
pub use repositories::relations::RelationService;
pub use repositories::relatives::RelativeResolver;
pub use store::Store;
