//! Repository management modules.
//!
//! This module contains the services operating on the two collections:
//! client queries and mutations, relation mutations, and the shared relative
//! resolver.

pub mod clients;
pub mod relations;
pub mod relatives;
