//! In-memory storage backends for the tokenward lifecycle engine.
//!
//! This crate provides in-memory implementations of the storage traits from
//! `tokenward`, suitable for tests and single-node deployments. All maps are
//! guarded by process-local locks, which makes every operation atomic with
//! respect to concurrent callers, including the single-winner refresh
//! token consumption.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tokenward_memory::{InMemoryBlacklistStore, InMemoryPrincipalStore, InMemoryRefreshTokenStore};
//!
//! let refresh_store = Arc::new(InMemoryRefreshTokenStore::new());
//! let blacklist_store = Arc::new(InMemoryBlacklistStore::new());
//! let principal_store = Arc::new(InMemoryPrincipalStore::new());
//! ```

mod blacklist;
mod principal;
mod refresh_token;

pub use blacklist::InMemoryBlacklistStore;
pub use principal::InMemoryPrincipalStore;
pub use refresh_token::InMemoryRefreshTokenStore;
