//! Cargodesk Core Library
//!
//! This crate provides the core functionality for Cargodesk, a fleet and
//! delivery tracking system. It is a local document-store emulation: a
//! stand-in for a remote multi-collection database and authentication
//! service, backed by a durable string-keyed substrate.
//!
//! # Architecture
//!
//! - **Substrate**: durable key/blob storage (file-backed or in-memory)
//! - **Store**: generic CRUD and query engine over typed collections,
//!   with lazy seeding of default datasets
//! - **SessionManager**: single persisted identity snapshot
//! - **CredentialRegistry**: salted-hash secrets, separate from profiles
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open()?;
//!
//! // Authenticate
//! let sessions = SessionManager::new(&store);
//! let me = sessions.login("rajesh@cargo.com", "demo123")?;
//!
//! // Query deliveries assigned to a driver
//! let pods: Vec<PodEntry> = store.list(&[
//!     Query::equal("driverId", &*me.id),
//!     Query::order_desc("createdAt"),
//! ])?;
//! ```
//!
//! # Modules
//!
//! - `store`: collection store (main entry point)
//! - `models`: typed records for profiles, deliveries, location samples
//! - `query`: query expression builders
//! - `session`: session lifecycle
//! - `auth`: credential registry
//! - `substrate`: persistence substrate implementations
//! - `seed`: default datasets
//! - `config`: application configuration

pub mod auth;
pub mod config;
pub mod error;
pub mod id;
pub mod models;
pub mod query;
pub mod seed;
pub mod session;
pub mod store;
pub mod substrate;

pub use auth::CredentialRegistry;
pub use config::{Config, ConfigError, DuplicateIdPolicy};
pub use error::{StoreError, StoreResult};
pub use id::unique_id;
pub use models::{
    Collection, LocationSample, MoveType, NewPod, PodEntry, PodStatus, Record, UserProfile,
    UserRole,
};
pub use query::Query;
pub use session::SessionManager;
pub use store::{Patch, Store};
pub use substrate::{FileSubstrate, MemorySubstrate, Substrate, SubstrateError, SubstrateResult};
