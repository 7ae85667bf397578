//! Integrity gate for machine-learning model files.
//!
//! A model file is hashed with SHA-256 and compared with a trusted digest
//! before any loader is allowed to touch it.

pub mod config;
pub mod logging;

pub mod checksum;
pub mod gate;
pub mod loader;
pub mod store;
pub mod verify;

pub use checksum::{compute_digest, DigestError};
pub use gate::{load_verified, GateError, Verified};
pub use loader::{LoadedModel, LoaderError, ModelLoader, RawModelLoader};
pub use store::{ArtifactStore, DirStore, Staged, StoreError};
pub use verify::{verify, Verification};
