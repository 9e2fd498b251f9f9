//! S3-backed object store for marketplace listing media
//!
//! This crate owns the key namespace for listing media: per-namespace
//! lifecycle rules, presigned upload grants, public URL resolution, and
//! paginated bulk deletion of everything belonging to an item.

pub mod backend;
pub mod environment;
pub mod namespace;
pub mod store;

pub use backend::{ObjectBackend, S3ObjectBackend};
pub use namespace::{LifecycleRule, Namespace};
pub use store::{MediaStore, StoreError, StoreResult, UploadGrant};
