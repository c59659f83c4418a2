//! Data models
//!
//! Rust structs for the persisted note document and the storage configuration.
//! All models use serde with camelCase keys so documents written by other
//! clients of the same remote repository round-trip unchanged.

pub mod codec;
pub mod note;
pub mod storage_config;

pub use codec::{decode_note, encode_note};
pub use note::{sanitize_file_stem, Note, NoteMetadata, NoteType};
pub use storage_config::{ProviderKind, StorageConfig};
