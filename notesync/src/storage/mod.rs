//! Storage module
//!
//! Remote note stores behind a common provider trait, the factory that
//! picks one from configuration, and the on-device note cache.

pub mod factory;
pub mod github;
pub mod local_cache;
pub mod provider;
pub mod stub;

pub use factory::create_provider;
pub use github::{GitHubProvider, GitHubSettings};
pub use local_cache::LocalCache;
pub use provider::StorageProvider;
pub use stub::StubProvider;
