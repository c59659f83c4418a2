//! Services module
//!
//! Business logic that coordinates the local cache, the storage
//! configuration and the remote provider.

pub mod config_store;
pub mod notes;
pub mod notifier;
pub mod scheduler;
pub mod sync;

pub use config_store::ConfigStore;
pub use notes::{CreateNoteRequest, NotesService, RemotePush, SavedNote, UpdateNoteRequest};
pub use notifier::{LogNotifier, Notification, NotificationKind, SyncNotifier};
pub use scheduler::SyncScheduler;
pub use sync::{SyncOutcome, SyncService, SyncTrigger};
