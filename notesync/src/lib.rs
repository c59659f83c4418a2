//! notesync library
//!
//! Note storage and remote synchronization: a local note cache, pluggable
//! remote providers behind a factory, and a remote-wins reconciler driven
//! by a periodic scheduler or by the user.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
