#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, PreferenceRepository, SessionRepository, Storage, StorageError,
    StoredSession,
};
