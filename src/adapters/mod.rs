// Adapters layer: concrete implementations of the domain ports.

pub mod backup;
pub mod storage;

pub use backup::{StorageBackupLog, BACKUP_KEY};
pub use storage::LocalStorage;
