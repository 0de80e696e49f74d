pub mod sqlite_access_store;

pub use sqlite_access_store::SqliteAccessStore;
