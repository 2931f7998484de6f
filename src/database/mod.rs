pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use manager::{open_store, DatabaseError, DatabaseManager};
pub use memory::MemoryDocumentStore;
pub use repository::Repository;
pub use store::{Collection, Document, DocumentStore, FindOptions, Sort};
