// Journal Federation - Core Library
// Federated read access to heterogeneous scholarly-journal stores

pub mod batch;
pub mod engine;
pub mod entities;
pub mod federation;
pub mod graph_store;      // Journal metadata over SPARQL/HTTP
pub mod handlers;
pub mod ingest;
pub mod records;
pub mod relational_store; // Classifications in SQLite

mod merge;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use batch::{chunked, DEFAULT_CHUNK_SIZE};
pub use engine::BasicQueryEngine;
pub use entities::{Area, Category, Entity, IdSet, Journal};
pub use federation::FullQueryEngine;
pub use graph_store::SparqlJournalHandler;
pub use handlers::{ClassificationStore, JournalStore};
pub use ingest::{ClassificationJsonLoader, JournalCsvLoader};
pub use records::{ClassificationRecord, JournalRecord};
pub use relational_store::{setup_classification_schema, SqliteClassificationHandler};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
