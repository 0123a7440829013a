//! Retrieval for cxbot: documents are chunked into word windows, embedded,
//! and stored in an exact L2 index together with their provenance.
//!
//! Two entry points share these pieces:
//! - [`ingest::build_store`] runs offline and writes the three aligned
//!   artifacts under the vector store directory
//! - [`Retriever`] runs per request against a read-only [`VectorStore`]

pub mod chunker;
pub mod index;
pub mod ingest;
pub mod retriever;
pub mod store;

pub use chunker::{Chunker, chunk_text};
pub use index::FlatIndex;
pub use ingest::{IngestReport, build_store, load_documents};
pub use retriever::Retriever;
pub use store::VectorStore;
