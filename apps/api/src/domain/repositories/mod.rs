// Repository contracts
// The domain talks to storage through these; adapters live in infrastructure

pub mod collection;
pub mod document_store;

pub use collection::{Collection, Document};
pub use document_store::{DocumentStore, Filter, StoreError, StoreResult};
