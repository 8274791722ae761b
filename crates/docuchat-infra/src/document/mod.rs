//! Document storage and file loading.

pub mod file;
pub mod memory;

pub use file::load_document;
pub use memory::MemoryDocumentStore;
