//! Document store module
//!
//! Defines the range-query capability the search aggregator consumes and the
//! backends that provide it.

mod firestore;
mod loader;
mod memory;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use firestore::FirestoreStore;
pub use loader::StoreLoader;
pub use memory::MemoryStore;
pub use traits::*;
