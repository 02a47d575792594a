//! Card catalog: the immutable character and bonus collections.

pub mod definition;
pub mod loader;

pub use definition::{CardCatalog, CardDefinition, CardKind};
pub use loader::{catalog_from_json, load_catalog};
