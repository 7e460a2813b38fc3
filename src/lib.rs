//! Per-trait implementor registry for generated documentation pages.
//!
//! Fragments contribute batches of implementors in any order; the "Implementors"
//! panel renderer attaches to the page whenever it is ready and still receives
//! every batch exactly once, in contribution order.

pub mod channel;
pub mod error;
pub mod fragment;
pub mod loader;
pub mod page;
pub mod registry;
pub mod tracing;
pub mod types;

pub use channel::{Consumer, HandoffChannel};
pub use error::FragmentError;
pub use fragment::{decode_fragment, decode_json, decode_script, decode_trait_script};
pub use loader::{
    LoadSummary, discover_fragments, load_fragments, read_fragment, trait_id_from_path,
};
pub use page::PageContext;
pub use registry::Registry;
pub use types::{Batch, ImplementorRecord, TraitId, batch_from_value};
