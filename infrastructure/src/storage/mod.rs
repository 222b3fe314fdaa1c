//! Persistence adapters for deliberation records.

mod json_store;

pub use json_store::{INTERRUPTED_MESSAGE, JsonDeliberationStore, StoreError};
