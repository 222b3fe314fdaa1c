//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod capability;
pub mod event_subscriber;
pub mod registry;
pub mod repository;
