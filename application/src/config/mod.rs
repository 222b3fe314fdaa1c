//! Application-level configuration.
//!
//! - [`DeliberationParams`]: per-call timeouts and token budgets

pub mod deliberation_params;

pub use deliberation_params::DeliberationParams;
