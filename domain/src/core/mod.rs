//! Core domain concepts shared across all subdomains.
//!
//! - [`ids`]: identifiers for panels, members and deliberations
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: small text helpers

pub mod error;
pub mod ids;
pub mod string;
