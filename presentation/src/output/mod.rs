//! Rendering of finished deliberations

pub mod console;
pub mod formatter;
