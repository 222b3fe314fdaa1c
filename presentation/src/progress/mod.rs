//! Live progress subscribers

pub mod reporter;
