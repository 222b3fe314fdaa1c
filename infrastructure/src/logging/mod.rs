//! Structured event logging.
//!
//! Provides [`JsonlEventLogger`], a JSONL file writer that implements
//! the [`EventSubscriber`](council_application::EventSubscriber) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlEventLogger;
