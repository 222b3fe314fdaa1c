//! In-process event distribution for a running deliberation.

pub mod bus;
pub mod checkpoint;

pub use bus::EventBus;
pub use checkpoint::RoundCheckpointer;
