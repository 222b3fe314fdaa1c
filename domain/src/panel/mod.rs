//! Panel (council) domain: who deliberates and under which rules.

pub mod member;
#[allow(clippy::module_inception)]
pub mod panel;
pub mod provider;

pub use member::{PanelMember, Role};
pub use panel::{DEFAULT_MAX_ROUNDS, MIN_MEMBERS, Panel};
pub use provider::ProviderKind;
