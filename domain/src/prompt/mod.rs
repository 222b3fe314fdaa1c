//! Prompt text: persona system prompts and per-stage templates.

pub mod persona;
pub mod template;

pub use template::PromptTemplate;
