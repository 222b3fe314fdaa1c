//! Panel members and their personas.

use super::provider::ProviderKind;
use crate::core::ids::MemberId;
use crate::prompt::persona;
use serde::{Deserialize, Serialize};

/// Persona a member argues from.
///
/// Built-in roles map to fixed persona prompts; `Custom` carries its own
/// system prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    InvestmentAdvisor,
    PrExpert,
    PoliticsExpert,
    LegalAdvisor,
    TechStrategist,
    DevilsAdvocate,
    Custom(String),
}

impl Role {
    /// Stable identifier used in transcripts and events
    pub fn as_str(&self) -> &str {
        match self {
            Role::InvestmentAdvisor => "investment_advisor",
            Role::PrExpert => "pr_expert",
            Role::PoliticsExpert => "politics_expert",
            Role::LegalAdvisor => "legal_advisor",
            Role::TechStrategist => "tech_strategist",
            Role::DevilsAdvocate => "devils_advocate",
            Role::Custom(_) => "custom",
        }
    }

    /// System prompt for a member holding this role
    pub fn system_prompt(&self) -> String {
        match self {
            Role::Custom(text) if !text.trim().is_empty() => text.clone(),
            Role::Custom(_) => persona::GENERIC_ASSISTANT.to_string(),
            builtin => format!(
                "{}\n\n{}",
                persona::persona_prompt(builtin),
                persona::STANCE_DIRECTIVE
            ),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = crate::DomainError;

    /// Parses built-in role names. Custom roles cannot be parsed from a bare
    /// name because they need their prompt text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "investment_advisor" => Ok(Role::InvestmentAdvisor),
            "pr_expert" => Ok(Role::PrExpert),
            "politics_expert" => Ok(Role::PoliticsExpert),
            "legal_advisor" => Ok(Role::LegalAdvisor),
            "tech_strategist" => Ok(Role::TechStrategist),
            "devils_advocate" => Ok(Role::DevilsAdvocate),
            _ => Err(crate::DomainError::UnknownValue {
                field: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// One participant of a panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelMember {
    pub id: MemberId,
    pub name: String,
    pub provider: ProviderKind,
    pub role: Role,
    /// Provider-specific model override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl PanelMember {
    pub fn new(name: impl Into<String>, provider: ProviderKind, role: Role) -> Self {
        Self {
            id: MemberId::generate(),
            name: name.into(),
            provider,
            role,
            model: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_id(mut self, id: MemberId) -> Self {
        self.id = id;
        self
    }

    pub fn system_prompt(&self) -> String {
        self.role.system_prompt()
    }

    /// "Name (role)" label used in transcripts
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}
