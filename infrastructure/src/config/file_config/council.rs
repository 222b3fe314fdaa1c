//! Council configuration from TOML (`[council]` section)

use council_domain::{
    ConsensusThreshold, DEFAULT_MAX_ROUNDS, DEFAULT_THRESHOLD, DomainError, Panel, PanelMember,
    ProviderKind, Role,
};
use serde::{Deserialize, Serialize};

/// Raw council (panel) configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    pub name: String,
    /// Round budget
    pub max_rounds: u32,
    /// Share of cast votes that must agree, in (0, 1]
    pub consensus_threshold: f64,
    pub members: Vec<FileMemberConfig>,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            name: "Council".to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            consensus_threshold: DEFAULT_THRESHOLD,
            members: Vec::new(),
        }
    }
}

/// One `[[council.members]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMemberConfig {
    pub name: String,
    /// Provider key, e.g. "ollama" or "openai"
    pub provider: String,
    /// Built-in persona (snake_case) or `{ custom = "..." }`
    pub role: Role,
    /// Model override for this member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl FileMemberConfig {
    pub fn parse_provider(&self) -> Result<ProviderKind, DomainError> {
        self.provider.parse()
    }

    pub fn to_member(&self) -> Result<PanelMember, DomainError> {
        let member = PanelMember::new(self.name.trim(), self.parse_provider()?, self.role.clone());
        Ok(match &self.model {
            Some(model) if !model.trim().is_empty() => member.with_model(model.trim()),
            _ => member,
        })
    }
}

impl FileCouncilConfig {
    /// Build and validate the panel described by this section
    pub fn to_panel(&self) -> Result<Panel, DomainError> {
        let members = self
            .members
            .iter()
            .map(FileMemberConfig::to_member)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Panel::new(self.name.clone(), members)?
            .with_max_rounds(self.max_rounds)?
            .with_threshold(ConsensusThreshold::new(self.consensus_threshold)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_deserialize() {
        let toml_str = r#"
name = "Strategy board"
max_rounds = 3
consensus_threshold = 0.75

[[members]]
name = "Ada"
provider = "ollama"
role = "tech_strategist"
model = "llama3.1:8b"

[[members]]
name = "Grace"
provider = "ollama"
role = { custom = "You are a cautious CFO." }
"#;
        let config: FileCouncilConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.members.len(), 2);

        let panel = config.to_panel().unwrap();
        assert_eq!(panel.name, "Strategy board");
        assert_eq!(panel.max_rounds, 3);
        assert_eq!(panel.consensus_threshold.value(), 0.75);
        assert_eq!(panel.members[0].model.as_deref(), Some("llama3.1:8b"));
        assert_eq!(
            panel.members[1].role,
            Role::Custom("You are a cautious CFO.".to_string())
        );
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let member = FileMemberConfig {
            name: "Ada".to_string(),
            provider: "watson".to_string(),
            role: Role::LegalAdvisor,
            model: None,
        };
        assert!(matches!(
            member.to_member(),
            Err(DomainError::UnknownValue { .. })
        ));
    }

    #[test]
    fn test_single_member_panel_is_rejected() {
        let config = FileCouncilConfig {
            members: vec![FileMemberConfig {
                name: "Ada".to_string(),
                provider: "ollama".to_string(),
                role: Role::LegalAdvisor,
                model: None,
            }],
            ..Default::default()
        };
        assert!(matches!(
            config.to_panel(),
            Err(DomainError::TooFewMembers { .. })
        ));
    }
}
